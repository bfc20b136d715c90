//! User registry: who can be selected at login. Selection only — there are
//! no credentials anywhere in this system.

use std::path::PathBuf;

use crate::error::{BolsoError, Result};
use crate::models::{User, UserRole};
use crate::settings::config_dir;

fn registry_path() -> PathBuf {
    config_dir().join("users.json")
}

/// Built-in accounts available before anyone edits the registry.
pub fn seed_users() -> Vec<User> {
    vec![
        User {
            name: "Lucas".to_string(),
            role: UserRole::Free,
            email: "lucas@free.com".to_string(),
        },
        User {
            name: "Lais".to_string(),
            role: UserRole::Admin,
            email: "lais@admin.com".to_string(),
        },
        User {
            name: "Brenno".to_string(),
            role: UserRole::Paid,
            email: "brenno@premium.com".to_string(),
        },
        User {
            name: "Luisa".to_string(),
            role: UserRole::Guest,
            email: "luisa@guest.com".to_string(),
        },
    ]
}

pub fn load_users() -> Vec<User> {
    let path = registry_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|_| seed_users())
    } else {
        seed_users()
    }
}

pub fn save_users(users: &[User]) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(users)?;
    std::fs::write(registry_path(), format!("{json}\n"))?;
    Ok(())
}

/// Case-insensitive lookup within a registry slice.
pub fn find_in<'a>(users: &'a [User], name: &str) -> Option<&'a User> {
    users.iter().find(|u| u.name.eq_ignore_ascii_case(name))
}

pub fn find_user(name: &str) -> Result<User> {
    let users = load_users();
    find_in(&users, name)
        .cloned()
        .ok_or_else(|| BolsoError::UnknownUser(name.to_string()))
}

pub fn add_user(name: &str, role: &str, email: &str) -> Result<User> {
    let role = UserRole::parse(role)
        .ok_or_else(|| BolsoError::Other(format!("invalid role '{role}' (free/paid/admin/guest)")))?;
    let mut users = load_users();
    if find_in(&users, name).is_some() {
        return Err(BolsoError::Other(format!("user '{name}' already exists")));
    }
    let user = User {
        name: name.to_string(),
        role,
        email: email.to_string(),
    };
    users.push(user.clone());
    save_users(&users)?;
    Ok(user)
}
