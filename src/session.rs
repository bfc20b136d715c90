use crate::error::{BolsoError, Result};
use crate::models::{User, UserRole};

/// Transient identity state: who is logged in and, during impersonation,
/// which admin to fall back to. Never persisted.
///
/// Three reachable configurations: anonymous (no user), active (user, no
/// impersonator) and impersonating (user + the admin who started it).
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_user: Option<User>,
    impersonated_from: Option<User>,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn impersonated_from(&self) -> Option<&User> {
        self.impersonated_from.as_ref()
    }

    pub fn is_impersonating(&self) -> bool {
        self.impersonated_from.is_some()
    }

    /// Become `user`. Any prior state, including impersonation, is replaced.
    pub fn login(&mut self, user: User) {
        self.current_user = Some(user);
        self.impersonated_from = None;
    }

    pub fn logout(&mut self) {
        self.current_user = None;
        self.impersonated_from = None;
    }

    /// Operate as `target`, remembering the way back. Admins only.
    pub fn impersonate(&mut self, target: User) -> Result<()> {
        let current = self.current_user.as_ref().ok_or(BolsoError::NoSession)?;
        if current.role != UserRole::Admin {
            return Err(BolsoError::NotAdmin(current.name.clone()));
        }
        self.impersonated_from = Some(current.clone());
        self.current_user = Some(target);
        Ok(())
    }

    /// Return to the admin who started the impersonation. No-op when not
    /// impersonating; returns the restored admin otherwise.
    pub fn stop_impersonation(&mut self) -> Option<User> {
        let admin = self.impersonated_from.take()?;
        self.current_user = Some(admin.clone());
        Some(admin)
    }
}

/// The account whose tables an identity reads and writes: guests always
/// operate on the titular account, everyone else on their own.
pub fn resolve_data_owner(user: &User, titular: &str) -> String {
    match user.role {
        UserRole::Guest => titular.to_string(),
        _ => user.name.clone(),
    }
}
