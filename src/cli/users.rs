use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::users;

pub fn add(name: &str, role: &str, email: &str) -> Result<()> {
    let user = users::add_user(name, role, email)?;
    println!("Added user: {} ({})", user.name, user.role.as_str());
    Ok(())
}

pub fn list() -> Result<()> {
    let users = users::load_users();
    let mut table = Table::new();
    table.set_header(vec!["Name", "Role", "Email"]);
    for user in &users {
        table.add_row(vec![
            Cell::new(&user.name),
            Cell::new(user.role.as_str()),
            Cell::new(&user.email),
        ]);
    }
    println!("Users\n{table}");
    Ok(())
}
