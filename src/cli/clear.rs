use crate::error::Result;
use crate::models::UserRole;

pub fn run(user: Option<&str>, impersonate: Option<&str>, yes: bool) -> Result<()> {
    let (_, mut app) = super::open_session(user, impersonate)?;
    let Some(owner) = app.effective_owner() else {
        return Ok(());
    };
    if !yes {
        println!(
            "This removes all four stored tables for '{owner}'. Re-run with --yes to confirm."
        );
        return Ok(());
    }
    let is_guest = app
        .current_user()
        .map(|u| u.role == UserRole::Guest)
        .unwrap_or(false);
    app.clear_data()?;
    if is_guest {
        println!("Guest view reset. The titular account's stored data was not touched.");
    } else {
        println!("All stored data for '{owner}' removed.");
    }
    Ok(())
}
