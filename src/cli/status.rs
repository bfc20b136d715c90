use crate::error::Result;
use crate::models::UserRole;
use crate::settings::{load_settings, settings_file_exists, store_dir};
use crate::users;

pub fn run(user: Option<&str>, impersonate: Option<&str>) -> Result<()> {
    let settings = load_settings();
    println!("Bolso status");
    if !settings_file_exists() {
        println!("  Not initialized yet (run `bolso init`). Showing defaults.");
    }
    println!("  Data directory: {}", settings.data_dir);
    println!("  Store: {}", store_dir().display());
    println!("  Titular account (guest view): {}", settings.titular_account);
    if settings.extractor_url.is_empty() {
        println!("  Extraction service: not configured");
    } else {
        println!(
            "  Extraction service: {} ({})",
            settings.extractor_url, settings.extractor_model
        );
    }
    println!("  Registered users: {}", users::load_users().len());

    if user.is_none() {
        println!();
        println!("Pass --user <name> to see that account's table statistics.");
        return Ok(());
    }

    let (_, app) = super::open_session(user, impersonate)?;
    let current = app.current_user().cloned();
    println!();
    if let Some(current) = &current {
        println!("Session: {} ({})", current.name, current.role.as_str());
        if let Some(owner) = app.effective_owner() {
            if current.role == UserRole::Guest {
                println!("  Guest view of titular account '{owner}'; changes are never persisted.");
            }
        }
        if let Some(admin) = app.session().impersonated_from() {
            println!("  Impersonation active (admin: {}).", admin.name);
        }
    }
    println!("  Raw transactions:     {}", app.raw_transactions().len());
    println!("  Derived transactions: {}", app.transactions().len());
    println!("  Uploaded files:       {}", app.files().len());
    println!("  Category rules:       {}", app.rules().len());
    Ok(())
}
