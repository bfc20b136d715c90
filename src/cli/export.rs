use std::path::PathBuf;

use crate::error::Result;
use crate::export::{default_export_name, transactions_to_csv};

pub fn run(user: Option<&str>, impersonate: Option<&str>, output: Option<String>) -> Result<()> {
    let (_, app) = super::open_session(user, impersonate)?;
    if app.transactions().is_empty() {
        println!("Nothing to export yet. Upload a statement first.");
        return Ok(());
    }
    let path = PathBuf::from(output.unwrap_or_else(default_export_name));
    std::fs::write(&path, transactions_to_csv(app.transactions()))?;
    println!(
        "{} transactions exported to {}",
        app.transactions().len(),
        path.display()
    );
    Ok(())
}
