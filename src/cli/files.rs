use std::path::PathBuf;

use comfy_table::{Cell, Table};

use crate::error::{BolsoError, Result};
use crate::export::{decode_original, transactions_to_csv};

pub fn list(user: Option<&str>, impersonate: Option<&str>) -> Result<()> {
    let (_, app) = super::open_session(user, impersonate)?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Bank", "Uploaded", "Rows", "Original"]);
    for file in app.files() {
        let rows = app
            .raw_transactions()
            .iter()
            .filter(|t| t.file_id.as_deref() == Some(file.id.as_str()))
            .count();
        table.add_row(vec![
            Cell::new(&file.id),
            Cell::new(&file.name),
            Cell::new(file.bank_name.as_deref().unwrap_or("?")),
            Cell::new(&file.upload_date),
            Cell::new(rows),
            Cell::new(if file.original_content.is_some() { "yes" } else { "-" }),
        ]);
    }
    println!("Uploaded files\n{table}");
    Ok(())
}

pub fn delete(user: Option<&str>, impersonate: Option<&str>, id: &str, yes: bool) -> Result<()> {
    let (_, mut app) = super::open_session(user, impersonate)?;
    if !app.files().iter().any(|f| f.id == id) {
        return Err(BolsoError::UnknownFile(id.to_string()));
    }
    let cascade = app
        .raw_transactions()
        .iter()
        .filter(|t| t.file_id.as_deref() == Some(id))
        .count();
    if !yes {
        println!(
            "This removes the file and its {cascade} extracted transactions. Re-run with --yes to confirm."
        );
        return Ok(());
    }
    app.delete_file(id)?;
    println!("Deleted file {id} and {cascade} transactions.");
    Ok(())
}

pub fn download(
    user: Option<&str>,
    impersonate: Option<&str>,
    id: &str,
    output: Option<String>,
) -> Result<()> {
    let (_, app) = super::open_session(user, impersonate)?;
    let file = app
        .files()
        .iter()
        .find(|f| f.id == id)
        .ok_or_else(|| BolsoError::UnknownFile(id.to_string()))?;
    let bytes = decode_original(file)?;
    let path = PathBuf::from(output.unwrap_or_else(|| file.name.clone()));
    std::fs::write(&path, bytes)?;
    println!("Original document written to {}", path.display());
    Ok(())
}

pub fn csv(
    user: Option<&str>,
    impersonate: Option<&str>,
    id: &str,
    output: Option<String>,
) -> Result<()> {
    let (_, app) = super::open_session(user, impersonate)?;
    if !app.files().iter().any(|f| f.id == id) {
        return Err(BolsoError::UnknownFile(id.to_string()));
    }
    let rows: Vec<_> = app
        .transactions()
        .iter()
        .filter(|t| t.file_id.as_deref() == Some(id))
        .cloned()
        .collect();
    if rows.is_empty() {
        println!("No transactions for this file.");
        return Ok(());
    }
    let path = PathBuf::from(output.unwrap_or_else(|| format!("extrato_{id}.csv")));
    std::fs::write(&path, transactions_to_csv(&rows))?;
    println!("{} transactions exported to {}", rows.len(), path.display());
    Ok(())
}
