use std::path::Path;

use colored::Colorize;

use crate::error::{BolsoError, Result};
use crate::extractor::{ExtractorKind, FilePayload};

pub fn run(
    user: Option<&str>,
    impersonate: Option<&str>,
    file: &str,
    format: Option<&str>,
) -> Result<()> {
    let (settings, mut app) = super::open_session(user, impersonate)?;

    let payload = FilePayload::read(Path::new(file))?;
    let kind = match format {
        Some(key) => ExtractorKind::from_key(key)
            .ok_or_else(|| BolsoError::Other(format!("unknown format '{key}' (csv, remote)")))?,
        None => ExtractorKind::for_payload(&payload)?,
    };

    let outcome = app.upload(&payload, kind, &settings)?;
    if outcome.duplicate_file {
        println!("This file has already been uploaded (same content checksum).");
        return Ok(());
    }

    let bank = outcome.file.bank_name.as_deref().unwrap_or("?");
    println!(
        "{}",
        format!(
            "{} transactions imported from '{}' ({})",
            outcome.imported, outcome.file.name, bank
        )
        .green()
    );
    if outcome.dropped > 0 {
        println!("{}", format!("{} unparseable rows dropped", outcome.dropped).yellow());
    }
    let auto = app
        .transactions()
        .iter()
        .filter(|t| t.is_auto_categorized)
        .count();
    println!(
        "{} categorized by rules, {} transactions in the view",
        auto,
        app.transactions().len()
    );
    Ok(())
}
