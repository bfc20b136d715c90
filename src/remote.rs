//! HTTP client for the AI statement-extraction service.
//!
//! The service receives the base64 document and answers with a JSON array
//! of line items; everything else (ids, category coercion, bank fallback)
//! is normalized here before the rows enter the pipeline.

use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{BolsoError, Result};
use crate::extractor::{normalize_date, Extraction, FilePayload};
use crate::models::{normalize_category, Transaction, TxnKind, UNKNOWN_BANK};
use crate::settings::Settings;

/// Env var holding the extraction service credential.
pub const API_KEY_VAR: &str = "BOLSO_API_KEY";

pub fn extract(payload: &FilePayload, settings: &Settings) -> Result<Extraction> {
    run(payload, settings)
        .map_err(|e| BolsoError::Extraction(format!("could not process '{}': {e:#}", payload.name)))
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    model: &'a str,
    file_name: &'a str,
    mime_type: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ExtractedRow {
    date: String,
    description: String,
    amount: f64,
    #[serde(default)]
    category: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    bank: Option<String>,
}

fn run(payload: &FilePayload, settings: &Settings) -> anyhow::Result<Extraction> {
    if settings.extractor_url.is_empty() {
        bail!("extraction service not configured (set extractor_url in settings.json)");
    }
    let api_key = std::env::var(API_KEY_VAR)
        .with_context(|| format!("{API_KEY_VAR} is not set"))?;

    let body = ExtractRequest {
        model: &settings.extractor_model,
        file_name: &payload.name,
        mime_type: &payload.mime_type,
        content: STANDARD.encode(&payload.content),
    };

    let client = reqwest::blocking::Client::new();
    let response = client
        .post(&settings.extractor_url)
        .bearer_auth(&api_key)
        .json(&body)
        .send()
        .context("send request to extraction service")?;
    if !response.status().is_success() {
        bail!("extraction service answered {}", response.status());
    }
    let rows: Vec<ExtractedRow> = response
        .json()
        .context("decode extraction service response")?;
    if rows.is_empty() {
        bail!("no transactions found in the document");
    }

    let file_id = payload.file_id();
    let id_tag = file_id.trim_start_matches("file-").to_string();
    let mut dropped = 0usize;
    let mut transactions: Vec<Transaction> = Vec::new();
    for row in &rows {
        // Unparseable dates drop the row rather than poisoning the table.
        let Some(date) = normalize_date(&row.date) else {
            dropped += 1;
            continue;
        };
        let description = row.description.trim().to_string();
        if description.is_empty() {
            dropped += 1;
            continue;
        }
        let kind = row
            .kind
            .as_deref()
            .and_then(TxnKind::parse)
            .unwrap_or(TxnKind::Debit);
        let bank = row
            .bank
            .clone()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_BANK.to_string());
        transactions.push(Transaction {
            id: format!("txn-{}-{}", id_tag, transactions.len()),
            date,
            description,
            amount: row.amount.abs(),
            category: normalize_category(&row.category),
            kind,
            bank,
            file_id: Some(file_id.clone()),
            is_auto_categorized: false,
        });
    }
    if transactions.is_empty() {
        bail!("every row in the document was unparseable");
    }

    let bank = transactions[0].bank.clone();
    Ok(Extraction {
        transactions,
        bank,
        dropped,
    })
}
