use std::path::Path;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{BolsoError, Result};
use crate::models::{normalize_category, Transaction, TxnKind, FALLBACK_CATEGORY, UNKNOWN_BANK};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// A statement file handed to the extraction boundary.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl FilePayload {
    pub fn read(path: &Path) -> Result<FilePayload> {
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
            Some(ext) if ext.eq_ignore_ascii_case("csv") => "text/csv",
            Some(ext) if ext.eq_ignore_ascii_case("txt") => "text/plain",
            _ => "application/octet-stream",
        }
        .to_string();
        Ok(FilePayload {
            name,
            mime_type,
            content,
        })
    }

    /// Content-addressed id: the same bytes always produce the same id,
    /// which is what makes duplicate uploads detectable.
    pub fn file_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.content);
        let digest = hex::encode(hasher.finalize());
        format!("file-{}", &digest[..12])
    }
}

/// What an extractor hands back: rows already tagged with the file id and
/// bank, plus how many source rows it had to drop as unparseable.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub transactions: Vec<Transaction>,
    pub bank: String,
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// Extractor kinds — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtractorKind {
    /// Offline parser for CSV statements.
    Csv,
    /// AI extraction service for PDFs and anything else.
    #[cfg(feature = "remote")]
    Remote,
}

impl ExtractorKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            #[cfg(feature = "remote")]
            Self::Remote => "remote",
        }
    }

    pub fn from_key(key: &str) -> Option<ExtractorKind> {
        match key {
            "csv" => Some(Self::Csv),
            #[cfg(feature = "remote")]
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }

    /// Pick an extractor for a payload: CSV statements parse locally,
    /// everything else goes to the extraction service.
    pub fn for_payload(payload: &FilePayload) -> Result<ExtractorKind> {
        if payload.mime_type == "text/csv" || payload.name.to_lowercase().ends_with(".csv") {
            return Ok(Self::Csv);
        }
        remote_fallback(payload)
    }

    pub fn extract(&self, payload: &FilePayload, settings: &Settings) -> Result<Extraction> {
        match self {
            Self::Csv => extract_csv(payload),
            #[cfg(feature = "remote")]
            Self::Remote => crate::remote::extract(payload, settings),
        }
    }
}

#[cfg(feature = "remote")]
fn remote_fallback(_payload: &FilePayload) -> Result<ExtractorKind> {
    Ok(ExtractorKind::Remote)
}

#[cfg(not(feature = "remote"))]
fn remote_fallback(payload: &FilePayload) -> Result<ExtractorKind> {
    Err(BolsoError::Extraction(format!(
        "no extractor for '{}'; only CSV statements are supported in this build",
        payload.name
    )))
}

// ---------------------------------------------------------------------------
// Shared normalization helpers
// ---------------------------------------------------------------------------

/// Normalize a statement date to ISO YYYY-MM-DD. Accepts ISO and the
/// Brazilian day-first forms.
pub(crate) fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    None
}

/// Parse a statement amount. Handles "R$ 1.234,56", "1234.56", quoted
/// fields and parenthesized negatives.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw
        .replace("R$", "")
        .replace('"', "")
        .replace(' ', "")
        .replace('\u{a0}', "");
    let s = s.trim();
    let (s, parenthesized) = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (inner, true),
        None => (s, false),
    };

    // When a comma appears after the last dot it is the decimal separator
    // (Brazilian notation); otherwise commas are thousands grouping.
    let normalized = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), dot) if dot.map_or(true, |d| comma > d) => {
            s.replace('.', "").replace(',', ".")
        }
        _ => s.replace(',', ""),
    };

    let value: f64 = normalized.parse().ok()?;
    Some(if parenthesized { -value } else { value })
}

const BANK_PATTERN: &str =
    r"(?i)nubank|ita[uú]|bradesco|santander|caixa|banco inter|c6 bank|banco do brasil";

/// Best-effort institution detection from statement text.
pub(crate) fn detect_bank(text: &str) -> String {
    let Ok(re) = Regex::new(BANK_PATTERN) else {
        return UNKNOWN_BANK.to_string();
    };
    let Some(found) = re.find(text) else {
        return UNKNOWN_BANK.to_string();
    };
    match found.as_str().to_lowercase().as_str() {
        "nubank" => "Nubank",
        "itau" | "itaú" => "Itaú",
        "bradesco" => "Bradesco",
        "santander" => "Santander",
        "caixa" => "Caixa",
        "banco inter" => "Banco Inter",
        "c6 bank" => "C6 Bank",
        "banco do brasil" => "Banco do Brasil",
        _ => UNKNOWN_BANK,
    }
    .to_string()
}

// ---------------------------------------------------------------------------
// CSV statement extractor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    kind: Option<usize>,
    category: Option<usize>,
}

fn sniff_header(record: &csv::StringRecord) -> Option<Columns> {
    let mut date = None;
    let mut description = None;
    let mut amount = None;
    let mut kind = None;
    let mut category = None;
    for (i, field) in record.iter().enumerate() {
        let f = field.trim().to_lowercase();
        match f.as_str() {
            "data" | "date" => date = Some(i),
            "valor" | "amount" | "value" => amount = Some(i),
            "tipo" | "type" => kind = Some(i),
            "categoria" | "category" => category = Some(i),
            other if other.contains("descri") || other.contains("hist") => description = Some(i),
            _ => {}
        }
    }
    match (date, description, amount) {
        (Some(date), Some(description), Some(amount)) => Some(Columns {
            date,
            description,
            amount,
            kind,
            category,
        }),
        _ => None,
    }
}

fn row_kind(columns: Columns, record: &csv::StringRecord, signed_amount: f64) -> TxnKind {
    let explicit = columns
        .kind
        .and_then(|i| record.get(i))
        .and_then(TxnKind::parse);
    match explicit {
        Some(kind) => kind,
        None if signed_amount < 0.0 => TxnKind::Debit,
        None => TxnKind::Credit,
    }
}

fn extract_csv(payload: &FilePayload) -> Result<Extraction> {
    let text = String::from_utf8_lossy(&payload.content).to_string();
    let bank = detect_bank(&text);
    let file_id = payload.file_id();
    let id_tag = file_id.trim_start_matches("file-").to_string();

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut columns: Option<Columns> = None;
    let mut transactions: Vec<Transaction> = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        let cols = match columns {
            Some(cols) => cols,
            None => {
                columns = sniff_header(&record);
                continue;
            }
        };

        let needed = [cols.date, cols.description, cols.amount]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1;
        if record.len() < needed {
            continue;
        }
        let Some(date) = normalize_date(&record[cols.date]) else {
            dropped += 1;
            continue;
        };
        let description = record[cols.description].trim().to_string();
        if description.is_empty() {
            dropped += 1;
            continue;
        }
        let Some(signed_amount) = parse_amount(&record[cols.amount]) else {
            dropped += 1;
            continue;
        };
        let kind = row_kind(cols, &record, signed_amount);
        let category = cols
            .category
            .and_then(|i| record.get(i))
            .map(normalize_category)
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

        transactions.push(Transaction {
            id: format!("txn-{}-{}", id_tag, transactions.len()),
            date,
            description,
            amount: signed_amount.abs(),
            category,
            kind,
            bank: bank.clone(),
            file_id: Some(file_id.clone()),
            is_auto_categorized: false,
        });
    }

    if columns.is_none() {
        return Err(BolsoError::Extraction(format!(
            "could not find a statement header row in '{}'",
            payload.name
        )));
    }
    if transactions.is_empty() {
        return Err(BolsoError::Extraction(format!(
            "no parseable transactions in '{}'",
            payload.name
        )));
    }

    Ok(Extraction {
        transactions,
        bank,
        dropped,
    })
}
