use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{BolsoError, Result};
use crate::models::{Transaction, UploadedFile};

/// Render derived transactions as CSV: `Data,Descrição,Categoria,Valor,Tipo`.
///
/// Descriptions are always quoted with inner quotes doubled; amounts carry
/// exactly two decimal places; the type column uses the localized labels.
pub fn transactions_to_csv(transactions: &[Transaction]) -> String {
    let mut out = String::from("Data,Descrição,Categoria,Valor,Tipo\n");
    for txn in transactions {
        let description = txn.description.replace('"', "\"\"");
        out.push_str(&format!(
            "{},\"{}\",{},{:.2},{}\n",
            txn.date,
            description,
            txn.category,
            txn.amount,
            txn.kind.label()
        ));
    }
    out
}

/// Default export file name, e.g. `extrato_exportado_2023-10-25.csv`.
pub fn default_export_name() -> String {
    format!(
        "extrato_exportado_{}.csv",
        chrono::Local::now().format("%Y-%m-%d")
    )
}

/// Rebuild the original uploaded document from its stored base64 payload.
/// Seeded/demo files have no stored content and cannot be reconstructed.
pub fn decode_original(file: &UploadedFile) -> Result<Vec<u8>> {
    let Some(content) = &file.original_content else {
        return Err(BolsoError::Other(format!(
            "original content for '{}' is not available (demo and seeded files are metadata-only)",
            file.name
        )));
    };
    STANDARD
        .decode(content)
        .map_err(|e| BolsoError::Other(format!("corrupt stored content for '{}': {e}", file.name)))
}
