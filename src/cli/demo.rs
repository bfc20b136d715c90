use colored::Colorize;

use crate::error::Result;
use crate::models::{Transaction, TxnKind, UploadedFile};

struct DemoFile {
    id: &'static str,
    name: &'static str,
    bank: &'static str,
}

struct DemoTxn {
    id: &'static str,
    file: &'static str,
    date: &'static str,
    description: &'static str,
    amount: f64,
    category: &'static str,
    kind: TxnKind,
    bank: &'static str,
}

const DEMO_FILES: &[DemoFile] = &[
    DemoFile { id: "demo-file-1", name: "fatura_nubank_outubro.pdf", bank: "Nubank" },
    DemoFile { id: "demo-file-2", name: "fatura_itau_card.pdf", bank: "Itaú" },
    DemoFile { id: "demo-file-3", name: "extrato_bradesco.pdf", bank: "Bradesco" },
];

const DEMO_TXNS: &[DemoTxn] = &[
    DemoTxn { id: "d1", file: "demo-file-1", date: "2023-10-25", description: "Posto Shell", amount: 150.00, category: "Transporte", kind: TxnKind::Debit, bank: "Nubank" },
    DemoTxn { id: "d2", file: "demo-file-1", date: "2023-10-24", description: "Uber Trip", amount: 24.50, category: "Transporte", kind: TxnKind::Debit, bank: "Nubank" },
    DemoTxn { id: "d3", file: "demo-file-1", date: "2023-10-20", description: "Spotify Premium", amount: 21.90, category: "Lazer", kind: TxnKind::Debit, bank: "Nubank" },
    DemoTxn { id: "d4", file: "demo-file-1", date: "2023-10-18", description: "Cinema Kinoplex", amount: 55.90, category: "Lazer", kind: TxnKind::Debit, bank: "Nubank" },
    DemoTxn { id: "d5", file: "demo-file-1", date: "2023-10-15", description: "Starbucks Coffee", amount: 15.00, category: "Alimentação", kind: TxnKind::Debit, bank: "Nubank" },
    DemoTxn { id: "d6", file: "demo-file-2", date: "2023-10-10", description: "Supermercado Extra", amount: 450.00, category: "Alimentação", kind: TxnKind::Debit, bank: "Itaú" },
    DemoTxn { id: "d7", file: "demo-file-2", date: "2023-10-05", description: "Claro Residencial", amount: 120.00, category: "Serviços", kind: TxnKind::Debit, bank: "Itaú" },
    DemoTxn { id: "d8", file: "demo-file-3", date: "2023-10-01", description: "TED Salário Mensal", amount: 3500.00, category: "Renda", kind: TxnKind::Credit, bank: "Bradesco" },
];

fn demo_files() -> Vec<UploadedFile> {
    let upload_date = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    DEMO_FILES
        .iter()
        .map(|f| UploadedFile {
            id: f.id.to_string(),
            name: f.name.to_string(),
            upload_date: upload_date.clone(),
            bank_name: Some(f.bank.to_string()),
            // Metadata only: there is no source document to re-download.
            original_content: None,
            mime_type: Some("application/pdf".to_string()),
        })
        .collect()
}

fn demo_transactions() -> Vec<Transaction> {
    DEMO_TXNS
        .iter()
        .map(|t| Transaction {
            id: t.id.to_string(),
            date: t.date.to_string(),
            description: t.description.to_string(),
            amount: t.amount,
            category: t.category.to_string(),
            kind: t.kind,
            bank: t.bank.to_string(),
            file_id: Some(t.file.to_string()),
            is_auto_categorized: false,
        })
        .collect()
}

pub fn run(user: Option<&str>, impersonate: Option<&str>) -> Result<()> {
    let (_, mut app) = super::open_session(user, impersonate)?;

    // Idempotency guard
    if app.files().iter().any(|f| f.id == DEMO_FILES[0].id) {
        println!("Demo data already loaded.");
        return Ok(());
    }

    let files = demo_files();
    let transactions = demo_transactions();
    let file_count = files.len();
    let txn_count = transactions.len();
    app.ingest(files, transactions)?;

    let auto = app
        .transactions()
        .iter()
        .filter(|t| t.is_auto_categorized)
        .count();
    println!("{}", "Demo data loaded!".green());
    println!("  Files:        {file_count}");
    println!("  Transactions: {txn_count}");
    println!("  Rule matches: {auto}");
    println!();
    println!("Try these next:");
    println!("  bolso transactions list");
    println!("  bolso rules list");
    println!("  bolso files list");
    println!("  bolso export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_rows_reference_demo_files() {
        let file_ids: Vec<&str> = DEMO_FILES.iter().map(|f| f.id).collect();
        for txn in DEMO_TXNS {
            assert!(file_ids.contains(&txn.file), "orphan demo row {}", txn.id);
        }
    }

    #[test]
    fn test_demo_categories_are_valid() {
        for txn in DEMO_TXNS {
            assert!(
                crate::models::is_valid_category(txn.category),
                "invalid category on {}",
                txn.id
            );
        }
    }

    #[test]
    fn test_demo_dates_are_valid() {
        for txn in DEMO_TXNS {
            assert!(
                chrono::NaiveDate::parse_from_str(txn.date, "%Y-%m-%d").is_ok(),
                "invalid date: {}",
                txn.date
            );
        }
    }

    #[test]
    fn test_demo_files_are_metadata_only() {
        for file in demo_files() {
            assert!(file.original_content.is_none());
        }
    }
}
