use comfy_table::{Cell, Table};

use crate::error::{BolsoError, Result};
use crate::fmt::money;
use crate::models::TxnKind;
use crate::pipeline::TransactionUpdate;

pub fn list(
    user: Option<&str>,
    impersonate: Option<&str>,
    month: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    let (_, app) = super::open_session(user, impersonate)?;
    let rows: Vec<_> = app
        .transactions()
        .iter()
        .filter(|t| month.map_or(true, |m| t.date.starts_with(m)))
        .filter(|t| category.map_or(true, |c| t.category == c))
        .collect();

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Category", "Amount", "Type", "Bank"]);
    for txn in &rows {
        let category = if txn.is_auto_categorized {
            format!("{} *", txn.category)
        } else {
            txn.category.clone()
        };
        table.add_row(vec![
            Cell::new(&txn.id),
            Cell::new(&txn.date),
            Cell::new(&txn.description),
            Cell::new(category),
            Cell::new(money(txn.amount)),
            Cell::new(txn.kind.label()),
            Cell::new(&txn.bank),
        ]);
    }
    println!("Transactions ({})\n{table}", rows.len());
    println!("* categorized by a rule");

    let spent: f64 = rows
        .iter()
        .filter(|t| t.kind == TxnKind::Debit)
        .map(|t| t.amount)
        .sum();
    let received: f64 = rows
        .iter()
        .filter(|t| t.kind == TxnKind::Credit)
        .map(|t| t.amount)
        .sum();
    println!("Despesas: {}   Receitas: {}", money(spent), money(received));
    Ok(())
}

pub fn edit(
    user: Option<&str>,
    impersonate: Option<&str>,
    id: &str,
    date: Option<String>,
    description: Option<String>,
    amount: Option<f64>,
    category: Option<String>,
    kind: Option<&str>,
) -> Result<()> {
    let (_, mut app) = super::open_session(user, impersonate)?;
    if !app.raw_transactions().iter().any(|t| t.id == id) {
        println!("No transaction with ID {id}; nothing changed.");
        return Ok(());
    }
    let kind = match kind {
        Some(value) => Some(
            TxnKind::parse(value)
                .ok_or_else(|| BolsoError::Other(format!("invalid type '{value}' (debit, credit)")))?,
        ),
        None => None,
    };
    app.edit_transaction(
        id,
        TransactionUpdate {
            date,
            description,
            amount,
            category,
            kind,
        },
    )?;
    if let Some(txn) = app.raw_transactions().iter().find(|t| t.id == id) {
        println!(
            "Updated {}: {} | {} | {} | {}",
            txn.id,
            txn.date,
            txn.description,
            txn.category,
            money(txn.amount)
        );
    }
    Ok(())
}

pub fn delete(user: Option<&str>, impersonate: Option<&str>, id: &str) -> Result<()> {
    let (_, mut app) = super::open_session(user, impersonate)?;
    if !app.raw_transactions().iter().any(|t| t.id == id) {
        println!("No transaction with ID {id}; nothing changed.");
        return Ok(());
    }
    app.delete_transaction(id)?;
    println!("Deleted transaction {id}.");
    Ok(())
}
