use crate::models::{CategoryRule, Transaction};

/// The transform step of the pipeline: raw rows + ordered rules → derived rows.
///
/// Pure and deterministic. The whole derived table is rebuilt on every call;
/// callers replace their copy rather than patching it.
pub fn transform(raw: &[Transaction], rules: &[CategoryRule]) -> Vec<Transaction> {
    if raw.is_empty() {
        return Vec::new();
    }

    // Most recent first. sort_by is stable, so rows sharing a date keep
    // their raw-table order.
    let mut sorted: Vec<Transaction> = raw.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .map(|mut txn| {
            let description = txn.description.to_lowercase();
            let matched = rules
                .iter()
                .find(|rule| description.contains(&rule.keyword.trim().to_lowercase()));
            if let Some(rule) = matched {
                txn.category = rule.category.clone();
                txn.is_auto_categorized = true;
            }
            txn
        })
        .collect()
}

/// Starter rule set seeded into a fresh user's empty rules table.
pub fn default_rules() -> Vec<CategoryRule> {
    const SEED: &[(&str, &str)] = &[
        ("Uber", "Transporte"),
        ("99App", "Transporte"),
        ("Ifood", "Alimentação"),
        ("Netflix", "Lazer"),
        ("Spotify", "Lazer"),
        ("Shell", "Transporte"),
        ("Amazon", "Compras"),
    ];
    SEED.iter()
        .enumerate()
        .map(|(i, (keyword, category))| CategoryRule {
            id: (i + 1).to_string(),
            keyword: (*keyword).to_string(),
            category: (*category).to_string(),
        })
        .collect()
}
