use comfy_table::{Cell, Table};

use crate::error::{BolsoError, Result};
use crate::models::CategoryRule;

fn next_rule_id(rules: &[CategoryRule]) -> String {
    let max = rules
        .iter()
        .filter_map(|r| r.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

pub fn add(user: Option<&str>, impersonate: Option<&str>, keyword: &str, category: &str) -> Result<()> {
    let (_, mut app) = super::open_session(user, impersonate)?;
    let mut rules = app.rules().to_vec();
    let id = next_rule_id(&rules);
    rules.push(CategoryRule {
        id: id.clone(),
        keyword: keyword.to_string(),
        category: category.to_string(),
    });
    app.update_rules(rules)?;
    let recategorized = app
        .transactions()
        .iter()
        .filter(|t| t.is_auto_categorized)
        .count();
    println!("Added rule {id}: '{keyword}' \u{2192} {category}");
    println!("{recategorized} transactions now match a rule.");
    Ok(())
}

pub fn list(user: Option<&str>, impersonate: Option<&str>) -> Result<()> {
    let (_, app) = super::open_session(user, impersonate)?;
    let mut table = Table::new();
    table.set_header(vec!["ID", "Keyword", "Category"]);
    for rule in app.rules() {
        table.add_row(vec![
            Cell::new(&rule.id),
            Cell::new(&rule.keyword),
            Cell::new(&rule.category),
        ]);
    }
    println!("Rules (evaluated top to bottom, first match wins)\n{table}");
    Ok(())
}

pub fn update(
    user: Option<&str>,
    impersonate: Option<&str>,
    id: &str,
    keyword: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let (_, mut app) = super::open_session(user, impersonate)?;
    let mut rules = app.rules().to_vec();
    let rule = rules
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| BolsoError::Other(format!("No rule with ID {id}")))?;
    if let Some(keyword) = keyword {
        rule.keyword = keyword;
    }
    if let Some(category) = category {
        rule.category = category;
    }
    let summary = format!("'{}' \u{2192} {}", rule.keyword, rule.category);
    app.update_rules(rules)?;
    println!("Updated rule {id}: {summary}");
    Ok(())
}

pub fn delete(user: Option<&str>, impersonate: Option<&str>, id: &str) -> Result<()> {
    let (_, mut app) = super::open_session(user, impersonate)?;
    let rules = app.rules().to_vec();
    let Some(rule) = rules.iter().find(|r| r.id == id) else {
        return Err(BolsoError::Other(format!("No rule with ID {id}")));
    };
    let summary = format!("'{}' \u{2192} {}", rule.keyword, rule.category);
    let remaining: Vec<CategoryRule> = rules.into_iter().filter(|r| r.id != id).collect();
    app.update_rules(remaining)?;
    println!("Deleted rule {id}: {summary}");
    Ok(())
}
