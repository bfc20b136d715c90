use serde::{Deserialize, Serialize};

/// Closed set of category labels every transaction is classified into.
pub const CATEGORIES: &[&str] = &[
    "Alimentação",
    "Transporte",
    "Moradia",
    "Lazer",
    "Saúde",
    "Educação",
    "Compras",
    "Serviços",
    "Investimento",
    "Renda",
    "Outros",
];

/// Fallback label for anything the extractor can't place in the fixed set.
pub const FALLBACK_CATEGORY: &str = "Outros";

/// Bank name used when extraction can't identify the institution.
pub const UNKNOWN_BANK: &str = "Banco Desconhecido";

pub fn is_valid_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}

/// Coerce an extractor-supplied category into the fixed set.
/// Unknown or empty labels land in the fallback category.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(trimmed))
        .map(|c| (*c).to_string())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Debit,
    Credit,
}

impl TxnKind {
    /// Localized label used in listings and CSV export.
    pub fn label(&self) -> &'static str {
        match self {
            TxnKind::Debit => "Despesa",
            TxnKind::Credit => "Receita",
        }
    }

    pub fn parse(s: &str) -> Option<TxnKind> {
        match s.trim().to_lowercase().as_str() {
            "debit" | "debito" | "débito" | "despesa" | "d" | "saída" | "saida" => {
                Some(TxnKind::Debit)
            }
            "credit" | "credito" | "crédito" | "receita" | "c" | "entrada" => {
                Some(TxnKind::Credit)
            }
            _ => None,
        }
    }
}

/// A statement line item. The same shape lives in the raw table (as
/// extracted) and the derived table (after the rule engine ran).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// ISO date, YYYY-MM-DD. Lexicographic order is chronological order.
    pub date: String,
    pub description: String,
    /// Non-negative magnitude; direction is carried by `kind`.
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TxnKind,
    pub bank: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Set by the rule engine when a category rule rewrote this row.
    #[serde(default)]
    pub is_auto_categorized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub upload_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    /// Base64 of the source document; absent for seeded/demo files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Ordered keyword → category mapping. First match wins per transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub id: String,
    pub keyword: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Free,
    Paid,
    Admin,
    Guest,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Free => "free",
            UserRole::Paid => "paid",
            UserRole::Admin => "admin",
            UserRole::Guest => "guest",
        }
    }

    pub fn parse(s: &str) -> Option<UserRole> {
        match s.trim().to_lowercase().as_str() {
            "free" => Some(UserRole::Free),
            "paid" => Some(UserRole::Paid),
            "admin" => Some(UserRole::Admin),
            "guest" => Some(UserRole::Guest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub role: UserRole,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category_known_label() {
        assert_eq!(normalize_category("Transporte"), "Transporte");
        assert_eq!(normalize_category("  renda "), "Renda");
    }

    #[test]
    fn test_normalize_category_unknown_falls_back() {
        assert_eq!(normalize_category("Groceries"), "Outros");
        assert_eq!(normalize_category(""), "Outros");
    }

    #[test]
    fn test_txn_kind_parse_and_label() {
        assert_eq!(TxnKind::parse("debit"), Some(TxnKind::Debit));
        assert_eq!(TxnKind::parse("Crédito"), Some(TxnKind::Credit));
        assert_eq!(TxnKind::parse("transfer"), None);
        assert_eq!(TxnKind::Debit.label(), "Despesa");
        assert_eq!(TxnKind::Credit.label(), "Receita");
    }

    #[test]
    fn test_transaction_wire_field_names() {
        let txn = Transaction {
            id: "1".to_string(),
            date: "2023-10-01".to_string(),
            description: "Uber Trip".to_string(),
            amount: 24.5,
            category: "Outros".to_string(),
            kind: TxnKind::Debit,
            bank: "Nubank".to_string(),
            file_id: Some("file-abc".to_string()),
            is_auto_categorized: false,
        };
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"fileId\""));
        assert!(json.contains("\"isAutoCategorized\""));
        assert!(json.contains("\"type\":\"debit\""));
    }

    #[test]
    fn test_transaction_decodes_without_optional_fields() {
        let json = r#"{"id":"1","date":"2023-10-01","description":"TED","amount":10.0,"category":"Renda","type":"credit","bank":"Bradesco"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.file_id, None);
        assert!(!txn.is_auto_categorized);
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!(UserRole::parse("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("guest"), Some(UserRole::Guest));
        assert_eq!(UserRole::parse("owner"), None);
    }
}
