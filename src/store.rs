use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// The four logical tables persisted per user identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Table {
    Raw,
    Derived,
    Files,
    Rules,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Raw, Table::Derived, Table::Files, Table::Rules];

    pub fn prefix(&self) -> &'static str {
        match self {
            Table::Raw => "raw",
            Table::Derived => "derived",
            Table::Files => "files",
            Table::Rules => "rules",
        }
    }
}

/// Case-insensitive, path-safe partition key derived from a user name.
pub fn storage_key(user: &str) -> String {
    user.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Keyed JSON persistence for the four per-user tables.
///
/// One JSON array file per (table, user) pair. Missing or unreadable files
/// decode as empty collections. A store whose root cannot be created
/// degrades to a no-op: reads return empty, writes are dropped.
#[derive(Debug, Clone)]
pub struct Store {
    root: Option<PathBuf>,
}

impl Store {
    pub fn open(root: &Path) -> Store {
        match fs::create_dir_all(root) {
            Ok(()) => Store {
                root: Some(root.to_path_buf()),
            },
            Err(_) => Store { root: None },
        }
    }

    /// A store with no backing medium. Every read is empty, every write a no-op.
    pub fn detached() -> Store {
        Store { root: None }
    }

    pub fn is_writable(&self) -> bool {
        self.root.is_some()
    }

    fn path_for(&self, table: Table, user: &str) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(format!("{}_{}.json", table.prefix(), storage_key(user))))
    }

    pub fn get<T: DeserializeOwned>(&self, table: Table, user: &str) -> Vec<T> {
        let Some(path) = self.path_for(table, user) else {
            return Vec::new();
        };
        let Ok(content) = fs::read_to_string(&path) else {
            return Vec::new();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    pub fn set<T: Serialize>(&self, table: Table, user: &str, rows: &[T]) -> Result<()> {
        let Some(path) = self.path_for(table, user) else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(rows)?;
        fs::write(&path, format!("{json}\n"))?;
        Ok(())
    }

    /// Remove all four tables for the given user key.
    pub fn clear(&self, user: &str) -> Result<()> {
        for table in Table::ALL {
            if let Some(path) = self.path_for(table, user) {
                if path.exists() {
                    fs::remove_file(&path)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRule, Transaction, TxnKind};

    fn txn(id: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: "2023-10-01".to_string(),
            description: "Uber Trip".to_string(),
            amount: 24.5,
            category: "Transporte".to_string(),
            kind: TxnKind::Debit,
            bank: "Nubank".to_string(),
            file_id: None,
            is_auto_categorized: false,
        }
    }

    #[test]
    fn test_missing_key_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        let rows: Vec<Transaction> = store.get(Table::Raw, "nobody");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        store.set(Table::Raw, "Brenno", &[txn("1"), txn("2")]).unwrap();
        let rows: Vec<Transaction> = store.get(Table::Raw, "Brenno");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "1");
    }

    #[test]
    fn test_user_key_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        store.set(Table::Files, "Brenno", &[txn("1")]).unwrap();
        let rows: Vec<Transaction> = store.get(Table::Files, "bReNnO");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_tables_are_namespaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        store.set(Table::Raw, "brenno", &[txn("1")]).unwrap();
        let derived: Vec<Transaction> = store.get(Table::Derived, "brenno");
        assert!(derived.is_empty());
    }

    #[test]
    fn test_users_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        store.set(Table::Raw, "brenno", &[txn("1")]).unwrap();
        let other: Vec<Transaction> = store.get(Table::Raw, "lucas");
        assert!(other.is_empty());
    }

    #[test]
    fn test_clear_removes_all_four_tables() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        store.set(Table::Raw, "brenno", &[txn("1")]).unwrap();
        store
            .set(
                Table::Rules,
                "brenno",
                &[CategoryRule {
                    id: "1".to_string(),
                    keyword: "uber".to_string(),
                    category: "Transporte".to_string(),
                }],
            )
            .unwrap();
        store.clear("BRENNO").unwrap();
        let raw: Vec<Transaction> = store.get(Table::Raw, "brenno");
        let rules: Vec<CategoryRule> = store.get(Table::Rules, "brenno");
        assert!(raw.is_empty());
        assert!(rules.is_empty());
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        std::fs::write(dir.path().join("raw_brenno.json"), "{not json").unwrap();
        let rows: Vec<Transaction> = store.get(Table::Raw, "brenno");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_detached_store_never_fails() {
        let store = Store::detached();
        assert!(!store.is_writable());
        store.set(Table::Raw, "brenno", &[txn("1")]).unwrap();
        let rows: Vec<Transaction> = store.get(Table::Raw, "brenno");
        assert!(rows.is_empty());
        store.clear("brenno").unwrap();
    }

    #[test]
    fn test_storage_key_normalization() {
        assert_eq!(storage_key("Brenno"), "brenno");
        assert_eq!(storage_key("  Ana Maria "), "ana_maria");
    }
}
