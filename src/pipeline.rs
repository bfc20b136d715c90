use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{BolsoError, Result};
use crate::extractor::{ExtractorKind, FilePayload};
use crate::models::{
    is_valid_category, CategoryRule, Transaction, TxnKind, UploadedFile, User, UserRole,
};
use crate::session::{resolve_data_owner, Session};
use crate::settings::Settings;
use crate::store::{Store, Table};
use crate::transform::{default_rules, transform};

/// Whitelisted fields an edit may touch on a raw transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub kind: Option<TxnKind>,
}

/// What `upload` reports back to the caller.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub file: UploadedFile,
    pub imported: usize,
    pub dropped: usize,
    pub duplicate_file: bool,
}

/// The pipeline orchestrator: owns the in-memory copy of the active
/// identity's four tables and re-runs the transform + persistence on every
/// mutation. Exactly one instance operates on one identity at a time;
/// switching identity replaces all four tables wholesale.
pub struct AppStore {
    store: Store,
    titular: String,
    session: Session,
    raw: Vec<Transaction>,
    derived: Vec<Transaction>,
    files: Vec<UploadedFile>,
    rules: Vec<CategoryRule>,
    is_loading: bool,
    error: Option<String>,
}

impl AppStore {
    pub fn new(store: Store, titular: &str) -> AppStore {
        AppStore {
            store,
            titular: titular.to_string(),
            session: Session::new(),
            raw: Vec::new(),
            derived: Vec::new(),
            files: Vec::new(),
            rules: Vec::new(),
            is_loading: false,
            error: None,
        }
    }

    // -- read side ----------------------------------------------------------

    /// The derived table — what displays and exports read.
    pub fn transactions(&self) -> &[Transaction] {
        &self.derived
    }

    pub fn raw_transactions(&self) -> &[Transaction] {
        &self.raw
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Last operation's failure, if any. Overwritten by the next failure,
    /// cleared when the next operation starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The account whose tables this session reads and writes.
    pub fn effective_owner(&self) -> Option<String> {
        self.session
            .current_user()
            .map(|user| resolve_data_owner(user, &self.titular))
    }

    // -- identity ------------------------------------------------------------

    /// Log in and load the effective identity's four tables. A fresh
    /// identity with no rules gets the default set, persisted unless the
    /// identity is a guest.
    pub fn login(&mut self, user: User) {
        self.error = None;
        self.session.login(user);
        self.load_identity(true);
    }

    /// Drop the session and every in-memory table. Nothing is persisted
    /// beyond what mutations already wrote.
    pub fn logout(&mut self) {
        self.session.logout();
        self.raw = Vec::new();
        self.derived = Vec::new();
        self.files = Vec::new();
        self.rules = Vec::new();
        self.error = None;
    }

    /// Admin-only: switch the session to `target` and load their tables.
    /// Unlike `login`, an empty rules table is left empty.
    pub fn impersonate(&mut self, target: User) -> Result<()> {
        self.error = None;
        self.session.impersonate(target).map_err(|e| self.fail(e))?;
        self.load_identity(false);
        Ok(())
    }

    /// Return to the impersonating admin, reloading their own tables fresh
    /// from persistence. No-op when not impersonating.
    pub fn stop_impersonation(&mut self) {
        self.error = None;
        if self.session.stop_impersonation().is_some() {
            self.load_identity(false);
        }
    }

    fn load_identity(&mut self, seed_rules: bool) {
        let Some(user) = self.session.current_user().cloned() else {
            return;
        };
        let owner = resolve_data_owner(&user, &self.titular);
        self.raw = self.store.get(Table::Raw, &owner);
        self.files = self.store.get(Table::Files, &owner);
        self.rules = self.store.get(Table::Rules, &owner);
        if seed_rules && self.rules.is_empty() {
            self.rules = default_rules();
            if user.role != UserRole::Guest {
                if let Err(e) = self.store.set(Table::Rules, &owner, &self.rules) {
                    self.error = Some(e.to_string());
                }
            }
        }
        self.derived = transform(&self.raw, &self.rules);
    }

    // -- pipeline operations -------------------------------------------------

    /// Run extraction on a payload and ingest the result. A failed
    /// extraction surfaces its message and leaves every table unchanged;
    /// re-uploading bytes already ingested is reported as a duplicate.
    pub fn upload(
        &mut self,
        payload: &FilePayload,
        kind: ExtractorKind,
        settings: &Settings,
    ) -> Result<UploadOutcome> {
        self.error = None;
        self.require_session()?;
        let file_id = payload.file_id();
        if let Some(existing) = self.files.iter().find(|f| f.id == file_id) {
            return Ok(UploadOutcome {
                file: existing.clone(),
                imported: 0,
                dropped: 0,
                duplicate_file: true,
            });
        }

        self.is_loading = true;
        let extraction = kind.extract(payload, settings);
        self.is_loading = false;
        let extraction = match extraction {
            Ok(extraction) => extraction,
            Err(e) => return Err(self.fail(e)),
        };

        let file = UploadedFile {
            id: file_id,
            name: payload.name.clone(),
            upload_date: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            bank_name: Some(extraction.bank.clone()),
            original_content: Some(STANDARD.encode(&payload.content)),
            mime_type: Some(payload.mime_type.clone()),
        };
        let imported = extraction.transactions.len();
        self.ingest(vec![file.clone()], extraction.transactions)?;
        Ok(UploadOutcome {
            file,
            imported,
            dropped: extraction.dropped,
            duplicate_file: false,
        })
    }

    /// Append a batch of files and raw rows, rebuild the derived table and
    /// persist raw/files/derived for identities allowed to persist.
    pub fn ingest(&mut self, new_files: Vec<UploadedFile>, new_raw: Vec<Transaction>) -> Result<()> {
        self.error = None;
        self.require_session()?;
        self.files.extend(new_files);
        self.raw.extend(new_raw);
        self.derived = transform(&self.raw, &self.rules);
        self.persist(&[Table::Raw, Table::Files, Table::Derived]);
        Ok(())
    }

    /// Remove a file and cascade to every raw (and therefore derived)
    /// transaction it produced. Unknown ids are a no-op.
    pub fn delete_file(&mut self, file_id: &str) -> Result<()> {
        self.error = None;
        self.require_session()?;
        self.files.retain(|f| f.id != file_id);
        self.raw.retain(|t| t.file_id.as_deref() != Some(file_id));
        self.derived = transform(&self.raw, &self.rules);
        self.persist(&[Table::Raw, Table::Files, Table::Derived]);
        Ok(())
    }

    /// Apply a whitelisted-field edit to one raw transaction, then rebuild.
    /// An unknown id is a silent no-op so stale references stay harmless.
    pub fn edit_transaction(&mut self, id: &str, update: TransactionUpdate) -> Result<()> {
        self.error = None;
        self.require_session()?;
        if let Some(category) = &update.category {
            if !is_valid_category(category) {
                return Err(self.fail(BolsoError::UnknownCategory(category.clone())));
            }
        }
        if let Some(amount) = update.amount {
            if amount < 0.0 {
                return Err(self.fail(BolsoError::Other(format!(
                    "amount must be non-negative, got {amount}"
                ))));
            }
        }
        if let Some(date) = &update.date {
            if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Err(self.fail(BolsoError::Other(format!(
                    "invalid date '{date}' (expected YYYY-MM-DD)"
                ))));
            }
        }

        if let Some(txn) = self.raw.iter_mut().find(|t| t.id == id) {
            if let Some(date) = update.date {
                txn.date = date;
            }
            if let Some(description) = update.description {
                txn.description = description;
            }
            if let Some(amount) = update.amount {
                txn.amount = amount;
            }
            if let Some(category) = update.category {
                txn.category = category;
            }
            if let Some(kind) = update.kind {
                txn.kind = kind;
            }
        }
        self.derived = transform(&self.raw, &self.rules);
        self.persist(&[Table::Raw, Table::Derived]);
        Ok(())
    }

    /// Remove one raw transaction. Unknown ids are a no-op.
    pub fn delete_transaction(&mut self, id: &str) -> Result<()> {
        self.error = None;
        self.require_session()?;
        self.raw.retain(|t| t.id != id);
        self.derived = transform(&self.raw, &self.rules);
        self.persist(&[Table::Raw, Table::Derived]);
        Ok(())
    }

    /// Replace the rules table wholesale and recategorize everything.
    pub fn update_rules(&mut self, new_rules: Vec<CategoryRule>) -> Result<()> {
        self.error = None;
        self.require_session()?;
        for rule in &new_rules {
            if rule.keyword.trim().is_empty() {
                return Err(self.fail(BolsoError::Other(format!(
                    "rule {} has an empty keyword",
                    rule.id
                ))));
            }
            if !is_valid_category(&rule.category) {
                return Err(self.fail(BolsoError::UnknownCategory(rule.category.clone())));
            }
        }
        self.rules = new_rules;
        self.derived = transform(&self.raw, &self.rules);
        self.persist(&[Table::Rules, Table::Derived]);
        Ok(())
    }

    /// Drop the effective identity's four tables, in memory and (for
    /// identities allowed to persist) on disk.
    pub fn clear_data(&mut self) -> Result<()> {
        self.error = None;
        self.require_session()?;
        if self.can_persist() {
            if let Some(owner) = self.effective_owner() {
                if let Err(e) = self.store.clear(&owner) {
                    self.error = Some(e.to_string());
                }
            }
        }
        self.raw = Vec::new();
        self.derived = Vec::new();
        self.files = Vec::new();
        self.rules = Vec::new();
        Ok(())
    }

    // -- internals -----------------------------------------------------------

    fn require_session(&mut self) -> Result<User> {
        match self.session.current_user() {
            Some(user) => Ok(user.clone()),
            None => Err(self.fail(BolsoError::NoSession)),
        }
    }

    /// Guests only ever mutate the in-memory copy; their writes are
    /// discarded on identity switch.
    fn can_persist(&self) -> bool {
        self.session
            .current_user()
            .map(|user| user.role != UserRole::Guest)
            .unwrap_or(false)
    }

    /// Write the given tables for the effective owner. A write failure is
    /// surfaced through the error slot; memory keeps the new state and the
    /// next successful mutation re-persists it.
    fn persist(&mut self, tables: &[Table]) {
        if !self.can_persist() {
            return;
        }
        let Some(owner) = self.effective_owner() else {
            return;
        };
        for table in tables {
            let result = match table {
                Table::Raw => self.store.set(Table::Raw, &owner, &self.raw),
                Table::Derived => self.store.set(Table::Derived, &owner, &self.derived),
                Table::Files => self.store.set(Table::Files, &owner, &self.files),
                Table::Rules => self.store.set(Table::Rules, &owner, &self.rules),
            };
            if let Err(e) = result {
                self.error = Some(e.to_string());
                return;
            }
        }
    }

    fn fail(&mut self, err: BolsoError) -> BolsoError {
        self.error = Some(err.to_string());
        err
    }
}
