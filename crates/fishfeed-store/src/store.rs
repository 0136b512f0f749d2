//! BracketStore — redb-backed reference brackets.
//!
//! Brackets are validated on the way in, so every row a lookup can see
//! has non-degenerate bounds and the interpolation never divides by zero.
//! The store supports both on-disk and in-memory backends (the latter for
//! testing).

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use serde::Serialize;
use tracing::debug;

use fishfeed_core::FeedBracket;
use fishfeed_core::bracket::table_key;

use crate::error::{StoreError, StoreResult};
use crate::tables::BRACKETS;

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// An interpolated coefficient together with the row it came from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Coefficient {
    pub value: f64,
    pub temperature_coefficient: f64,
    pub weight_coefficient: f64,
    /// False when either input lies outside the bracket and was extrapolated.
    pub in_range: bool,
    pub bracket: FeedBracket,
}

/// Thread-safe bracket store backed by redb.
#[derive(Clone)]
pub struct BracketStore {
    db: Arc<Database>,
}

impl BracketStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "bracket store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory bracket store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(BRACKETS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Insert or replace a single bracket.
    pub fn put_bracket(&self, bracket: &FeedBracket) -> StoreResult<()> {
        bracket.validate()?;
        let key = bracket.table_key();
        let value = serde_json::to_vec(bracket).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(BRACKETS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "bracket stored");
        Ok(())
    }

    /// Load a batch of brackets in one transaction.
    ///
    /// Every bracket is validated before anything is written; one bad row
    /// leaves the store untouched, as does a key repeated within the batch.
    /// Returns the number of rows written.
    pub fn seed(&self, brackets: &[FeedBracket]) -> StoreResult<usize> {
        let mut rows = Vec::with_capacity(brackets.len());
        let mut seen = HashSet::with_capacity(brackets.len());
        for bracket in brackets {
            bracket.validate()?;
            if !seen.insert(bracket.table_key()) {
                return Err(StoreError::Duplicate(bracket.table_key()));
            }
            let value = serde_json::to_vec(bracket).map_err(map_err!(Serialize))?;
            rows.push((bracket.table_key(), value));
        }

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(BRACKETS).map_err(map_err!(Table))?;
            for (key, value) in &rows {
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(count = rows.len(), "brackets seeded");
        Ok(rows.len())
    }

    /// Exact-match lookup on both range keys.
    pub fn get_bracket(&self, weight_range: &str, t_range: &str) -> StoreResult<Option<FeedBracket>> {
        let key = table_key(weight_range, t_range);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(BRACKETS).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let bracket: FeedBracket =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(bracket))
            }
            None => Ok(None),
        }
    }

    /// All brackets, ordered by key.
    pub fn list_brackets(&self) -> StoreResult<Vec<FeedBracket>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(BRACKETS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let bracket: FeedBracket =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(bracket);
        }
        Ok(results)
    }

    pub fn count(&self) -> StoreResult<usize> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(BRACKETS).map_err(map_err!(Table))?;
        Ok(table.iter().map_err(map_err!(Read))?.count())
    }

    /// Look up the bracket for `(weight_range, t_range)` and interpolate.
    pub fn compute_coefficient(
        &self,
        weight: f64,
        temperature: f64,
        weight_range: &str,
        t_range: &str,
    ) -> StoreResult<Coefficient> {
        let bracket = self
            .get_bracket(weight_range, t_range)?
            .ok_or_else(|| StoreError::NotFound(table_key(weight_range, t_range)))?;

        let coefficient = Coefficient {
            value: bracket.coefficient(weight, temperature),
            temperature_coefficient: bracket.temperature_coefficient(temperature),
            weight_coefficient: bracket.weight_coefficient(weight),
            in_range: bracket.contains(weight, temperature),
            bracket,
        };
        debug!(
            weight,
            temperature,
            weight_range,
            t_range,
            coefficient = coefficient.value,
            "coefficient computed"
        );
        Ok(coefficient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fishfeed_core::BracketError;

    fn test_bracket(weight_range: &str, t_range: &str) -> FeedBracket {
        FeedBracket {
            weight_range: weight_range.to_string(),
            t_range: t_range.to_string(),
            weight_min: 100.0,
            weight_max: 200.0,
            t_min: 20.0,
            t_max: 30.0,
            coe_min: 1.0,
            coe_max: 2.0,
            fcr: 1.2,
        }
    }

    // ── Bracket CRUD ───────────────────────────────────────────────

    #[test]
    fn bracket_put_and_get() {
        let store = BracketStore::open_in_memory().unwrap();
        let bracket = test_bracket("100-200", "20-30");

        store.put_bracket(&bracket).unwrap();
        let retrieved = store.get_bracket("100-200", "20-30").unwrap();

        assert_eq!(retrieved, Some(bracket));
    }

    #[test]
    fn lookup_requires_both_keys() {
        let store = BracketStore::open_in_memory().unwrap();
        store.put_bracket(&test_bracket("100-200", "20-30")).unwrap();

        assert!(store.get_bracket("100-200", "30-40").unwrap().is_none());
        assert!(store.get_bracket("200-300", "20-30").unwrap().is_none());
    }

    #[test]
    fn put_rejects_degenerate_bracket() {
        let store = BracketStore::open_in_memory().unwrap();
        let mut bracket = test_bracket("100-200", "20-30");
        bracket.t_max = bracket.t_min;

        let err = store.put_bracket(&bracket).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invalid(BracketError::DegenerateTemperatureRange { .. })
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn seed_is_all_or_nothing() {
        let store = BracketStore::open_in_memory().unwrap();
        let mut bad = test_bracket("200-300", "20-30");
        bad.weight_min = 300.0;

        let batch = vec![test_bracket("100-200", "20-30"), bad];
        assert!(store.seed(&batch).is_err());
        assert_eq!(store.count().unwrap(), 0);

        let batch = vec![
            test_bracket("100-200", "20-30"),
            test_bracket("100-200", "30-40"),
        ];
        assert_eq!(store.seed(&batch).unwrap(), 2);
        assert_eq!(store.list_brackets().unwrap().len(), 2);
    }

    #[test]
    fn seed_rejects_duplicate_keys_in_batch() {
        let store = BracketStore::open_in_memory().unwrap();
        let mut second = test_bracket("100-200", "20-30");
        second.coe_max = 3.0;

        let batch = vec![test_bracket("100-200", "20-30"), second];
        let err = store.seed(&batch).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref key) if key == "100-200/20-30"));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn seed_replaces_existing_rows() {
        let store = BracketStore::open_in_memory().unwrap();
        store.put_bracket(&test_bracket("100-200", "20-30")).unwrap();

        let mut updated = test_bracket("100-200", "20-30");
        updated.coe_max = 3.0;
        store.seed(&[updated]).unwrap();

        let retrieved = store.get_bracket("100-200", "20-30").unwrap().unwrap();
        assert_eq!(retrieved.coe_max, 3.0);
        assert_eq!(store.count().unwrap(), 1);
    }

    // ── Coefficient lookup ─────────────────────────────────────────

    #[test]
    fn compute_coefficient_midpoint() {
        let store = BracketStore::open_in_memory().unwrap();
        store.put_bracket(&test_bracket("100-200", "20-30")).unwrap();

        let coe = store
            .compute_coefficient(150.0, 25.0, "100-200", "20-30")
            .unwrap();
        assert!((coe.value - 1.5).abs() < 1e-9);
        assert!((coe.temperature_coefficient - 1.5).abs() < 1e-9);
        assert!((coe.weight_coefficient - 1.5).abs() < 1e-9);
        assert!(coe.in_range);
    }

    #[test]
    fn compute_coefficient_extrapolates() {
        let store = BracketStore::open_in_memory().unwrap();
        store.put_bracket(&test_bracket("100-200", "20-30")).unwrap();

        let coe = store
            .compute_coefficient(250.0, 30.0, "100-200", "20-30")
            .unwrap();
        // w_coe = 2.5, t_coe = 2.0
        assert!((coe.value - 2.25).abs() < 1e-9);
        assert!(!coe.in_range);
    }

    #[test]
    fn compute_coefficient_not_found() {
        let store = BracketStore::open_in_memory().unwrap();
        let err = store
            .compute_coefficient(150.0, 25.0, "nope", "nothing")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref key) if key == "nope/nothing"));
    }

    // ── Persistence (on-disk) ──────────────────────────────────────

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.redb");

        {
            let store = BracketStore::open(&db_path).unwrap();
            store.put_bracket(&test_bracket("100-200", "20-30")).unwrap();
        }

        let store = BracketStore::open(&db_path).unwrap();
        let bracket = store.get_bracket("100-200", "20-30").unwrap();
        assert!(bracket.is_some());
        assert_eq!(bracket.unwrap().fcr, 1.2);
    }

    #[test]
    fn empty_store_operations() {
        let store = BracketStore::open_in_memory().unwrap();
        assert!(store.list_brackets().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.seed(&[]).unwrap(), 0);
    }
}
