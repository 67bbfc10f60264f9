// Employee Record Store - immutable, loaded once per session
//
// Records are held behind an Arc so consumers can share the sequence
// and the summary cache can key on its identity.

use crate::employee::EmployeeRecord;
use crate::error::LoadError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Dataset compiled into the binary
const EMBEDDED_DATASET: &str = include_str!("../data/employees.json");

/// On-disk shape: `{ "employees": [ ... ] }`
#[derive(Deserialize)]
struct Dataset {
    employees: Vec<EmployeeRecord>,
}

#[derive(Debug, Clone)]
pub struct EmployeeStore {
    records: Arc<[EmployeeRecord]>,
}

impl EmployeeStore {
    /// Load the dataset shipped with the binary
    pub fn embedded() -> Result<Self, LoadError> {
        Self::from_json_str(EMBEDDED_DATASET)
    }

    /// Parse and validate a dataset document
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let dataset: Dataset = serde_json::from_str(json)?;
        Self::from_records(dataset.employees)
    }

    /// Load a replacement dataset from disk
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), records = store.len(), "loaded employee dataset");
        Ok(store)
    }

    /// Validate every record and the cross-record id uniqueness invariant
    pub fn from_records(records: Vec<EmployeeRecord>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            record.validate(index)?;
            if !seen.insert(record.id) {
                return Err(LoadError::DuplicateId(record.id));
            }
        }

        tracing::debug!(records = records.len(), "employee store ready");

        Ok(EmployeeStore {
            records: records.into(),
        })
    }

    /// The full ordered sequence, unchanged
    pub fn get_all(&self) -> &[EmployeeRecord] {
        &self.records
    }

    /// Shared handle to the sequence; identity is stable for the store's lifetime
    pub fn shared(&self) -> Arc<[EmployeeRecord]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: u32) -> Option<&EmployeeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Distinct departments in first-seen order (set filter choices)
    pub fn departments(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.department.as_str()))
    }

    /// Distinct locations in first-seen order (set filter choices)
    pub fn locations(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.location.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::tests::create_test_employee;
    use std::io::Write;

    #[test]
    fn test_embedded_dataset_loads() {
        let store = EmployeeStore::embedded().unwrap();
        assert_eq!(store.len(), 24);
        assert_eq!(store.get_all()[0].id, 1);
        assert_eq!(store.get_all()[23].id, 24);
    }

    #[test]
    fn test_get_all_preserves_input_order() {
        let records = vec![
            create_test_employee(9, "Sales", 1.0, 3.0, true),
            create_test_employee(2, "HR", 1.0, 3.0, true),
            create_test_employee(5, "Sales", 1.0, 3.0, false),
        ];
        let store = EmployeeStore::from_records(records).unwrap();
        let ids: Vec<u32> = store.get_all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9, 2, 5]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let records = vec![
            create_test_employee(1, "Sales", 1.0, 3.0, true),
            create_test_employee(1, "HR", 1.0, 3.0, true),
        ];
        assert!(matches!(
            EmployeeStore::from_records(records),
            Err(LoadError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            EmployeeStore::from_json_str("{\"employees\": [{\"id\": 1}]}"),
            Err(LoadError::Json(_))
        ));
        assert!(matches!(
            EmployeeStore::from_json_str("not json"),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_shared_handle_keeps_identity() {
        let store = EmployeeStore::embedded().unwrap();
        assert!(Arc::ptr_eq(&store.shared(), &store.shared()));

        let clone = store.clone();
        assert!(Arc::ptr_eq(&store.shared(), &clone.shared()));
    }

    #[test]
    fn test_distinct_categories_first_seen_order() {
        let records = vec![
            create_test_employee(1, "Sales", 1.0, 3.0, true),
            create_test_employee(2, "Engineering", 1.0, 3.0, true),
            create_test_employee(3, "Sales", 1.0, 3.0, false),
        ];
        let store = EmployeeStore::from_records(records).unwrap();
        assert_eq!(store.departments(), vec!["Sales", "Engineering"]);
        assert_eq!(store.locations(), vec!["Remote"]);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let records = vec![create_test_employee(3, "HR", 42000.0, 4.0, true)];
        let doc = serde_json::json!({ "employees": records });
        write!(file, "{}", doc).unwrap();

        let store = EmployeeStore::from_path(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.find(3).unwrap().department, "HR");
        assert!(store.find(4).is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EmployeeStore::from_path(Path::new("/nonexistent/employees.json"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
