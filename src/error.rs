// Error taxonomy for the dashboard library
// Aggregation never fails; loading, grid queries, export and config can.

use thiserror::Error;

// ============================================================================
// LOAD ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate employee id {0}")]
    DuplicateId(u32),

    #[error("employee id must be positive (record #{index})")]
    InvalidId { index: usize },

    #[error("employee {id}: performance rating {rating} outside [0.0, 5.0]")]
    RatingOutOfRange { id: u32, rating: f64 },

    #[error("employee {id}: salary {salary} must be a non-negative number")]
    InvalidSalary { id: u32, salary: f64 },

    #[error("employee {id}: {field} must not be empty")]
    EmptyName { id: u32, field: &'static str },
}

// ============================================================================
// GRID ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid modules not registered; call registry::initialize() first")]
    NotInitialized,

    #[error("page size {0} not offered (choose 10 or 20)")]
    InvalidPageSize(usize),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not sortable")]
    NotSortable(&'static str),

    #[error("column '{0}' is not filterable")]
    NotFilterable(&'static str),

    #[error("{filter} filter cannot be applied to column '{column}'")]
    FilterMismatch {
        column: &'static str,
        filter: &'static str,
    },
}

// ============================================================================
// EXPORT ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("export i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// CONFIG ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("page size {0} not offered (choose 10 or 20)")]
    InvalidPageSize(usize),
}
