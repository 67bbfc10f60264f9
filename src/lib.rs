// Employee Dashboard - Core Library
// Exposes all modules for use in CLI, TUI, API server, and tests

pub mod employee;
pub mod store;
pub mod summary;
pub mod columns;
pub mod render;
pub mod grid;
pub mod registry;
pub mod export;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use employee::EmployeeRecord;
pub use store::EmployeeStore;
pub use summary::{summarize, SummaryCache, SummaryCard, SummaryStatistics};
pub use columns::{ColumnDef, ColumnField, FilterKind, COLUMNS};
pub use render::{CellRenderers, PerformanceBand, RenderOptions};
pub use grid::{
    ColumnFilter, DateCondition, GridPage, GridQuery, NumberCondition, SortDirection, SortSpec,
    TextCondition, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS,
};
pub use registry::{GridModule, ModuleRegistry};
pub use export::{export_csv, export_to_path, export_to_string, ExportScope};
pub use config::DashboardConfig;
pub use error::{ConfigError, ExportError, GridError, LoadError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
