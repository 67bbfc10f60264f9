// Summary Aggregator - the four dashboard statistics
//
// Pure projection of the active subset of the dataset. Degenerate input
// (empty or all-inactive) yields zeros, never NaN.

use crate::employee::EmployeeRecord;
use crate::render::format_currency_rounded;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// SUMMARY STATISTICS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub total_employees: usize,
    pub total_salary: f64,
    pub avg_salary: f64,
    pub avg_performance: f64,
    pub departments: usize,
}

impl SummaryStatistics {
    /// False when the averages are the zero placeholder rather than real means
    pub fn has_active_employees(&self) -> bool {
        self.total_employees > 0
    }

    /// Display values for the four summary cards, in dashboard order
    pub fn cards(&self) -> [SummaryCard; 4] {
        [
            SummaryCard::new("Total Employees", self.total_employees.to_string()),
            SummaryCard::new("Departments", self.departments.to_string()),
            SummaryCard::new("Avg. Salary", format_currency_rounded(self.avg_salary)),
            SummaryCard::new("Avg. Performance", format!("{:.1}", self.avg_performance)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
}

impl SummaryCard {
    fn new(label: &'static str, value: String) -> Self {
        SummaryCard { label, value }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Compute the summary over the active records of `records`
pub fn summarize(records: &[EmployeeRecord]) -> SummaryStatistics {
    let active: Vec<&EmployeeRecord> = records.iter().filter(|r| r.is_active).collect();

    let total_employees = active.len();
    if total_employees == 0 {
        return SummaryStatistics::default();
    }

    let total_salary: f64 = active.iter().map(|r| r.salary).sum();
    let rating_sum: f64 = active.iter().map(|r| r.performance_rating).sum();
    let departments: HashSet<&str> = active.iter().map(|r| r.department.as_str()).collect();

    let count = total_employees as f64;

    SummaryStatistics {
        total_employees,
        total_salary,
        avg_salary: total_salary / count,
        avg_performance: round_to_tenth(rating_sum / count),
        departments: departments.len(),
    }
}

/// One decimal place, half away from zero.
/// The scaled value is snapped to 1e-6 first so 4.05 (stored as 4.0499..) still rounds up.
fn round_to_tenth(value: f64) -> f64 {
    let scaled = ((value * 10.0) * 1e6).round() / 1e6;
    scaled.round() / 10.0
}

// ============================================================================
// MEMOIZATION
// ============================================================================

/// Caches the last summary, keyed by the identity of the record sequence
#[derive(Debug, Default)]
pub struct SummaryCache {
    last: Option<(Arc<[EmployeeRecord]>, SummaryStatistics)>,
    recomputations: usize,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached summary when `records` is the same allocation as last time
    pub fn get(&mut self, records: &Arc<[EmployeeRecord]>) -> SummaryStatistics {
        if let Some((cached_records, stats)) = &self.last {
            if Arc::ptr_eq(cached_records, records) {
                return *stats;
            }
        }

        let stats = summarize(records);
        self.recomputations += 1;
        tracing::debug!(
            records = records.len(),
            active = stats.total_employees,
            "summary recomputed"
        );
        self.last = Some((Arc::clone(records), stats));
        stats
    }

    /// Number of times the summary was actually computed
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}
