//! Property-based tests for the summary aggregator, grid model and export.

use chrono::NaiveDate;
use employee_dashboard::grid::{self, ColumnFilter, GridQuery, SortDirection};
use employee_dashboard::{
    export_to_string, registry, summarize, ColumnField, EmployeeRecord, EmployeeStore, ExportScope,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashSet;

const DEPARTMENTS: [&str; 5] = ["Engineering", "Sales", "Marketing", "HR", "engineering"];

fn employee(
    id: u32,
    department: usize,
    salary: u32,
    rating_tenths: u8,
    is_active: bool,
    skills: usize,
) -> EmployeeRecord {
    EmployeeRecord {
        id,
        first_name: format!("First{}", id),
        last_name: format!("Last{}", id),
        email: format!("e{}@company.com", id),
        department: DEPARTMENTS[department].to_string(),
        position: "Analyst".to_string(),
        salary: salary as f64,
        hire_date: NaiveDate::from_ymd_opt(2015 + (id % 9) as i32, 1 + id % 12, 1 + id % 28).unwrap(),
        age: 25 + id % 30,
        location: if id % 2 == 0 { "Remote" } else { "Austin" }.to_string(),
        performance_rating: rating_tenths as f64 / 10.0,
        projects_completed: id % 40,
        is_active,
        skills: (0..skills).map(|i| format!("Skill{}", i)).collect(),
        manager: None,
    }
}

/// Records with unique ids 1..=n
fn records_strategy() -> impl Strategy<Value = Vec<EmployeeRecord>> {
    vec((0usize..5, 0u32..250_000, 0u8..=50, any::<bool>(), 0usize..5), 0..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (dept, salary, rating, active, skills))| {
                employee(i as u32 + 1, dept, salary, rating, active, skills)
            })
            .collect()
    })
}

proptest! {
    /// totalEmployees counts exactly the active records
    #[test]
    fn total_employees_counts_active(records in records_strategy()) {
        let stats = summarize(&records);
        prop_assert_eq!(stats.total_employees, records.iter().filter(|r| r.is_active).count());
    }

    /// totalSalary sums active salaries; zero with nobody active
    #[test]
    fn total_salary_sums_active(records in records_strategy()) {
        let stats = summarize(&records);
        let expected: f64 = records.iter().filter(|r| r.is_active).map(|r| r.salary).sum();
        prop_assert_eq!(stats.total_salary, expected);
    }

    /// Averages are never NaN; zero sentinel when nobody is active
    #[test]
    fn averages_total(records in records_strategy()) {
        let stats = summarize(&records);
        prop_assert!(!stats.avg_salary.is_nan());
        prop_assert!(!stats.avg_performance.is_nan());

        if stats.total_employees > 0 {
            let expected = stats.total_salary / stats.total_employees as f64;
            prop_assert_eq!(stats.avg_salary, expected);
            prop_assert!((0.0..=5.0).contains(&stats.avg_performance));
        } else {
            prop_assert_eq!(stats.avg_salary, 0.0);
            prop_assert_eq!(stats.avg_performance, 0.0);
        }
    }

    /// departments is the cardinality of distinct active department names
    #[test]
    fn departments_is_distinct_count(records in records_strategy()) {
        let stats = summarize(&records);
        let expected: HashSet<&str> = records
            .iter()
            .filter(|r| r.is_active)
            .map(|r| r.department.as_str())
            .collect();
        prop_assert_eq!(stats.departments, expected.len());
    }

    /// No hidden state: repeated calls agree
    #[test]
    fn summarize_is_idempotent(records in records_strategy()) {
        prop_assert_eq!(summarize(&records), summarize(&records));
    }

    /// Order of the input does not change the result
    #[test]
    fn summarize_ignores_order(records in records_strategy()) {
        let mut reversed = records.clone();
        reversed.reverse();
        let a = summarize(&records);
        let b = summarize(&reversed);
        prop_assert_eq!(a.total_employees, b.total_employees);
        prop_assert_eq!(a.departments, b.departments);
        prop_assert_eq!(a.avg_performance, b.avg_performance);
    }

    /// Pages partition the filtered view in order
    #[test]
    fn pagination_partitions_view(records in records_strategy(), page_size in prop::sample::select(vec![10usize, 20])) {
        registry::initialize();
        let base = GridQuery::new()
            .with_page_size(page_size).unwrap()
            .with_sort(ColumnField::Salary, SortDirection::Desc).unwrap();
        let view = grid::filtered_view(&records, &base).unwrap();

        let first = grid::apply(&records, &base).unwrap();
        let mut collected = Vec::new();
        for page in 0..first.page_count {
            let p = grid::apply(&records, &base.clone().with_page(page)).unwrap();
            prop_assert!(p.rows.len() <= page_size);
            collected.extend(p.rows.iter().map(|r| r.id));
        }

        let expected: Vec<u32> = view.iter().map(|r| r.id).collect();
        prop_assert_eq!(collected, expected);
    }

    /// Sorting is stable and ordered
    #[test]
    fn sort_is_ordered_and_stable(records in records_strategy()) {
        registry::initialize();
        let query = GridQuery::new().with_sort(ColumnField::Department, SortDirection::Asc).unwrap();
        let view = grid::filtered_view(&records, &query).unwrap();

        for pair in view.windows(2) {
            prop_assert!(pair[0].department <= pair[1].department);
            if pair[0].department == pair[1].department {
                // ids were assigned in input order
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    /// Active filter in the grid agrees with the aggregator's active count
    #[test]
    fn active_filter_matches_summary(records in records_strategy()) {
        registry::initialize();
        let query = GridQuery::new().with_filter(ColumnField::IsActive, ColumnFilter::Boolean(true)).unwrap();
        let view = grid::filtered_view(&records, &query).unwrap();
        prop_assert_eq!(view.len(), summarize(&records).total_employees);
    }

    /// Export writes one header plus one line per in-scope record
    #[test]
    fn export_row_count_matches_scope(records in records_strategy()) {
        let all = export_to_string(&records, ExportScope::All).unwrap();
        let active = export_to_string(&records, ExportScope::Active).unwrap();

        let count = |text: &str| csv::Reader::from_reader(text.as_bytes()).records().count();
        prop_assert_eq!(count(&all), records.len());
        prop_assert_eq!(count(&active), records.iter().filter(|r| r.is_active).count());
    }

    /// Generated datasets always satisfy the store invariants
    #[test]
    fn store_accepts_valid_records(records in records_strategy()) {
        let len = records.len();
        let store = EmployeeStore::from_records(records).unwrap();
        prop_assert_eq!(store.len(), len);
    }
}
