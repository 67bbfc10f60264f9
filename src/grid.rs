// Grid model - sorting, filtering and pagination over the record store
//
// A GridQuery describes the view; apply() projects the records through it.
// Filtering never reorders, sorting is stable, pagination partitions the
// filtered view exactly.

use crate::columns::{ColumnField, FilterKind};
use crate::employee::EmployeeRecord;
use crate::error::GridError;
use crate::registry;
use crate::render::status_label;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Page sizes offered by the page size selector
pub const PAGE_SIZE_OPTIONS: [usize; 2] = [10, 20];
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: ColumnField,
    pub direction: SortDirection,
}

/// Comparable projection of one cell
#[derive(Debug, Clone, PartialEq)]
enum CellValue<'a> {
    Number(f64),
    Text(&'a str),
    Owned(String),
    Date(NaiveDate),
    Bool(bool),
}

fn cell_value(record: &EmployeeRecord, field: ColumnField) -> CellValue<'_> {
    match field {
        ColumnField::Id => CellValue::Number(record.id as f64),
        ColumnField::FirstName => CellValue::Text(&record.first_name),
        ColumnField::LastName => CellValue::Text(&record.last_name),
        ColumnField::Email => CellValue::Text(&record.email),
        ColumnField::Department => CellValue::Text(&record.department),
        ColumnField::Position => CellValue::Text(&record.position),
        ColumnField::Salary => CellValue::Number(record.salary),
        ColumnField::HireDate => CellValue::Date(record.hire_date),
        ColumnField::Age => CellValue::Number(record.age as f64),
        ColumnField::Location => CellValue::Text(&record.location),
        ColumnField::PerformanceRating => CellValue::Number(record.performance_rating),
        ColumnField::ProjectsCompleted => CellValue::Number(record.projects_completed as f64),
        ColumnField::IsActive => CellValue::Bool(record.is_active),
        ColumnField::Skills => CellValue::Owned(record.skills.join(", ")),
        ColumnField::Manager => CellValue::Text(record.manager_name().unwrap_or_default()),
    }
}

fn compare_cells(a: &CellValue<'_>, b: &CellValue<'_>) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        (CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
        _ => text_of(a).cmp(text_of(b)),
    }
}

fn text_of<'v>(value: &'v CellValue<'_>) -> &'v str {
    match value {
        CellValue::Text(s) => s,
        CellValue::Owned(s) => s.as_str(),
        _ => "",
    }
}

// ============================================================================
// FILTERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NumberCondition {
    Equals { value: f64 },
    NotEqual { value: f64 },
    LessThan { value: f64 },
    LessThanOrEqual { value: f64 },
    GreaterThan { value: f64 },
    GreaterThanOrEqual { value: f64 },
    /// Inclusive at both ends
    InRange { from: f64, to: f64 },
}

impl NumberCondition {
    fn matches(&self, n: f64) -> bool {
        match *self {
            NumberCondition::Equals { value } => n == value,
            NumberCondition::NotEqual { value } => n != value,
            NumberCondition::LessThan { value } => n < value,
            NumberCondition::LessThanOrEqual { value } => n <= value,
            NumberCondition::GreaterThan { value } => n > value,
            NumberCondition::GreaterThanOrEqual { value } => n >= value,
            NumberCondition::InRange { from, to } => n >= from && n <= to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DateCondition {
    Equals { date: NaiveDate },
    Before { date: NaiveDate },
    After { date: NaiveDate },
    /// Inclusive at both ends
    InRange { from: NaiveDate, to: NaiveDate },
}

impl DateCondition {
    fn matches(&self, d: NaiveDate) -> bool {
        match *self {
            DateCondition::Equals { date } => d == date,
            DateCondition::Before { date } => d < date,
            DateCondition::After { date } => d > date,
            DateCondition::InRange { from, to } => d >= from && d <= to,
        }
    }
}

/// Case-insensitive text match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TextCondition {
    Contains { text: String },
    Equals { text: String },
    StartsWith { text: String },
}

impl TextCondition {
    fn matches(&self, s: &str) -> bool {
        let haystack = s.to_lowercase();
        match self {
            TextCondition::Contains { text } => haystack.contains(&text.to_lowercase()),
            TextCondition::Equals { text } => haystack == text.to_lowercase(),
            TextCondition::StartsWith { text } => haystack.starts_with(&text.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "condition", rename_all = "camelCase")]
pub enum ColumnFilter {
    Text(TextCondition),
    /// Exact, case-sensitive membership
    Set(Vec<String>),
    Number(NumberCondition),
    Date(DateCondition),
    Boolean(bool),
}

impl ColumnFilter {
    pub fn kind(&self) -> FilterKind {
        match self {
            ColumnFilter::Text(_) => FilterKind::Text,
            ColumnFilter::Set(_) => FilterKind::Set,
            ColumnFilter::Number(_) => FilterKind::Number,
            ColumnFilter::Date(_) => FilterKind::Date,
            ColumnFilter::Boolean(_) => FilterKind::Boolean,
        }
    }

    fn matches(&self, record: &EmployeeRecord, field: ColumnField) -> bool {
        let value = cell_value(record, field);
        match (self, &value) {
            (ColumnFilter::Set(allowed), _) => allowed.iter().any(|a| a == text_of(&value)),
            (ColumnFilter::Number(cond), CellValue::Number(n)) => cond.matches(*n),
            (ColumnFilter::Date(cond), CellValue::Date(d)) => cond.matches(*d),
            (ColumnFilter::Boolean(expected), CellValue::Bool(b)) => expected == b,
            (ColumnFilter::Text(cond), CellValue::Number(n)) => cond.matches(&n.to_string()),
            (ColumnFilter::Text(cond), CellValue::Date(d)) => {
                cond.matches(&d.format("%Y-%m-%d").to_string())
            }
            (ColumnFilter::Text(cond), CellValue::Bool(b)) => cond.matches(status_label(*b)),
            (ColumnFilter::Text(cond), _) => cond.matches(text_of(&value)),
            // kind mismatches are rejected when the filter is added
            _ => false,
        }
    }
}

// ============================================================================
// QUERY
// ============================================================================

/// Deserialized queries go through the same checks as the setters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGridQuery")]
pub struct GridQuery {
    sort: Option<SortSpec>,
    filters: Vec<(ColumnField, ColumnFilter)>,
    page: usize,
    page_size: usize,
}

#[derive(Deserialize)]
struct RawGridQuery {
    #[serde(default)]
    sort: Option<SortSpec>,
    #[serde(default)]
    filters: Vec<(ColumnField, ColumnFilter)>,
    #[serde(default)]
    page: usize,
    #[serde(default = "default_page_size")]
    page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl TryFrom<RawGridQuery> for GridQuery {
    type Error = GridError;

    fn try_from(raw: RawGridQuery) -> Result<Self, Self::Error> {
        let mut query = GridQuery::new().with_page_size(raw.page_size)?;
        if let Some(spec) = raw.sort {
            query.set_sort(spec.field, spec.direction)?;
        }
        for (field, filter) in raw.filters {
            query.set_filter(field, filter)?;
        }
        query.set_page(raw.page);
        Ok(query)
    }
}

impl Default for GridQuery {
    fn default() -> Self {
        GridQuery {
            sort: None,
            filters: Vec::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl GridQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn filters(&self) -> &[(ColumnField, ColumnFilter)] {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_sort(&mut self, field: ColumnField, direction: SortDirection) -> Result<(), GridError> {
        if !field.column().sortable {
            return Err(GridError::NotSortable(field.as_str()));
        }
        self.sort = Some(SortSpec { field, direction });
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Set the filter for a column, replacing any existing one.
    /// Changing filters returns to the first page.
    pub fn set_filter(&mut self, field: ColumnField, filter: ColumnFilter) -> Result<(), GridError> {
        let column = field.column();
        if !column.is_filterable() {
            return Err(GridError::NotFilterable(field.as_str()));
        }

        // Text filters are accepted on any filterable column, as the floating filter does
        let kind = filter.kind();
        if kind != column.filter && kind != FilterKind::Text {
            return Err(GridError::FilterMismatch {
                column: field.as_str(),
                filter: kind.as_str(),
            });
        }

        self.filters.retain(|(f, _)| *f != field);
        self.filters.push((field, filter));
        self.page = 0;
        Ok(())
    }

    pub fn remove_filter(&mut self, field: ColumnField) {
        self.filters.retain(|(f, _)| *f != field);
        self.page = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.page = 0;
    }

    pub fn filter_for(&self, field: ColumnField) -> Option<&ColumnFilter> {
        self.filters.iter().find(|(f, _)| *f == field).map(|(_, filter)| filter)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Only sizes offered by the selector are accepted; resets to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), GridError> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(GridError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    // Builder-style helpers
    pub fn with_sort(mut self, field: ColumnField, direction: SortDirection) -> Result<Self, GridError> {
        self.set_sort(field, direction)?;
        Ok(self)
    }

    pub fn with_filter(mut self, field: ColumnField, filter: ColumnFilter) -> Result<Self, GridError> {
        self.set_filter(field, filter)?;
        Ok(self)
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self, GridError> {
        self.set_page_size(page_size)?;
        Ok(self)
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPage<'a> {
    pub rows: Vec<&'a EmployeeRecord>,
    /// Zero-based, clamped to the last page
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_rows: usize,
    /// One-based row numbers shown as "first to last of total"; 0 when empty
    pub first_row: usize,
    pub last_row: usize,
}

fn ensure_initialized() -> Result<(), GridError> {
    if registry::is_initialized() {
        Ok(())
    } else {
        Err(GridError::NotInitialized)
    }
}

/// Filter then sort, without paging
pub fn filtered_view<'a>(
    records: &'a [EmployeeRecord],
    query: &GridQuery,
) -> Result<Vec<&'a EmployeeRecord>, GridError> {
    ensure_initialized()?;

    let mut rows: Vec<&EmployeeRecord> = records
        .iter()
        .filter(|r| query.filters.iter().all(|(field, filter)| filter.matches(r, *field)))
        .collect();

    if let Some(spec) = query.sort {
        // sort_by is stable: ties keep input order in both directions
        rows.sort_by(|a, b| {
            let ord = compare_cells(&cell_value(a, spec.field), &cell_value(b, spec.field));
            match spec.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    Ok(rows)
}

/// Project one page of the grid
pub fn apply<'a>(records: &'a [EmployeeRecord], query: &GridQuery) -> Result<GridPage<'a>, GridError> {
    let view = filtered_view(records, query)?;
    Ok(paginate(view, query.page, query.page_size))
}

fn paginate(view: Vec<&EmployeeRecord>, page: usize, page_size: usize) -> GridPage<'_> {
    let total_rows = view.len();
    let page_count = total_rows.div_ceil(page_size).max(1);
    let page = page.min(page_count - 1);

    let start = page * page_size;
    let end = (start + page_size).min(total_rows);
    let rows: Vec<&EmployeeRecord> = view.into_iter().skip(start).take(end - start).collect();

    GridPage {
        first_row: if rows.is_empty() { 0 } else { start + 1 },
        last_row: end,
        rows,
        page,
        page_size,
        page_count,
        total_rows,
    }
}
