// Cell rendering - per-column display formatting
//
// Dispatch is a plain map from column field to formatter function.
// The TUI, the API and the CLI listing all render through here.

use crate::columns::ColumnField;
use crate::employee::EmployeeRecord;
use std::collections::HashMap;

/// Default hire date format (US locale style, e.g. 9/4/2021)
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Skills shown before collapsing into "+N more"
pub const MAX_VISIBLE_SKILLS: usize = 2;

pub type CellFormatter = fn(&EmployeeRecord, &RenderOptions) -> String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub date_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

// ============================================================================
// PERFORMANCE BANDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceBand {
    Excellent, // >= 4.5
    Good,      // >= 4.0
    Fair,      // >= 3.5
    Poor,
}

impl PerformanceBand {
    pub fn for_rating(rating: f64) -> Self {
        if rating >= 4.5 {
            PerformanceBand::Excellent
        } else if rating >= 4.0 {
            PerformanceBand::Good
        } else if rating >= 3.5 {
            PerformanceBand::Fair
        } else {
            PerformanceBand::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent",
            PerformanceBand::Good => "Good",
            PerformanceBand::Fair => "Fair",
            PerformanceBand::Poor => "Poor",
        }
    }
}

// ============================================================================
// RENDERER REGISTRY
// ============================================================================

pub struct CellRenderers {
    formatters: HashMap<ColumnField, CellFormatter>,
    options: RenderOptions,
}

impl CellRenderers {
    pub fn new(options: RenderOptions) -> Self {
        let mut formatters: HashMap<ColumnField, CellFormatter> = HashMap::new();

        formatters.insert(ColumnField::Id, |r, _| r.id.to_string());
        formatters.insert(ColumnField::FirstName, |r, _| r.first_name.clone());
        formatters.insert(ColumnField::LastName, |r, _| r.last_name.clone());
        formatters.insert(ColumnField::Email, |r, _| r.email.clone());
        formatters.insert(ColumnField::Department, |r, _| r.department.clone());
        formatters.insert(ColumnField::Position, |r, _| r.position.clone());
        formatters.insert(ColumnField::Salary, |r, _| format_currency(r.salary));
        formatters.insert(ColumnField::HireDate, |r, opts| {
            r.hire_date.format(&opts.date_format).to_string()
        });
        formatters.insert(ColumnField::Age, |r, _| r.age.to_string());
        formatters.insert(ColumnField::Location, |r, _| r.location.clone());
        formatters.insert(ColumnField::PerformanceRating, |r, _| {
            render_performance(r.performance_rating)
        });
        formatters.insert(ColumnField::ProjectsCompleted, |r, _| {
            r.projects_completed.to_string()
        });
        formatters.insert(ColumnField::IsActive, |r, _| status_label(r.is_active).to_string());
        formatters.insert(ColumnField::Skills, |r, _| render_skills(&r.skills));
        formatters.insert(ColumnField::Manager, |r, _| {
            r.manager_name().unwrap_or_default().to_string()
        });

        CellRenderers {
            formatters,
            options,
        }
    }

    pub fn render(&self, field: ColumnField, record: &EmployeeRecord) -> String {
        match self.formatters.get(&field) {
            Some(format) => format(record, &self.options),
            None => String::new(),
        }
    }

    /// Render a whole row in the given column order
    pub fn render_row(&self, fields: &[ColumnField], record: &EmployeeRecord) -> Vec<String> {
        fields.iter().map(|f| self.render(*f, record)).collect()
    }
}

impl Default for CellRenderers {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

// ============================================================================
// FORMATTERS
// ============================================================================

pub fn status_label(is_active: bool) -> &'static str {
    if is_active {
        "Active"
    } else {
        "Inactive"
    }
}

/// `$85,000`, or `$85,000.5` when there are cents
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * 100.0).round();

    if cents == 0.0 {
        return format!("{}${}", sign, group_thousands(whole as u64));
    }
    if cents >= 100.0 {
        return format!("{}${}", sign, group_thousands(whole as u64 + 1));
    }

    let fraction = format!("{:02}", cents as u64);
    let fraction = fraction.trim_end_matches('0');
    format!("{}${}.{}", sign, group_thousands(whole as u64), fraction)
}

/// Whole-dollar currency for the summary card
pub fn format_currency_rounded(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Stars for a rating: star k is filled when k <= floor(rating)
pub fn stars(rating: f64) -> String {
    let filled = rating.floor().clamp(0.0, 5.0) as usize;
    (1..=5).map(|k| if k <= filled { '★' } else { '☆' }).collect()
}

pub fn render_performance(rating: f64) -> String {
    format!("{} {}", rating, stars(rating))
}

pub fn render_skills(skills: &[String]) -> String {
    let mut out = skills
        .iter()
        .take(MAX_VISIBLE_SKILLS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    if skills.len() > MAX_VISIBLE_SKILLS {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("+{} more", skills.len() - MAX_VISIBLE_SKILLS));
    }

    out
}
