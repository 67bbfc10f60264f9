// CSV export of the employee table
//
// Header row = column headers in grid order, one data row per record.
// Values are raw and locale-independent so the file round-trips into
// spreadsheets: plain decimals, ISO dates, true/false, skills joined by ", ".

use crate::columns::{self, ColumnField};
use crate::employee::EmployeeRecord;
use crate::error::ExportError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    #[default]
    All,
    Active,
}

impl ExportScope {
    pub fn includes(&self, record: &EmployeeRecord) -> bool {
        match self {
            ExportScope::All => true,
            ExportScope::Active => record.is_active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportScope::All => "all",
            ExportScope::Active => "active",
        }
    }
}

impl FromStr for ExportScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ExportScope::All),
            "active" => Ok(ExportScope::Active),
            other => Err(format!("unknown export scope '{}' (expected all or active)", other)),
        }
    }
}

/// Raw export value of one cell
pub fn export_value(record: &EmployeeRecord, field: ColumnField) -> String {
    match field {
        ColumnField::Id => record.id.to_string(),
        ColumnField::FirstName => record.first_name.clone(),
        ColumnField::LastName => record.last_name.clone(),
        ColumnField::Email => record.email.clone(),
        ColumnField::Department => record.department.clone(),
        ColumnField::Position => record.position.clone(),
        ColumnField::Salary => record.salary.to_string(),
        ColumnField::HireDate => record.hire_date.format("%Y-%m-%d").to_string(),
        ColumnField::Age => record.age.to_string(),
        ColumnField::Location => record.location.clone(),
        ColumnField::PerformanceRating => record.performance_rating.to_string(),
        ColumnField::ProjectsCompleted => record.projects_completed.to_string(),
        ColumnField::IsActive => record.is_active.to_string(),
        ColumnField::Skills => record.skills.join(", "),
        ColumnField::Manager => record.manager_name().unwrap_or_default().to_string(),
    }
}

/// Write the CSV document; returns the number of data rows written
pub fn export_csv<'a, W, I>(writer: W, records: I, scope: ExportScope) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    tracing::info!(scope = scope.as_str(), "exporting to CSV");

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns::headers())?;

    let fields = columns::fields();
    let mut rows = 0;

    for record in records.into_iter().filter(|r| scope.includes(r)) {
        csv_writer.write_record(fields.iter().map(|f| export_value(record, *f)))?;
        rows += 1;
    }

    csv_writer.flush()?;
    tracing::info!(rows, "CSV export complete");
    Ok(rows)
}

pub fn export_to_path<'a, I>(path: &Path, records: I, scope: ExportScope) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let file = File::create(path)?;
    let rows = export_csv(file, records, scope)?;
    tracing::info!(path = %path.display(), rows, "wrote CSV export");
    Ok(rows)
}

pub fn export_to_string<'a, I>(records: I, scope: ExportScope) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let mut buffer = Vec::new();
    export_csv(&mut buffer, records, scope)?;
    // csv output of String fields is always UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
