// Column configuration for the employee grid

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// COLUMN FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnField {
    Id,
    FirstName,
    LastName,
    Email,
    Department,
    Position,
    Salary,
    HireDate,
    Age,
    Location,
    PerformanceRating,
    ProjectsCompleted,
    IsActive,
    Skills,
    Manager,
}

impl ColumnField {
    pub const ALL: [ColumnField; 15] = [
        ColumnField::Id,
        ColumnField::FirstName,
        ColumnField::LastName,
        ColumnField::Email,
        ColumnField::Department,
        ColumnField::Position,
        ColumnField::Salary,
        ColumnField::HireDate,
        ColumnField::Age,
        ColumnField::Location,
        ColumnField::PerformanceRating,
        ColumnField::ProjectsCompleted,
        ColumnField::IsActive,
        ColumnField::Skills,
        ColumnField::Manager,
    ];

    /// Wire name, matching the dataset's field names
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnField::Id => "id",
            ColumnField::FirstName => "firstName",
            ColumnField::LastName => "lastName",
            ColumnField::Email => "email",
            ColumnField::Department => "department",
            ColumnField::Position => "position",
            ColumnField::Salary => "salary",
            ColumnField::HireDate => "hireDate",
            ColumnField::Age => "age",
            ColumnField::Location => "location",
            ColumnField::PerformanceRating => "performanceRating",
            ColumnField::ProjectsCompleted => "projectsCompleted",
            ColumnField::IsActive => "isActive",
            ColumnField::Skills => "skills",
            ColumnField::Manager => "manager",
        }
    }

    pub fn column(&self) -> &'static ColumnDef {
        // COLUMNS is declared in ALL order
        &COLUMNS[*self as usize]
    }
}

impl fmt::Display for ColumnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnField {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GridError::UnknownColumn(s.to_string()))
    }
}

// ============================================================================
// COLUMN DEFINITIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    Text,
    Set,
    Number,
    Date,
    Boolean,
    None,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Text => "text",
            FilterKind::Set => "set",
            FilterKind::Number => "number",
            FilterKind::Date => "date",
            FilterKind::Boolean => "boolean",
            FilterKind::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Pin {
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub field: ColumnField,
    pub header_name: &'static str,
    pub width: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<Pin>,
    pub filter: FilterKind,
    pub numeric: bool,
    pub sortable: bool,
    pub resizable: bool,
    pub floating_filter: bool,
}

impl ColumnDef {
    /// Default column definition: sortable, filterable, resizable, floating filter
    const fn new(field: ColumnField, header_name: &'static str, width: u16, filter: FilterKind) -> Self {
        ColumnDef {
            field,
            header_name,
            width,
            pinned: None,
            filter,
            numeric: false,
            sortable: true,
            resizable: true,
            floating_filter: true,
        }
    }

    const fn pinned_left(mut self) -> Self {
        self.pinned = Some(Pin::Left);
        self
    }

    const fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    pub fn is_filterable(&self) -> bool {
        self.filter != FilterKind::None
    }
}

pub const COLUMNS: [ColumnDef; 15] = [
    ColumnDef::new(ColumnField::Id, "ID", 70, FilterKind::Text).pinned_left(),
    ColumnDef::new(ColumnField::FirstName, "First Name", 120, FilterKind::Text).pinned_left(),
    ColumnDef::new(ColumnField::LastName, "Last Name", 120, FilterKind::Text).pinned_left(),
    ColumnDef::new(ColumnField::Email, "Email", 200, FilterKind::Text),
    ColumnDef::new(ColumnField::Department, "Department", 130, FilterKind::Set),
    ColumnDef::new(ColumnField::Position, "Position", 180, FilterKind::Text),
    ColumnDef::new(ColumnField::Salary, "Salary", 120, FilterKind::Number).numeric(),
    ColumnDef::new(ColumnField::HireDate, "Hire Date", 120, FilterKind::Date),
    ColumnDef::new(ColumnField::Age, "Age", 80, FilterKind::Number).numeric(),
    ColumnDef::new(ColumnField::Location, "Location", 120, FilterKind::Set),
    ColumnDef::new(ColumnField::PerformanceRating, "Performance", 150, FilterKind::Number).numeric(),
    ColumnDef::new(ColumnField::ProjectsCompleted, "Projects", 100, FilterKind::Number).numeric(),
    ColumnDef::new(ColumnField::IsActive, "Status", 100, FilterKind::Boolean),
    ColumnDef::new(ColumnField::Skills, "Skills", 200, FilterKind::None),
    ColumnDef::new(ColumnField::Manager, "Manager", 150, FilterKind::Text),
];

pub fn default_columns() -> &'static [ColumnDef] {
    &COLUMNS
}

pub fn headers() -> Vec<&'static str> {
    COLUMNS.iter().map(|c| c.header_name).collect()
}

pub fn fields() -> Vec<ColumnField> {
    COLUMNS.iter().map(|c| c.field).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_declared_in_field_order() {
        for (i, field) in ColumnField::ALL.iter().enumerate() {
            assert_eq!(COLUMNS[i].field, *field);
            assert_eq!(field.column().field, *field);
        }
    }

    #[test]
    fn test_pinned_columns() {
        let pinned: Vec<&str> = COLUMNS
            .iter()
            .filter(|c| c.pinned == Some(Pin::Left))
            .map(|c| c.header_name)
            .collect();
        assert_eq!(pinned, vec!["ID", "First Name", "Last Name"]);
    }

    #[test]
    fn test_numeric_columns() {
        let numeric: Vec<ColumnField> = COLUMNS.iter().filter(|c| c.numeric).map(|c| c.field).collect();
        assert_eq!(
            numeric,
            vec![
                ColumnField::Salary,
                ColumnField::Age,
                ColumnField::PerformanceRating,
                ColumnField::ProjectsCompleted,
            ]
        );
    }

    #[test]
    fn test_skills_not_filterable() {
        assert!(!ColumnField::Skills.column().is_filterable());
        assert!(ColumnField::Department.column().is_filterable());
        assert_eq!(ColumnField::Location.column().filter, FilterKind::Set);
    }

    #[test]
    fn test_parse_field_names() {
        assert_eq!("salary".parse::<ColumnField>().unwrap(), ColumnField::Salary);
        assert_eq!("hireDate".parse::<ColumnField>().unwrap(), ColumnField::HireDate);
        assert_eq!("HIREDATE".parse::<ColumnField>().unwrap(), ColumnField::HireDate);
        assert_eq!(
            "bonus".parse::<ColumnField>(),
            Err(GridError::UnknownColumn("bonus".to_string()))
        );
    }

    #[test]
    fn test_headers() {
        let headers = headers();
        assert_eq!(headers.len(), 15);
        assert_eq!(headers[10], "Performance");
        assert_eq!(headers[12], "Status");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ColumnField::Id.column()).unwrap();
        assert_eq!(json["field"], "id");
        assert_eq!(json["headerName"], "ID");
        assert_eq!(json["pinned"], "left");
        assert_eq!(json["floatingFilter"], true);

        let json = serde_json::to_value(ColumnField::Email.column()).unwrap();
        assert!(json.get("pinned").is_none());
    }
}
