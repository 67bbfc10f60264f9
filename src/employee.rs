use crate::error::LoadError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the employee dataset.
/// Field names follow the dataset's camelCase wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    // ========================================================================
    // ROLE
    // ========================================================================
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
    pub age: u32,
    pub location: String,

    // ========================================================================
    // PERFORMANCE
    // ========================================================================
    pub performance_rating: f64,
    pub projects_completed: u32,
    pub is_active: bool,

    #[serde(default)]
    pub skills: Vec<String>,

    /// None (or empty text) means no manager
    #[serde(default)]
    pub manager: Option<String>,
}

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

impl EmployeeRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Manager name, treating empty text as "no manager"
    pub fn manager_name(&self) -> Option<&str> {
        self.manager.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// Check the per-record invariants.
    /// `index` is the record's position in the dataset, used when the id itself is bad.
    pub fn validate(&self, index: usize) -> Result<(), LoadError> {
        if self.id == 0 {
            return Err(LoadError::InvalidId { index });
        }

        if self.first_name.trim().is_empty() {
            return Err(LoadError::EmptyName {
                id: self.id,
                field: "firstName",
            });
        }
        if self.last_name.trim().is_empty() {
            return Err(LoadError::EmptyName {
                id: self.id,
                field: "lastName",
            });
        }

        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(LoadError::InvalidSalary {
                id: self.id,
                salary: self.salary,
            });
        }

        if !(RATING_MIN..=RATING_MAX).contains(&self.performance_rating) {
            return Err(LoadError::RatingOutOfRange {
                id: self.id,
                rating: self.performance_rating,
            });
        }

        Ok(())
    }
}
