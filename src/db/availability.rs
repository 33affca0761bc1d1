//! Types for teacher availability.

use serde::{Deserialize, Serialize};

use crate::timetable::Cell;

/// How a teacher's availability rows are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityMode {
    /// Schedulable in every cell.
    #[default]
    Open,
    /// Schedulable only in the listed cells. No cells means nowhere.
    Restricted,
}

impl AvailabilityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityMode::Open => "open",
            AvailabilityMode::Restricted => "restricted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(AvailabilityMode::Open),
            "restricted" => Some(AvailabilityMode::Restricted),
            _ => None,
        }
    }
}

/// One declared cell in which a teacher may be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherAvailability {
    pub id: i64,
    pub teacher_id: i64,
    pub cell: Cell,
}
