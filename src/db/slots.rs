//! Types for committed schedule slots.

use serde::{Deserialize, Serialize};

use crate::timetable::Cell;

/// One committed placement of a subject hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub cell: Cell,
}

/// A placement that has not been written yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlot {
    pub subject_id: i64,
    pub cell: Cell,
}

/// A slot together with the teacher of its subject, used for
/// cross-class conflict checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeacherSlot {
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub cell: Cell,
}
