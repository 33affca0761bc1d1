//! Types for class groups, teachers and curriculum subjects.

use serde::{Deserialize, Serialize};

/// A teacher. Identity and authentication live elsewhere; only the display
/// name is needed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
}

/// A class group. Owns its subjects and schedule slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: i64,
    pub name: String,
    pub education_level: String,
    pub head_teacher_id: Option<i64>,
}

/// A curricular line item of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub class_id: i64,
    pub name: String,
    pub teacher_id: Option<i64>,
    pub hours_weekly: u32,
}

/// Input for [`set_curriculum`](super::Database::set_curriculum).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
    #[serde(default)]
    pub teacher_id: Option<i64>,
    pub hours_weekly: u32,
}
