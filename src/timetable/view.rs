//! Display projection of a stored timetable.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;

use super::grid::{Cell, Day, Grid};
use crate::db::{Database, ScheduleSlot, ScheduleStore, Subject, Teacher};

/// Subject name shown for a slot whose subject no longer exists.
pub const UNKNOWN_SUBJECT: &str = "Unknown";

/// A slot joined with its subject and teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub day_of_week: Day,
    pub slot_index: u8,
    pub subject_name: String,
    pub teacher_name: Option<String>,
}

impl SlotView {
    pub fn cell(&self) -> Cell {
        Cell::new(self.day_of_week, self.slot_index)
    }
}

/// Join slots with subjects and teachers. Missing references are tolerated.
pub fn materialize(slots: &[ScheduleSlot], subjects: &[Subject], teachers: &[Teacher]) -> Vec<SlotView> {
    let subjects: HashMap<i64, &Subject> = subjects.iter().map(|s| (s.id, s)).collect();
    let teachers: HashMap<i64, &str> = teachers.iter().map(|t| (t.id, t.name.as_str())).collect();

    let mut views: Vec<SlotView> = slots
        .iter()
        .map(|slot| {
            let subject = subjects.get(&slot.subject_id);
            let teacher_name = subject
                .and_then(|s| s.teacher_id)
                .and_then(|id| teachers.get(&id))
                .map(|name| name.to_string());
            SlotView {
                id: slot.id,
                class_id: slot.class_id,
                subject_id: slot.subject_id,
                day_of_week: slot.cell.day,
                slot_index: slot.cell.slot,
                subject_name: subject.map_or_else(|| UNKNOWN_SUBJECT.to_string(), |s| s.name.clone()),
                teacher_name,
            }
        })
        .collect();
    views.sort_by_key(SlotView::cell);
    views
}

/// Stored timetable of a class, ready for display.
pub fn view_schedule(db: &Database, class_id: i64) -> Result<Vec<SlotView>> {
    let slots = db.read_slots(class_id)?;
    let subjects = db.get_curriculum(class_id)?;
    let teachers = db.list_teachers()?;
    Ok(materialize(&slots, &subjects, &teachers))
}

/// Render a slot-by-day table headed by weekday names. Empty cells show as `-`.
pub fn render_timetable(views: &[SlotView], grid: Grid) -> String {
    let by_cell: HashMap<Cell, &SlotView> = views.iter().map(|v| (v.cell(), v)).collect();
    let label = |view: &SlotView| match &view.teacher_name {
        Some(teacher) => format!("{} ({})", view.subject_name, teacher),
        None => view.subject_name.clone(),
    };

    let width = views
        .iter()
        .map(|v| label(v).chars().count())
        .chain(Day::ALL.iter().map(|d| d.display_name().len()))
        .max()
        .unwrap_or(3);

    let mut out = String::new();
    let _ = write!(out, "{:>4}", "");
    for day in Day::ALL {
        let _ = write!(out, " | {:<width$}", day.display_name());
    }
    out.push('\n');

    for slot in 1..=grid.slots_per_day() {
        let _ = write!(out, "{:>4}", slot);
        for day in Day::ALL {
            let text = by_cell
                .get(&Cell::new(day, slot))
                .map_or_else(|| "-".to_string(), |v| label(*v));
            let _ = write!(out, " | {:<width$}", text);
        }
        out.push('\n');
    }
    out
}
