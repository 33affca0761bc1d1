//! Post-hoc checks of committed schedules.
//!
//! Detects:
//! - Two slots of one class in the same cell
//! - One teacher in two slots of the same cell, across all classes
//! - Slots outside a restricted teacher's declared cells
//! - Slots beyond the configured grid

use std::collections::HashMap;

use super::grid::{Cell, Grid};
use super::index::AvailabilityIndex;
use crate::db::TeacherSlot;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A class holds two slots in one cell.
    ClassDoubleBooked,
    /// A teacher holds two slots in one cell.
    TeacherDoubleBooked,
    /// A restricted teacher is scheduled outside their cells.
    OutsideAvailability,
    /// A slot lies beyond the configured slots per day.
    OutsideGrid,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Check every slot in the system against the placement invariants.
///
/// `Ok(())` if all checks pass, otherwise every detected violation.
pub fn validate_schedule(
    slots: &[TeacherSlot],
    availability: &AvailabilityIndex,
    grid: Grid,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut by_class: HashMap<(i64, Cell), i64> = HashMap::new();
    let mut by_teacher: HashMap<(i64, Cell), i64> = HashMap::new();

    for slot in slots {
        if !grid.contains(slot.cell) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutsideGrid,
                format!(
                    "Class {} has subject {} at {}, beyond {} slots per day",
                    slot.class_id,
                    slot.subject_id,
                    slot.cell,
                    grid.slots_per_day()
                ),
            ));
        }

        if let Some(other) = by_class.insert((slot.class_id, slot.cell), slot.subject_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ClassDoubleBooked,
                format!(
                    "Class {} has subjects {} and {} at {}",
                    slot.class_id, other, slot.subject_id, slot.cell
                ),
            ));
        }

        let Some(teacher_id) = slot.teacher_id else {
            continue;
        };

        if let Some(other) = by_teacher.insert((teacher_id, slot.cell), slot.class_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::TeacherDoubleBooked,
                format!(
                    "Teacher {} is booked in classes {} and {} at {}",
                    teacher_id, other, slot.class_id, slot.cell
                ),
            ));
        }

        if !availability.allows(teacher_id, slot.cell) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutsideAvailability,
                format!(
                    "Teacher {} is not available at {} (class {})",
                    teacher_id, slot.cell, slot.class_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::index::TeacherWindow;
    use crate::timetable::Day;

    fn slot(class_id: i64, subject_id: i64, teacher_id: Option<i64>, day: Day, n: u8) -> TeacherSlot {
        TeacherSlot {
            class_id,
            subject_id,
            teacher_id,
            cell: Cell::new(day, n),
        }
    }

    #[test]
    fn test_valid_schedule() {
        let slots = vec![
            slot(1, 10, Some(1), Day::Mon, 1),
            slot(1, 11, Some(2), Day::Mon, 2),
            slot(2, 20, Some(1), Day::Mon, 2),
        ];
        assert!(validate_schedule(&slots, &AvailabilityIndex::new(), Grid::default()).is_ok());
    }

    #[test]
    fn test_class_double_booking() {
        let slots = vec![slot(1, 10, None, Day::Tue, 4), slot(1, 11, None, Day::Tue, 4)];
        let errors = validate_schedule(&slots, &AvailabilityIndex::new(), Grid::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ClassDoubleBooked);
    }

    #[test]
    fn test_teacher_double_booking_across_classes() {
        let slots = vec![slot(1, 10, Some(3), Day::Mon, 1), slot(2, 20, Some(3), Day::Mon, 1)];
        let errors = validate_schedule(&slots, &AvailabilityIndex::new(), Grid::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::TeacherDoubleBooked);
    }

    #[test]
    fn test_outside_availability() {
        let mut availability = AvailabilityIndex::new();
        availability.insert(4, TeacherWindow::restricted([Cell::new(Day::Fri, 1)]));
        let slots = vec![slot(1, 10, Some(4), Day::Fri, 1), slot(1, 10, Some(4), Day::Fri, 2)];

        let errors = validate_schedule(&slots, &availability, Grid::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::OutsideAvailability);
    }

    #[test]
    fn test_outside_grid() {
        let slots = vec![slot(1, 10, None, Day::Mon, 6), slot(1, 10, None, Day::Mon, 7)];

        assert!(validate_schedule(&slots, &AvailabilityIndex::new(), Grid::default()).is_ok());
        let errors = validate_schedule(&slots, &AvailabilityIndex::new(), Grid::new(6)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::OutsideGrid);
    }
}
