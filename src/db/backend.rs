//! Store abstraction consumed by schedule generation.
//!
//! Generation only needs five operations from whatever holds the records.
//! [`Database`](super::Database) implements them on SQLite; tests and
//! embedders can provide their own.

use anyhow::Result;

use super::{NewSlot, ScheduleSlot, Subject};
use crate::timetable::{AvailabilityIndex, OccupancyIndex};

/// Records consulted and written by schedule generation.
pub trait ScheduleStore {
    /// Subjects of a class, or `None` if the class does not exist.
    fn load_subjects(&self, class_id: i64) -> Result<Option<Vec<Subject>>>;

    /// Availability windows of the given teachers. Open teachers may be
    /// absent from the returned index.
    fn load_availability(&self, teacher_ids: &[i64]) -> Result<AvailabilityIndex>;

    /// Cells held by the given teachers in every class except `excluding_class_id`.
    fn load_occupied_cells(&self, teacher_ids: &[i64], excluding_class_id: i64) -> Result<OccupancyIndex>;

    /// Atomically delete all slots of `class_id` and insert `slots`.
    /// On error the previous slots are left untouched.
    fn replace_slots(&self, class_id: i64, slots: &[NewSlot]) -> Result<Vec<ScheduleSlot>>;

    /// Slots of a class, ordered by day then slot.
    fn read_slots(&self, class_id: i64) -> Result<Vec<ScheduleSlot>>;
}
