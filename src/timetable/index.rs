//! Read-only snapshots consulted by the placer: who may teach where, and
//! which teacher cells other classes already hold.

use std::collections::{HashMap, HashSet};

use super::grid::Cell;
use crate::db::AvailabilityMode;

/// Availability of one teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherWindow {
    pub mode: AvailabilityMode,
    pub cells: HashSet<Cell>,
}

impl TeacherWindow {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn restricted(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            mode: AvailabilityMode::Restricted,
            cells: cells.into_iter().collect(),
        }
    }

    pub fn allows(&self, cell: Cell) -> bool {
        match self.mode {
            AvailabilityMode::Open => true,
            AvailabilityMode::Restricted => self.cells.contains(&cell),
        }
    }
}

/// Per-teacher availability. Teachers missing from the index are open.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    windows: HashMap<i64, TeacherWindow>,
}

impl AvailabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, teacher_id: i64, window: TeacherWindow) {
        self.windows.insert(teacher_id, window);
    }

    pub fn window(&self, teacher_id: i64) -> Option<&TeacherWindow> {
        self.windows.get(&teacher_id)
    }

    pub fn allows(&self, teacher_id: i64, cell: Cell) -> bool {
        self.windows
            .get(&teacher_id)
            .map_or(true, |window| window.allows(cell))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl FromIterator<(i64, TeacherWindow)> for AvailabilityIndex {
    fn from_iter<I: IntoIterator<Item = (i64, TeacherWindow)>>(iter: I) -> Self {
        Self {
            windows: iter.into_iter().collect(),
        }
    }
}

/// Teacher cells already taken. Starts as the other classes' slots and
/// grows as the placer commits blocks.
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    busy: HashSet<(i64, Cell)>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, teacher_id: i64, cell: Cell) -> bool {
        self.busy.contains(&(teacher_id, cell))
    }

    /// Returns `false` if the teacher was already busy there.
    pub fn mark_busy(&mut self, teacher_id: i64, cell: Cell) -> bool {
        self.busy.insert((teacher_id, cell))
    }

    pub fn len(&self) -> usize {
        self.busy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.busy.is_empty()
    }
}

impl FromIterator<(i64, Cell)> for OccupancyIndex {
    fn from_iter<I: IntoIterator<Item = (i64, Cell)>>(iter: I) -> Self {
        Self {
            busy: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::Day;

    #[test]
    fn test_missing_teacher_is_open() {
        let index = AvailabilityIndex::new();
        assert!(index.allows(7, Cell::new(Day::Thu, 5)));
    }

    #[test]
    fn test_restricted_window() {
        let mut index = AvailabilityIndex::new();
        index.insert(1, TeacherWindow::restricted([Cell::new(Day::Mon, 1)]));
        assert!(index.allows(1, Cell::new(Day::Mon, 1)));
        assert!(!index.allows(1, Cell::new(Day::Mon, 2)));
    }

    #[test]
    fn test_restricted_without_cells_allows_nothing() {
        let window = TeacherWindow::restricted([]);
        assert!(!window.allows(Cell::new(Day::Mon, 1)));
        assert!(TeacherWindow::open().allows(Cell::new(Day::Mon, 1)));
    }

    #[test]
    fn test_occupancy_mark_busy() {
        let mut busy: OccupancyIndex = [(3, Cell::new(Day::Mon, 1))].into_iter().collect();
        assert!(busy.is_busy(3, Cell::new(Day::Mon, 1)));
        assert!(!busy.is_busy(4, Cell::new(Day::Mon, 1)));
        assert!(!busy.mark_busy(3, Cell::new(Day::Mon, 1)));
        assert!(busy.mark_busy(3, Cell::new(Day::Mon, 2)));
        assert_eq!(busy.len(), 2);
    }
}
