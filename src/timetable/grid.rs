//! The weekly grid: five weekdays by a fixed number of slots per day.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference number of teaching slots in a school day.
pub const DEFAULT_SLOTS_PER_DAY: u8 = 8;

/// Upper bound accepted for `slots_per_day`.
pub const MAX_SLOTS_PER_DAY: u8 = 16;

/// A weekday on the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    /// Days in scan order.
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MON" => Some(Day::Mon),
            "TUE" => Some(Day::Tue),
            "WED" => Some(Day::Wed),
            "THU" => Some(Day::Thu),
            "FRI" => Some(Day::Fri),
            _ => None,
        }
    }

    /// Full weekday name for table headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Day::Mon => "Monday",
            Day::Tue => "Tuesday",
            Day::Wed => "Wednesday",
            Day::Thu => "Thursday",
            Day::Fri => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (day, slot) coordinate. Slots are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub day: Day,
    pub slot: u8,
}

impl Cell {
    pub fn new(day: Day, slot: u8) -> Self {
        Self { day, slot }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.day, self.slot)
    }
}

/// The finite cell space used by availability, occupancy and placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    slots_per_day: u8,
}

impl Grid {
    pub fn new(slots_per_day: u8) -> Self {
        Self { slots_per_day }
    }

    pub fn slots_per_day(&self) -> u8 {
        self.slots_per_day
    }

    pub fn len(&self) -> usize {
        Day::ALL.len() * self.slots_per_day as usize
    }

    pub fn is_empty(&self) -> bool {
        self.slots_per_day == 0
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.slot >= 1 && cell.slot <= self.slots_per_day
    }

    /// All cells, day-major then slot ascending.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Day::ALL
            .into_iter()
            .flat_map(move |day| (1..=self.slots_per_day).map(move |slot| Cell::new(day, slot)))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_SLOTS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_scan_order() {
        let grid = Grid::new(2);
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), 10);
        assert_eq!(cells[0], Cell::new(Day::Mon, 1));
        assert_eq!(cells[1], Cell::new(Day::Mon, 2));
        assert_eq!(cells[2], Cell::new(Day::Tue, 1));
        assert_eq!(cells[9], Cell::new(Day::Fri, 2));
    }

    #[test]
    fn test_default_grid_size() {
        let grid = Grid::default();
        assert_eq!(grid.len(), 40);
        assert_eq!(grid.cells().count(), 40);
    }

    #[test]
    fn test_contains_bounds() {
        let grid = Grid::default();
        assert!(grid.contains(Cell::new(Day::Wed, 1)));
        assert!(grid.contains(Cell::new(Day::Wed, 8)));
        assert!(!grid.contains(Cell::new(Day::Wed, 0)));
        assert!(!grid.contains(Cell::new(Day::Wed, 9)));
    }

    #[test]
    fn test_day_parsing() {
        assert_eq!(Day::from_str("MON"), Some(Day::Mon));
        assert_eq!(Day::from_str("fri"), Some(Day::Fri));
        assert_eq!(Day::from_str("SAT"), None);
        for day in Day::ALL {
            assert_eq!(Day::from_str(day.as_str()), Some(day));
        }
        assert_eq!(Day::Wed.display_name(), "Wednesday");
    }
}
