//! First-fit greedy placement of blocks onto a class's weekly grid.
//!
//! Blocks are shuffled with the injected random source, then each block takes
//! the first cell, in day-then-slot order, that is:
//! 1. still free in this class,
//! 2. inside the teacher's availability window (restricted teachers only),
//! 3. not already held by the same teacher in any class.
//!
//! A placed block is never moved. A block with no acceptable cell is reported
//! by subject name and the run continues with the next block.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use super::blocks::Block;
use super::grid::{Cell, Grid};
use super::index::{AvailabilityIndex, OccupancyIndex};

/// A block committed to a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedBlock {
    pub block: Block,
    pub cell: Cell,
}

/// Outcome of one placement run.
#[derive(Debug, Clone, Default)]
pub struct Placement {
    pub placed: Vec<PlacedBlock>,
    /// Subject name of every block that found no cell, once per missing hour.
    pub unplaced: Vec<String>,
}

impl Placement {
    pub fn total_blocks(&self) -> usize {
        self.placed.len() + self.unplaced.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

pub struct Placer<'a> {
    grid: Grid,
    availability: &'a AvailabilityIndex,
    occupancy: OccupancyIndex,
    filled: HashSet<Cell>,
}

impl<'a> Placer<'a> {
    /// `occupancy` holds the other classes' teacher cells; this class's grid
    /// starts empty.
    pub fn new(grid: Grid, availability: &'a AvailabilityIndex, occupancy: OccupancyIndex) -> Self {
        Self {
            grid,
            availability,
            occupancy,
            filled: HashSet::with_capacity(grid.len()),
        }
    }

    /// Shuffle `blocks` with `rng`, then place them first-fit.
    pub fn place<R: Rng + ?Sized>(self, mut blocks: Vec<Block>, rng: &mut R) -> Placement {
        blocks.shuffle(rng);
        self.place_in_order(blocks)
    }

    /// Place `blocks` first-fit in the given order.
    pub fn place_in_order(mut self, blocks: Vec<Block>) -> Placement {
        let mut placement = Placement::default();

        for block in blocks {
            match self.find_cell(&block) {
                Some(cell) => {
                    self.commit(&block, cell);
                    tracing::trace!(subject = %block.subject_name, %cell, "Placed block");
                    placement.placed.push(PlacedBlock { block, cell });
                }
                None => {
                    tracing::debug!(subject = %block.subject_name, "No free cell for block");
                    placement.unplaced.push(block.subject_name);
                }
            }
        }

        placement
    }

    fn find_cell(&self, block: &Block) -> Option<Cell> {
        self.grid.cells().find(|&cell| self.accepts(block, cell))
    }

    fn accepts(&self, block: &Block, cell: Cell) -> bool {
        if self.filled.contains(&cell) {
            return false;
        }
        match block.teacher_id {
            Some(teacher_id) => {
                self.availability.allows(teacher_id, cell) && !self.occupancy.is_busy(teacher_id, cell)
            }
            None => true,
        }
    }

    fn commit(&mut self, block: &Block, cell: Cell) {
        self.filled.insert(cell);
        if let Some(teacher_id) = block.teacher_id {
            self.occupancy.mark_busy(teacher_id, cell);
        }
    }
}
