//! Weekly timetable generation.
//!
//! A class's curriculum is expanded into one block per weekly hour, the
//! blocks are shuffled and then placed first-fit onto the class's grid,
//! honouring teacher availability and the teacher cells other classes
//! already hold. Blocks that fit nowhere are reported, not retried.

pub mod blocks;
pub mod generate;
pub mod grid;
pub mod index;
pub mod placer;
pub mod validation;
pub mod view;

pub use blocks::{expand_blocks, Block};
pub use generate::{generate_schedule, shuffle_rng, GenerateError, GenerationReport};
pub use grid::{Cell, Day, Grid, DEFAULT_SLOTS_PER_DAY, MAX_SLOTS_PER_DAY};
pub use index::{AvailabilityIndex, OccupancyIndex, TeacherWindow};
pub use placer::{PlacedBlock, Placement, Placer};
pub use validation::{validate_schedule, ValidationError, ValidationErrorKind, ValidationResult};
pub use view::{materialize, render_timetable, view_schedule, SlotView};
