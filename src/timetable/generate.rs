//! Full regeneration of one class's timetable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeSet;

use super::blocks::expand_blocks;
use super::grid::Grid;
use super::placer::Placer;
use crate::db::{NewSlot, ScheduleSlot, ScheduleStore};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("class {0} not found")]
    ClassNotFound(i64),

    #[error("no subjects defined for class {0}")]
    NoSubjectsDefined(i64),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// What a regeneration committed and what it could not place.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub class_id: i64,
    pub placed: Vec<ScheduleSlot>,
    /// Subject name per block left out, repeated once per missing hour.
    pub unplaced: Vec<String>,
    pub total_blocks: usize,
    pub generated_at: String,
}

impl GenerationReport {
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// Random source for block shuffling: seeded when `seed` is set.
pub fn shuffle_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Regenerate the timetable of `class_id` from scratch.
///
/// The class's previous slots are replaced atomically by the new placement,
/// even when some blocks stay unplaced. Errors leave the store untouched.
pub fn generate_schedule<S, R>(
    store: &S,
    grid: Grid,
    class_id: i64,
    rng: &mut R,
) -> Result<GenerationReport, GenerateError>
where
    S: ScheduleStore + ?Sized,
    R: Rng + ?Sized,
{
    let subjects = store
        .load_subjects(class_id)?
        .ok_or(GenerateError::ClassNotFound(class_id))?;
    if subjects.is_empty() {
        return Err(GenerateError::NoSubjectsDefined(class_id));
    }
    tracing::debug!(class_id, subjects = subjects.len(), "Loaded curriculum");

    let teacher_ids: Vec<i64> = subjects
        .iter()
        .filter_map(|s| s.teacher_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let availability = store.load_availability(&teacher_ids)?;
    let occupancy = store.load_occupied_cells(&teacher_ids, class_id)?;
    tracing::debug!(
        class_id,
        teachers = teacher_ids.len(),
        restricted = availability.len(),
        busy = occupancy.len(),
        "Built availability and occupancy snapshots"
    );

    let blocks = expand_blocks(&subjects);
    let total_blocks = blocks.len();

    let placement = Placer::new(grid, &availability, occupancy).place(blocks, rng);
    for name in &placement.unplaced {
        tracing::warn!(class_id, subject = %name, "Could not place block");
    }

    let new_slots: Vec<NewSlot> = placement
        .placed
        .iter()
        .map(|p| NewSlot {
            subject_id: p.block.subject_id,
            cell: p.cell,
        })
        .collect();
    let placed = store.replace_slots(class_id, &new_slots)?;

    tracing::info!(
        class_id,
        placed = placed.len(),
        unplaced = placement.unplaced.len(),
        total_blocks,
        "Schedule generated"
    );

    Ok(GenerationReport {
        class_id,
        placed,
        unplaced: placement.unplaced,
        total_blocks,
        generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewSubject};
    use crate::timetable::{validate_schedule, Cell, Day};
    use rand::rngs::SmallRng;
    use std::collections::HashSet;

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    fn subject(name: &str, teacher_id: Option<i64>, hours_weekly: u32) -> NewSubject {
        NewSubject {
            name: name.to_string(),
            teacher_id,
            hours_weekly,
        }
    }

    #[test]
    fn test_single_subject_fully_placed() {
        let db = setup();
        let t1 = db.create_teacher("T1").unwrap();
        let class_id = db.create_class("1A", "primary", None).unwrap();
        db.set_curriculum(class_id, &[subject("Math", Some(t1), 3)]).unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let report = generate_schedule(&db, Grid::default(), class_id, &mut rng).unwrap();

        assert_eq!(report.placed_count(), 3);
        assert!(report.is_complete());
        assert_eq!(report.total_blocks, 3);
        assert_eq!(db.read_slots(class_id).unwrap(), report.placed);
    }

    #[test]
    fn test_shared_teacher_with_two_cells() {
        let db = setup();
        let t2 = db.create_teacher("T2").unwrap();
        db.set_availability(t2, Cell::new(Day::Mon, 3)).unwrap();
        db.set_availability(t2, Cell::new(Day::Wed, 6)).unwrap();
        let class_id = db.create_class("1A", "primary", None).unwrap();
        db.set_curriculum(
            class_id,
            &[subject("PE", Some(t2), 2), subject("Music", Some(t2), 2)],
        )
        .unwrap();

        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let report = generate_schedule(&db, Grid::default(), class_id, &mut rng).unwrap();

            assert_eq!(report.placed_count(), 2);
            assert_eq!(report.unplaced.len(), 2);
            let cells: HashSet<Cell> = report.placed.iter().map(|s| s.cell).collect();
            assert_eq!(
                cells,
                HashSet::from([Cell::new(Day::Mon, 3), Cell::new(Day::Wed, 6)])
            );
        }
    }

    #[test]
    fn test_teacher_busy_in_other_class() {
        let db = setup();
        let t3 = db.create_teacher("T3").unwrap();
        let class_a = db.create_class("A", "primary", None).unwrap();
        let class_b = db.create_class("B", "primary", None).unwrap();
        let a_subjects = db.set_curriculum(class_a, &[subject("History", Some(t3), 1)]).unwrap();
        db.replace_slots(
            class_a,
            &[NewSlot {
                subject_id: a_subjects[0].id,
                cell: Cell::new(Day::Mon, 1),
            }],
        )
        .unwrap();
        db.set_curriculum(class_b, &[subject("History", Some(t3), 5)]).unwrap();

        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let report = generate_schedule(&db, Grid::default(), class_b, &mut rng).unwrap();
            assert_eq!(report.placed_count(), 5);
            assert!(report.placed.iter().all(|s| s.cell != Cell::new(Day::Mon, 1)));
        }
    }

    #[test]
    fn test_unknown_class() {
        let db = setup();
        let mut rng = SmallRng::seed_from_u64(1);
        let err = generate_schedule(&db, Grid::default(), 404, &mut rng).unwrap_err();
        assert!(matches!(err, GenerateError::ClassNotFound(404)));
    }

    #[test]
    fn test_no_subjects_defined() {
        let db = setup();
        let class_id = db.create_class("A", "primary", None).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        let err = generate_schedule(&db, Grid::default(), class_id, &mut rng).unwrap_err();
        assert!(matches!(err, GenerateError::NoSubjectsDefined(id) if id == class_id));
        assert!(db.read_slots(class_id).unwrap().is_empty());
    }

    #[test]
    fn test_regeneration_leaves_no_stale_slots() {
        let db = setup();
        let class_id = db.create_class("A", "primary", None).unwrap();
        db.set_curriculum(class_id, &[subject("Math", None, 4), subject("Art", None, 2)])
            .unwrap();

        let mut rng = SmallRng::seed_from_u64(3);
        generate_schedule(&db, Grid::default(), class_id, &mut rng).unwrap();
        let second = generate_schedule(&db, Grid::default(), class_id, &mut rng).unwrap();

        let stored = db.read_slots(class_id).unwrap();
        assert_eq!(stored.len(), 6);
        assert_eq!(stored, second.placed);
    }

    #[test]
    fn test_nothing_placeable_clears_schedule() {
        let db = setup();
        let teacher = db.create_teacher("Busy").unwrap();
        let class_id = db.create_class("A", "primary", None).unwrap();
        db.set_curriculum(class_id, &[subject("Math", Some(teacher), 2)]).unwrap();
        let mut rng = SmallRng::seed_from_u64(5);
        generate_schedule(&db, Grid::default(), class_id, &mut rng).unwrap();

        db.set_availability_mode(teacher, crate::db::AvailabilityMode::Restricted)
            .unwrap();
        let report = generate_schedule(&db, Grid::default(), class_id, &mut rng).unwrap();

        assert_eq!(report.placed_count(), 0);
        assert_eq!(report.unplaced, vec!["Math".to_string(), "Math".to_string()]);
        assert!(db.read_slots(class_id).unwrap().is_empty());
    }

    #[test]
    fn test_invariants_hold_across_classes_and_seeds() {
        let db = setup();
        let teachers: Vec<i64> = (0..4)
            .map(|i| db.create_teacher(&format!("T{i}")).unwrap())
            .collect();
        // Teacher 0 only works mornings.
        for day in Day::ALL {
            for slot in 1..=4 {
                db.set_availability(teachers[0], Cell::new(day, slot)).unwrap();
            }
        }

        let classes: Vec<i64> = (0..3)
            .map(|i| db.create_class(&format!("C{i}"), "secondary", None).unwrap())
            .collect();
        let mut required = 0;
        for &class_id in &classes {
            let subjects = db
                .set_curriculum(
                    class_id,
                    &[
                        subject("Math", Some(teachers[0]), 6),
                        subject("Science", Some(teachers[1]), 5),
                        subject("Language", Some(teachers[2]), 5),
                        subject("Art", Some(teachers[3]), 3),
                        subject("Homeroom", None, 2),
                    ],
                )
                .unwrap();
            required += subjects.iter().map(|s| s.hours_weekly as usize).sum::<usize>();
        }

        for seed in 0..8 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut placed = 0;
            let mut unplaced = 0;
            for &class_id in &classes {
                let report = generate_schedule(&db, Grid::default(), class_id, &mut rng).unwrap();
                assert_eq!(report.placed_count() + report.unplaced.len(), report.total_blocks);
                placed += report.placed_count();
                unplaced += report.unplaced.len();
            }
            assert_eq!(placed + unplaced, required);

            let slots = db.read_all_teacher_slots().unwrap();
            let availability = db.load_all_availability().unwrap();
            assert_eq!(validate_schedule(&slots, &availability, Grid::default()), Ok(()));
        }
    }
}
