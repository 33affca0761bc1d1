//! SQLite backend implementation.

use anyhow::{bail, Result};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::availability::{AvailabilityMode, TeacherAvailability};
use super::classes::{ClassGroup, NewSubject, Subject, Teacher};
use super::schema::SCHEMA;
use super::slots::{NewSlot, ScheduleSlot, TeacherSlot};
use crate::timetable::{AvailabilityIndex, Cell, Day, Grid, OccupancyIndex, TeacherWindow, MAX_SLOTS_PER_DAY};

/// A stored day tag that is not one of the five weekdays.
#[derive(Debug, thiserror::Error)]
#[error("invalid day of week: {0:?}")]
pub struct InvalidDay(pub String);

pub struct SqliteDb {
    pub(crate) conn: Connection,
}

impl SqliteDb {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ========================================================================
    // Teacher operations
    // ========================================================================

    pub fn create_teacher(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO teachers (name) VALUES (?)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_teacher(&self, teacher_id: i64) -> Result<Option<Teacher>> {
        let teacher = self
            .conn
            .query_row(
                "SELECT id, name FROM teachers WHERE id = ?",
                [teacher_id],
                |row| Ok(Teacher { id: row.get(0)?, name: row.get(1)? }),
            )
            .optional()?;
        Ok(teacher)
    }

    pub fn list_teachers(&self) -> Result<Vec<Teacher>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM teachers ORDER BY name, id")?;
        let teachers = stmt
            .query_map([], |row| Ok(Teacher { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teachers)
    }

    // ========================================================================
    // Class operations
    // ========================================================================

    pub fn create_class(
        &self,
        name: &str,
        education_level: &str,
        head_teacher_id: Option<i64>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO class_groups (name, education_level, head_teacher_id) VALUES (?, ?, ?)",
            rusqlite::params![name, education_level, head_teacher_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_class(&self, class_id: i64) -> Result<Option<ClassGroup>> {
        let class = self
            .conn
            .query_row(
                "SELECT id, name, education_level, head_teacher_id FROM class_groups WHERE id = ?",
                [class_id],
                row_to_class,
            )
            .optional()?;
        Ok(class)
    }

    pub fn list_classes(&self) -> Result<Vec<ClassGroup>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, education_level, head_teacher_id FROM class_groups ORDER BY name, id",
        )?;
        let classes = stmt
            .query_map([], row_to_class)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(classes)
    }

    /// Delete a class with its subjects and slots. Returns whether it existed.
    pub fn delete_class(&self, class_id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM class_groups WHERE id = ?", [class_id])?;
        Ok(deleted > 0)
    }

    fn class_exists(&self, class_id: i64) -> Result<bool> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM class_groups WHERE id = ?", [class_id], |_| Ok(()))
            .optional()?
            .is_some();
        Ok(exists)
    }

    // ========================================================================
    // Curriculum operations
    // ========================================================================

    /// Replace the subject list of a class. Slots of the old subjects go with them.
    pub fn set_curriculum(&self, class_id: i64, subjects: &[NewSubject]) -> Result<Vec<Subject>> {
        if !self.class_exists(class_id)? {
            bail!("Class {} not found", class_id);
        }
        if let Some(bad) = subjects.iter().find(|s| s.hours_weekly == 0) {
            bail!("Subject {:?} must have at least one weekly hour", bad.name);
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM class_subjects WHERE class_id = ?", [class_id])?;

        let mut created = Vec::with_capacity(subjects.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO class_subjects (class_id, name, teacher_id, hours_weekly) VALUES (?, ?, ?, ?)",
            )?;
            for subject in subjects {
                let id = stmt.insert(rusqlite::params![
                    class_id,
                    subject.name,
                    subject.teacher_id,
                    subject.hours_weekly,
                ])?;
                created.push(Subject {
                    id,
                    class_id,
                    name: subject.name.clone(),
                    teacher_id: subject.teacher_id,
                    hours_weekly: subject.hours_weekly,
                });
            }
        }
        tx.commit()?;

        Ok(created)
    }

    pub fn get_curriculum(&self, class_id: i64) -> Result<Vec<Subject>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, class_id, name, teacher_id, hours_weekly
            FROM class_subjects
            WHERE class_id = ?
            ORDER BY id
            "#,
        )?;
        let subjects = stmt
            .query_map([class_id], row_to_subject)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(subjects)
    }

    pub fn load_subjects(&self, class_id: i64) -> Result<Option<Vec<Subject>>> {
        if !self.class_exists(class_id)? {
            return Ok(None);
        }
        self.get_curriculum(class_id).map(Some)
    }

    // ========================================================================
    // Availability operations
    // ========================================================================

    /// Declare a cell available. Idempotent; switches the teacher to restricted.
    pub fn set_availability(&self, teacher_id: i64, cell: Cell) -> Result<TeacherAvailability> {
        check_cell(cell)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT OR IGNORE INTO teacher_availability (teacher_id, day_of_week, slot_index)
            VALUES (?, ?, ?)
            "#,
            rusqlite::params![teacher_id, cell.day.as_str(), cell.slot],
        )?;
        upsert_mode(&tx, teacher_id, AvailabilityMode::Restricted)?;
        let id: i64 = tx.query_row(
            r#"
            SELECT id FROM teacher_availability
            WHERE teacher_id = ? AND day_of_week = ? AND slot_index = ?
            "#,
            rusqlite::params![teacher_id, cell.day.as_str(), cell.slot],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(TeacherAvailability { id, teacher_id, cell })
    }

    pub fn get_availability(&self, teacher_id: i64) -> Result<Vec<TeacherAvailability>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, teacher_id, day_of_week, slot_index FROM teacher_availability WHERE teacher_id = ?",
        )?;
        let mut rows = stmt
            .query_map([teacher_id], |row| {
                Ok(TeacherAvailability {
                    id: row.get(0)?,
                    teacher_id: row.get(1)?,
                    cell: read_cell(row, 2, 3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.sort_by_key(|a| a.cell);
        Ok(rows)
    }

    /// Remove one declared cell. The teacher stays restricted.
    pub fn remove_availability(&self, teacher_id: i64, cell: Cell) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM teacher_availability WHERE teacher_id = ? AND day_of_week = ? AND slot_index = ?",
            rusqlite::params![teacher_id, cell.day.as_str(), cell.slot],
        )?;
        Ok(deleted > 0)
    }

    pub fn get_availability_mode(&self, teacher_id: i64) -> Result<AvailabilityMode> {
        let mode: Option<String> = self
            .conn
            .query_row(
                "SELECT mode FROM teacher_availability_modes WHERE teacher_id = ?",
                [teacher_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(mode
            .as_deref()
            .and_then(AvailabilityMode::from_str)
            .unwrap_or_default())
    }

    pub fn set_availability_mode(&self, teacher_id: i64, mode: AvailabilityMode) -> Result<()> {
        upsert_mode(&self.conn, teacher_id, mode)
    }

    /// Drop every declared cell and make the teacher open again.
    pub fn clear_availability(&self, teacher_id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM teacher_availability WHERE teacher_id = ?", [teacher_id])?;
        upsert_mode(&tx, teacher_id, AvailabilityMode::Open)?;
        tx.commit()?;
        Ok(())
    }

    /// Windows of the given teachers. Teachers with cells but no mode row
    /// are treated as restricted.
    pub fn load_availability(&self, teacher_ids: &[i64]) -> Result<AvailabilityIndex> {
        if teacher_ids.is_empty() {
            return Ok(AvailabilityIndex::new());
        }
        let placeholders = placeholders(teacher_ids.len());

        let mut modes: HashMap<i64, AvailabilityMode> = HashMap::new();
        {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT teacher_id, mode FROM teacher_availability_modes WHERE teacher_id IN ({placeholders})"
            ))?;
            let rows = stmt.query_map(params_from_iter(teacher_ids), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (teacher_id, mode) = row?;
                modes.insert(
                    teacher_id,
                    AvailabilityMode::from_str(&mode).unwrap_or(AvailabilityMode::Restricted),
                );
            }
        }

        let mut cells: HashMap<i64, HashSet<Cell>> = HashMap::new();
        {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT teacher_id, day_of_week, slot_index FROM teacher_availability WHERE teacher_id IN ({placeholders})"
            ))?;
            let rows = stmt.query_map(params_from_iter(teacher_ids), |row| {
                Ok((row.get::<_, i64>(0)?, read_cell(row, 1, 2)?))
            })?;
            for row in rows {
                let (teacher_id, cell) = row?;
                cells.entry(teacher_id).or_default().insert(cell);
            }
        }

        let mut index = AvailabilityIndex::new();
        for &teacher_id in teacher_ids {
            let teacher_cells = cells.remove(&teacher_id);
            let mode = match modes.get(&teacher_id) {
                Some(mode) => *mode,
                None if teacher_cells.is_some() => AvailabilityMode::Restricted,
                None => continue,
            };
            let window = match mode {
                AvailabilityMode::Open => TeacherWindow::open(),
                AvailabilityMode::Restricted => TeacherWindow::restricted(teacher_cells.unwrap_or_default()),
            };
            index.insert(teacher_id, window);
        }
        Ok(index)
    }

    /// Windows of every teacher that has a mode row or declared cells.
    pub fn load_all_availability(&self) -> Result<AvailabilityIndex> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT teacher_id FROM teacher_availability_modes
            UNION
            SELECT DISTINCT teacher_id FROM teacher_availability
            "#,
        )?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        self.load_availability(&ids)
    }

    // ========================================================================
    // Schedule slot operations
    // ========================================================================

    pub fn load_occupied_cells(&self, teacher_ids: &[i64], excluding_class_id: i64) -> Result<OccupancyIndex> {
        if teacher_ids.is_empty() {
            return Ok(OccupancyIndex::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT cs.teacher_id, ss.day_of_week, ss.slot_index
            FROM schedule_slots ss
            JOIN class_subjects cs ON cs.id = ss.subject_id
            WHERE cs.teacher_id IN ({}) AND ss.class_id != ?
            "#,
            placeholders(teacher_ids.len())
        ))?;
        let params = teacher_ids.iter().copied().chain(std::iter::once(excluding_class_id));
        let busy = stmt
            .query_map(params_from_iter(params), |row| {
                Ok((row.get::<_, i64>(0)?, read_cell(row, 1, 2)?))
            })?
            .collect::<rusqlite::Result<OccupancyIndex>>()?;
        Ok(busy)
    }

    pub fn replace_slots(&self, class_id: i64, slots: &[NewSlot]) -> Result<Vec<ScheduleSlot>> {
        for slot in slots {
            check_cell(slot.cell)?;
        }
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM schedule_slots WHERE class_id = ?", [class_id])?;

        let mut written = Vec::with_capacity(slots.len());
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO schedule_slots (class_id, subject_id, day_of_week, slot_index)
                VALUES (?, ?, ?, ?)
                "#,
            )?;
            for slot in slots {
                let id = stmt.insert(rusqlite::params![
                    class_id,
                    slot.subject_id,
                    slot.cell.day.as_str(),
                    slot.cell.slot,
                ])?;
                written.push(ScheduleSlot {
                    id,
                    class_id,
                    subject_id: slot.subject_id,
                    cell: slot.cell,
                });
            }
        }
        tx.commit()?;

        written.sort_by_key(|s| s.cell);
        Ok(written)
    }

    pub fn read_slots(&self, class_id: i64) -> Result<Vec<ScheduleSlot>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, class_id, subject_id, day_of_week, slot_index
            FROM schedule_slots
            WHERE class_id = ?
            "#,
        )?;
        let mut slots = stmt
            .query_map([class_id], |row| {
                Ok(ScheduleSlot {
                    id: row.get(0)?,
                    class_id: row.get(1)?,
                    subject_id: row.get(2)?,
                    cell: read_cell(row, 3, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        slots.sort_by_key(|s| s.cell);
        Ok(slots)
    }

    /// Every slot in the system with the teacher of its subject.
    pub fn read_all_teacher_slots(&self) -> Result<Vec<TeacherSlot>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ss.class_id, ss.subject_id, cs.teacher_id, ss.day_of_week, ss.slot_index
            FROM schedule_slots ss
            LEFT JOIN class_subjects cs ON cs.id = ss.subject_id
            ORDER BY ss.class_id, ss.id
            "#,
        )?;
        let slots = stmt
            .query_map([], |row| {
                Ok(TeacherSlot {
                    class_id: row.get(0)?,
                    subject_id: row.get(1)?,
                    teacher_id: row.get(2)?,
                    cell: read_cell(row, 3, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(slots)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Reject cells no configurable grid can hold.
fn check_cell(cell: Cell) -> Result<()> {
    if !Grid::new(MAX_SLOTS_PER_DAY).contains(cell) {
        bail!("Cell {} is off the grid: slot must be between 1 and {}", cell, MAX_SLOTS_PER_DAY);
    }
    Ok(())
}

fn upsert_mode(conn: &Connection, teacher_id: i64, mode: AvailabilityMode) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO teacher_availability_modes (teacher_id, mode) VALUES (?, ?)
        ON CONFLICT(teacher_id) DO UPDATE SET mode = excluded.mode, updated_at = CURRENT_TIMESTAMP
        "#,
        rusqlite::params![teacher_id, mode.as_str()],
    )?;
    Ok(())
}

fn read_cell(row: &Row, day_idx: usize, slot_idx: usize) -> rusqlite::Result<Cell> {
    let tag: String = row.get(day_idx)?;
    let day = Day::from_str(&tag).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            day_idx,
            rusqlite::types::Type::Text,
            Box::new(InvalidDay(tag.clone())),
        )
    })?;
    Ok(Cell::new(day, row.get(slot_idx)?))
}

fn row_to_class(row: &Row) -> rusqlite::Result<ClassGroup> {
    Ok(ClassGroup {
        id: row.get(0)?,
        name: row.get(1)?,
        education_level: row.get(2)?,
        head_teacher_id: row.get(3)?,
    })
}

fn row_to_subject(row: &Row) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        class_id: row.get(1)?,
        name: row.get(2)?,
        teacher_id: row.get(3)?,
        hours_weekly: row.get(4)?,
    })
}
