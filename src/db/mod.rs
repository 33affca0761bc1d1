mod schema;
pub mod availability;
pub mod backend;
pub mod classes;
pub mod slots;
pub mod sqlite;

use anyhow::Result;

pub use schema::SCHEMA;
pub use availability::{AvailabilityMode, TeacherAvailability};
pub use backend::ScheduleStore;
pub use classes::{ClassGroup, NewSubject, Subject, Teacher};
pub use slots::{NewSlot, ScheduleSlot, TeacherSlot};

use crate::config::DatabaseConfig;
use crate::timetable::{AvailabilityIndex, Cell, OccupancyIndex};

pub struct Database {
    inner: sqlite::SqliteDb,
}

impl Database {
    /// Open a database connection based on the provided configuration.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let db = sqlite::SqliteDb::open(&config.sqlite_path)?;
        Ok(Self { inner: db })
    }

    /// Open a private in-memory database. The schema is not created.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            inner: sqlite::SqliteDb::open_in_memory()?,
        })
    }

    pub fn initialize(&self) -> Result<()> {
        self.inner.initialize()
    }

    // ========================================================================
    // Teachers and classes
    // ========================================================================

    pub fn create_teacher(&self, name: &str) -> Result<i64> {
        self.inner.create_teacher(name)
    }

    pub fn get_teacher(&self, teacher_id: i64) -> Result<Option<Teacher>> {
        self.inner.get_teacher(teacher_id)
    }

    pub fn list_teachers(&self) -> Result<Vec<Teacher>> {
        self.inner.list_teachers()
    }

    pub fn create_class(
        &self,
        name: &str,
        education_level: &str,
        head_teacher_id: Option<i64>,
    ) -> Result<i64> {
        self.inner.create_class(name, education_level, head_teacher_id)
    }

    pub fn get_class(&self, class_id: i64) -> Result<Option<ClassGroup>> {
        self.inner.get_class(class_id)
    }

    pub fn list_classes(&self) -> Result<Vec<ClassGroup>> {
        self.inner.list_classes()
    }

    pub fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.inner.delete_class(class_id)
    }

    // ========================================================================
    // Curriculum
    // ========================================================================

    pub fn set_curriculum(&self, class_id: i64, subjects: &[NewSubject]) -> Result<Vec<Subject>> {
        self.inner.set_curriculum(class_id, subjects)
    }

    pub fn get_curriculum(&self, class_id: i64) -> Result<Vec<Subject>> {
        self.inner.get_curriculum(class_id)
    }

    // ========================================================================
    // Availability
    // ========================================================================

    pub fn set_availability(&self, teacher_id: i64, cell: Cell) -> Result<TeacherAvailability> {
        self.inner.set_availability(teacher_id, cell)
    }

    pub fn get_availability(&self, teacher_id: i64) -> Result<Vec<TeacherAvailability>> {
        self.inner.get_availability(teacher_id)
    }

    pub fn remove_availability(&self, teacher_id: i64, cell: Cell) -> Result<bool> {
        self.inner.remove_availability(teacher_id, cell)
    }

    pub fn get_availability_mode(&self, teacher_id: i64) -> Result<AvailabilityMode> {
        self.inner.get_availability_mode(teacher_id)
    }

    pub fn set_availability_mode(&self, teacher_id: i64, mode: AvailabilityMode) -> Result<()> {
        self.inner.set_availability_mode(teacher_id, mode)
    }

    pub fn clear_availability(&self, teacher_id: i64) -> Result<()> {
        self.inner.clear_availability(teacher_id)
    }

    pub fn load_all_availability(&self) -> Result<AvailabilityIndex> {
        self.inner.load_all_availability()
    }

    // ========================================================================
    // Schedule slots
    // ========================================================================

    pub fn read_all_teacher_slots(&self) -> Result<Vec<TeacherSlot>> {
        self.inner.read_all_teacher_slots()
    }
}

impl ScheduleStore for Database {
    fn load_subjects(&self, class_id: i64) -> Result<Option<Vec<Subject>>> {
        self.inner.load_subjects(class_id)
    }

    fn load_availability(&self, teacher_ids: &[i64]) -> Result<AvailabilityIndex> {
        self.inner.load_availability(teacher_ids)
    }

    fn load_occupied_cells(&self, teacher_ids: &[i64], excluding_class_id: i64) -> Result<OccupancyIndex> {
        self.inner.load_occupied_cells(teacher_ids, excluding_class_id)
    }

    fn replace_slots(&self, class_id: i64, slots: &[NewSlot]) -> Result<Vec<ScheduleSlot>> {
        self.inner.replace_slots(class_id, slots)
    }

    fn read_slots(&self, class_id: i64) -> Result<Vec<ScheduleSlot>> {
        self.inner.read_slots(class_id)
    }
}
