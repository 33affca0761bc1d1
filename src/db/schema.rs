pub const SCHEMA: &str = r#"
-- Teachers: only what the timetable needs to display
CREATE TABLE IF NOT EXISTS teachers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- Class groups own their subjects and slots
CREATE TABLE IF NOT EXISTS class_groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    education_level TEXT NOT NULL,
    head_teacher_id INTEGER,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (head_teacher_id) REFERENCES teachers(id) ON DELETE SET NULL
);

-- Curriculum: one row per subject of a class
CREATE TABLE IF NOT EXISTS class_subjects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    class_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    teacher_id INTEGER,
    hours_weekly INTEGER NOT NULL CHECK (hours_weekly >= 1),
    FOREIGN KEY (class_id) REFERENCES class_groups(id) ON DELETE CASCADE,
    FOREIGN KEY (teacher_id) REFERENCES teachers(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_class_subjects_class ON class_subjects(class_id);
CREATE INDEX IF NOT EXISTS idx_class_subjects_teacher ON class_subjects(teacher_id);

-- Declared availability cells
CREATE TABLE IF NOT EXISTS teacher_availability (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id INTEGER NOT NULL,
    day_of_week TEXT NOT NULL,   -- 'MON' .. 'FRI'
    slot_index INTEGER NOT NULL CHECK (slot_index >= 1),
    UNIQUE (teacher_id, day_of_week, slot_index),
    FOREIGN KEY (teacher_id) REFERENCES teachers(id) ON DELETE CASCADE
);

-- Availability mode; a teacher without a row is 'open'
CREATE TABLE IF NOT EXISTS teacher_availability_modes (
    teacher_id INTEGER PRIMARY KEY,
    mode TEXT NOT NULL,          -- 'open' or 'restricted'
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (teacher_id) REFERENCES teachers(id) ON DELETE CASCADE
);

-- Committed timetable
CREATE TABLE IF NOT EXISTS schedule_slots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    class_id INTEGER NOT NULL,
    subject_id INTEGER NOT NULL,
    day_of_week TEXT NOT NULL,
    slot_index INTEGER NOT NULL CHECK (slot_index >= 1),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (class_id, day_of_week, slot_index),
    FOREIGN KEY (class_id) REFERENCES class_groups(id) ON DELETE CASCADE,
    FOREIGN KEY (subject_id) REFERENCES class_subjects(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_schedule_slots_class ON schedule_slots(class_id);
CREATE INDEX IF NOT EXISTS idx_schedule_slots_subject ON schedule_slots(subject_id);
"#;

