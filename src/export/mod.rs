use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::db::Database;
use crate::timetable::{view_schedule, SlotView};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_str)
    }
}

/// Export a class's stored timetable to a file. Returns the number of slots written.
pub fn export_schedule(
    db: &Database,
    class_id: i64,
    output_path: &Path,
    format: ExportFormat,
) -> Result<usize> {
    let views = view_schedule(db, class_id)?;
    let count = views.len();

    match format {
        ExportFormat::Json => export_json(&views, output_path),
        ExportFormat::Csv => export_csv(&views, output_path),
    }
    .with_context(|| format!("Failed to write {} export to {:?}", format.name(), output_path))?;

    Ok(count)
}

fn export_json(views: &[SlotView], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(views)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn export_csv(views: &[SlotView], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "day_of_week",
        "slot_index",
        "subject_id",
        "subject_name",
        "teacher_name",
    ])?;

    for view in views {
        let slot_index = view.slot_index.to_string();
        let subject_id = view.subject_id.to_string();
        wtr.write_record([
            view.day_of_week.as_str(),
            slot_index.as_str(),
            subject_id.as_str(),
            view.subject_name.as_str(),
            view.teacher_name.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewSlot, NewSubject, ScheduleStore};
    use crate::timetable::{Cell, Day};

    fn sample_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let teacher = db.create_teacher("Ada").unwrap();
        let class_id = db.create_class("1A", "primary", None).unwrap();
        let subjects = db
            .set_curriculum(
                class_id,
                &[
                    NewSubject { name: "Math".into(), teacher_id: Some(teacher), hours_weekly: 1 },
                    NewSubject { name: "Study, quiet".into(), teacher_id: None, hours_weekly: 1 },
                ],
            )
            .unwrap();
        db.replace_slots(
            class_id,
            &[
                NewSlot { subject_id: subjects[0].id, cell: Cell::new(Day::Mon, 1) },
                NewSlot { subject_id: subjects[1].id, cell: Cell::new(Day::Tue, 2) },
            ],
        )
        .unwrap();
        (db, class_id)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("week.CSV")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(Path::new("week.json")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(Path::new("week.html")), None);
    }

    #[test]
    fn test_export_json() {
        let (db, class_id) = sample_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("week.json");

        let count = export_schedule(&db, class_id, &path, ExportFormat::Json).unwrap();
        assert_eq!(count, 2);

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["day_of_week"], "MON");
        assert_eq!(value[0]["teacher_name"], "Ada");
        assert!(value[1]["teacher_name"].is_null());
    }

    #[test]
    fn test_export_csv() {
        let (db, class_id) = sample_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("week.csv");

        export_schedule(&db, class_id, &path, ExportFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][3], "Math");
        assert_eq!(&rows[1][3], "Study, quiet");
        assert_eq!(&rows[1][4], "");
    }
}
