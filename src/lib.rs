//! Weekly class timetable generation on top of a SQLite store.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod timetable;
