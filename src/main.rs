use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};

use timetabler::config::Config;
use timetabler::db::{AvailabilityMode, Database, NewSubject};
use timetabler::export::{export_schedule, ExportFormat};
use timetabler::logging;
use timetabler::timetable::{
    generate_schedule, render_timetable, shuffle_rng, validate_schedule, view_schedule, Cell, Day,
    Grid,
};

struct Args {
    config_path: Option<PathBuf>,
    command: Vec<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;
    let mut command = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" if command.is_empty() => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" if command.is_empty() => {
                println!("timetabler {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" if command.is_empty() => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            _ => command.push(args[i].clone()),
        }
        i += 1;
    }

    if command.is_empty() {
        print_help();
        std::process::exit(1);
    }

    Args { config_path, command }
}

fn print_help() {
    println!(
        r#"timetabler - weekly class timetable generator

USAGE:
    timetabler [OPTIONS] <COMMAND> [ARGS]

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

COMMANDS:
    init                                   Create the database
    add-teacher NAME                       Register a teacher
    list-teachers
    add-class NAME LEVEL [--head ID]       Register a class group
    list-classes
    delete-class CLASS                     Delete a class with its subjects and slots
    set-curriculum CLASS FILE.json         Replace a class's subjects
    curriculum CLASS
    set-availability TEACHER DAY SLOT      Declare an available cell (DAY: MON..FRI)
    remove-availability TEACHER DAY SLOT
    availability TEACHER
    availability-mode TEACHER open|restricted
    clear-availability TEACHER             Remove all cells, teacher becomes open
    generate CLASS [--seed N] [--json]     Regenerate a class's timetable
    view CLASS                             Show a class's timetable
    check                                  Re-check all stored timetables
    export CLASS PATH [--format json|csv]

ENVIRONMENT:
    TIMETABLER_CONFIG   Path to config file (overrides default location)
    TIMETABLER_LOG      Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/timetabler/config.toml"#
    );
}

fn main() -> Result<()> {
    let args = parse_args();

    let _ = logging::init(&logging::default_log_dir());

    let config = match &args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let db = Database::open(&config.database)
        .with_context(|| format!("Failed to open database {:?}", config.database.sqlite_path))?;
    db.initialize()?;

    run(&db, &config, &args.command)
}

fn run(db: &Database, config: &Config, command: &[String]) -> Result<()> {
    let grid = config.grid();
    let (name, rest) = command
        .split_first()
        .ok_or_else(|| anyhow!("missing command"))?;

    match (name.as_str(), rest) {
        ("init", []) => {
            println!("Database ready at {:?}", config.database.sqlite_path);
        }
        ("add-teacher", [teacher_name]) => {
            let id = db.create_teacher(teacher_name)?;
            println!("{}", id);
        }
        ("list-teachers", []) => {
            for teacher in db.list_teachers()? {
                let mode = db.get_availability_mode(teacher.id)?;
                println!("{:>5}  {:<30} {}", teacher.id, teacher.name, mode.as_str());
            }
        }
        ("add-class", [class_name, level, flags @ ..]) => {
            let head = match flags {
                [] => None,
                [flag, id] if flag == "--head" => Some(parse_id(id)?),
                _ => bail!("usage: add-class NAME LEVEL [--head ID]"),
            };
            let id = db.create_class(class_name, level, head)?;
            println!("{}", id);
        }
        ("list-classes", []) => {
            for class in db.list_classes()? {
                println!("{:>5}  {:<20} {}", class.id, class.name, class.education_level);
            }
        }
        ("delete-class", [class_id]) => {
            if !db.delete_class(parse_id(class_id)?)? {
                bail!("class {} not found", class_id);
            }
        }
        ("set-curriculum", [class_id, file]) => {
            let subjects = read_curriculum(Path::new(file))?;
            let created = db.set_curriculum(parse_id(class_id)?, &subjects)?;
            println!("{} subjects set", created.len());
        }
        ("curriculum", [class_id]) => {
            for subject in db.get_curriculum(parse_id(class_id)?)? {
                let teacher = match subject.teacher_id {
                    Some(id) => db.get_teacher(id)?.map(|t| t.name),
                    None => None,
                };
                println!(
                    "{:>5}  {:<20} {:>2}h  {}",
                    subject.id,
                    subject.name,
                    subject.hours_weekly,
                    teacher.as_deref().unwrap_or("-")
                );
            }
        }
        ("set-availability", [teacher_id, day, slot]) => {
            let cell = parse_cell(day, slot, grid)?;
            db.set_availability(parse_id(teacher_id)?, cell)?;
        }
        ("remove-availability", [teacher_id, day, slot]) => {
            let cell = parse_cell(day, slot, grid)?;
            if !db.remove_availability(parse_id(teacher_id)?, cell)? {
                println!("{} was not declared", cell);
            }
        }
        ("availability", [teacher_id]) => {
            let teacher_id = parse_id(teacher_id)?;
            println!("mode: {}", db.get_availability_mode(teacher_id)?.as_str());
            for entry in db.get_availability(teacher_id)? {
                println!("{}", entry.cell);
            }
        }
        ("availability-mode", [teacher_id, mode]) => {
            let mode = AvailabilityMode::from_str(mode)
                .ok_or_else(|| anyhow!("mode must be 'open' or 'restricted', got {:?}", mode))?;
            db.set_availability_mode(parse_id(teacher_id)?, mode)?;
        }
        ("clear-availability", [teacher_id]) => {
            db.clear_availability(parse_id(teacher_id)?)?;
        }
        ("generate", [class_id, flags @ ..]) => {
            let class_id = parse_id(class_id)?;
            let (seed, json) = parse_generate_flags(flags, config.generation.seed)?;
            let mut rng = shuffle_rng(seed);
            let report = generate_schedule(db, grid, class_id, &mut rng)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Placed {} of {} hours", report.placed_count(), report.total_blocks);
                if !report.is_complete() {
                    println!("Unplaced: {}", report.unplaced.join(", "));
                }
            }
        }
        ("view", [class_id]) => {
            let views = view_schedule(db, parse_id(class_id)?)?;
            print!("{}", render_timetable(&views, grid));
        }
        ("check", []) => {
            let slots = db.read_all_teacher_slots()?;
            let availability = db.load_all_availability()?;
            match validate_schedule(&slots, &availability, grid) {
                Ok(()) => println!("{} slots, no conflicts", slots.len()),
                Err(errors) => {
                    for error in &errors {
                        println!("{:?}: {}", error.kind, error.message);
                    }
                    bail!("{} conflicts found", errors.len());
                }
            }
        }
        ("export", [class_id, path, flags @ ..]) => {
            let path = Path::new(path);
            let format = match flags {
                [] => ExportFormat::from_path(path).unwrap_or(ExportFormat::Json),
                [flag, value] if flag == "--format" => ExportFormat::from_str(value)
                    .ok_or_else(|| anyhow!("format must be 'json' or 'csv', got {:?}", value))?,
                _ => bail!("usage: export CLASS PATH [--format json|csv]"),
            };
            let count = export_schedule(db, parse_id(class_id)?, path, format)?;
            println!("Exported {} slots as {} to {:?}", count, format.name(), path);
        }
        _ => {
            print_help();
            bail!("unknown command or wrong arguments: {}", command.join(" "));
        }
    }

    Ok(())
}

fn parse_id(value: &str) -> Result<i64> {
    value
        .parse()
        .with_context(|| format!("invalid id {:?}", value))
}

/// Parse `[--seed N] [--json]`. Returns the seed to use and whether to print JSON.
fn parse_generate_flags(flags: &[String], default_seed: Option<u64>) -> Result<(Option<u64>, bool)> {
    let mut seed = default_seed;
    let mut json = false;
    let mut i = 0;
    while i < flags.len() {
        match (flags[i].as_str(), flags.get(i + 1)) {
            ("--seed", Some(value)) => {
                seed = Some(value.parse().with_context(|| format!("invalid seed {:?}", value))?);
                i += 1;
            }
            ("--seed", None) => bail!("--seed requires a value"),
            ("--json", _) => json = true,
            (other, _) => bail!("unknown generate option {:?}", other),
        }
        i += 1;
    }
    Ok((seed, json))
}

fn parse_cell(day: &str, slot: &str, grid: Grid) -> Result<Cell> {
    let day = Day::from_str(day).ok_or_else(|| anyhow!("invalid day {:?}, expected MON..FRI", day))?;
    let slot: u8 = slot
        .parse()
        .with_context(|| format!("invalid slot {:?}", slot))?;
    let cell = Cell::new(day, slot);
    if !grid.contains(cell) {
        bail!("slot must be between 1 and {}", grid.slots_per_day());
    }
    Ok(cell)
}

fn read_curriculum(path: &Path) -> Result<Vec<NewSubject>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read curriculum file {:?}", path))?;
    let subjects = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse curriculum file {:?}", path))?;
    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_generate_flags() {
        assert_eq!(parse_generate_flags(&[], Some(7)).unwrap(), (Some(7), false));
        assert_eq!(
            parse_generate_flags(&flags(&["--seed", "42", "--json"]), None).unwrap(),
            (Some(42), true)
        );
    }

    #[test]
    fn test_generate_seed_without_value() {
        let err = parse_generate_flags(&flags(&["--seed"]), None).unwrap_err();
        assert_eq!(err.to_string(), "--seed requires a value");

        let err = parse_generate_flags(&flags(&["--json", "--seed"]), None).unwrap_err();
        assert_eq!(err.to_string(), "--seed requires a value");
    }

    #[test]
    fn test_parse_cell_checks_grid() {
        let grid = Grid::new(6);
        assert_eq!(parse_cell("wed", "6", grid).unwrap(), Cell::new(Day::Wed, 6));
        assert!(parse_cell("wed", "7", grid).is_err());
        assert!(parse_cell("wed", "0", grid).is_err());
        assert!(parse_cell("sat", "1", grid).is_err());
    }
}
