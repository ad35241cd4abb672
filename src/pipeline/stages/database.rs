use crate::error::{StageErrorKind, StageResult};
use crate::logger::{LogLevel, LOGGER};
use crate::pipeline::{PipelineStage, Report, RunContext};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};

/// Demo events inserted on every run, in order
const DEMO_EVENTS: [(&str, &str); 3] = [
    ("LOGIN", "olena"),
    ("PAYMENT", "olena"),
    ("LOGOUT", "olena"),
];

/// One row of the `events` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: i64,
    pub event_type: String,
    pub username: String,
    pub created_at: String,
}

/// Result of the events round-trip
#[derive(Debug, Clone)]
pub struct EventsDemo {
    pub inserted: usize,
    pub selected: usize,
    /// `type, username, created_at` of the first selected row, or `(none)`
    pub sample_row: String,
    pub rows: Vec<EventRow>,
}

/// Stage that runs the events demo against a fresh in-memory database
///
/// # Report Output
/// - `Inserted rows: N`
/// - `Selected rows: N`
/// - `Sample row: type, username, created_at`
pub struct DatabaseStage;

impl DatabaseStage {
    /// Create a new database stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for DatabaseStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for DatabaseStage {
    fn execute(&self, context: &RunContext, _report: &Report) -> StageResult<String> {
        let demo = run_demo()?;

        LOGGER.log(
            LogLevel::Info,
            &format!(
                "DB demo ok: inserted={}, selected={} (run: {})",
                demo.inserted,
                demo.selected,
                context.run_id()
            ),
            "pipeline::database",
        );

        Ok(format!(
            "Inserted rows: {}\nSelected rows: {}\nSample row: {}",
            demo.inserted, demo.selected, demo.sample_row
        ))
    }

    fn name(&self) -> &str {
        "DB"
    }

    fn error_kind(&self) -> StageErrorKind {
        StageErrorKind::Database
    }
}

/// Open a fresh in-memory database and run the events round-trip
pub fn run_demo() -> StageResult<EventsDemo> {
    let mut conn = Connection::open_in_memory()?;
    run_demo_on(&mut conn)
}

/// Run the events round-trip inside one explicit transaction
///
/// The transaction is rolled back when dropped, so any error leaves nothing
/// committed.
pub fn run_demo_on(conn: &mut Connection) -> StageResult<EventsDemo> {
    let tx = conn.transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS events(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT,
            username TEXT,
            created_at TEXT
        );",
    )?;

    let mut inserted = 0;
    {
        let mut insert =
            tx.prepare("INSERT INTO events(type, username, created_at) VALUES(?1, ?2, ?3)")?;
        for (event_type, username) in DEMO_EVENTS {
            let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
            inserted += insert.execute(params![event_type, username, created_at])?;
        }
    }

    let rows = {
        let mut select =
            tx.prepare("SELECT id, type, username, created_at FROM events ORDER BY id ASC")?;
        let mapped = select.query_map([], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                event_type: row.get(1)?,
                username: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        mapped.collect::<Result<Vec<_>, _>>()?
    };

    tx.commit()?;

    let sample_row = rows
        .first()
        .map(|r| format!("{}, {}, {}", r.event_type, r.username, r.created_at))
        .unwrap_or_else(|| "(none)".to_string());

    Ok(EventsDemo {
        inserted,
        selected: rows.len(),
        sample_row,
        rows,
    })
}
