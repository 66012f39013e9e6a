//! Extraction scope resolution
//!
//! Decides whether a run exports everything or only what changed, and what
//! the lower bound of the change window is. With no explicit flags a full
//! export happens on the first day of each quarter and a rolling 24-hour
//! incremental export happens otherwise.

use crate::domain::{BatchKind, CatalogError, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::fmt;

/// Length of the default rolling window
pub const ROLLING_WINDOW_HOURS: i64 = 24;

/// Lower bound of an incremental window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    /// Default window: strictly after `now - 24h`
    Rolling(DateTime<Local>),
    /// Operator-supplied bound: from `since` through now, inclusive
    Explicit(DateTime<Local>),
}

impl WindowBound {
    /// Timestamp bound into the window queries
    pub fn since(&self) -> DateTime<Local> {
        match self {
            WindowBound::Rolling(since) | WindowBound::Explicit(since) => *since,
        }
    }
}

/// Extraction window for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionWindow {
    /// No time bound; every record with in-scope holdings
    Full,
    /// Only records changed or deleted within the bound
    Incremental(WindowBound),
}

impl ExtractionWindow {
    /// Batch kinds produced for this window, in processing order
    pub fn batch_plan(&self) -> &'static [BatchKind] {
        match self {
            ExtractionWindow::Full => &[BatchKind::Full],
            ExtractionWindow::Incremental(_) => &[BatchKind::Updates, BatchKind::Deletes],
        }
    }

    /// Short label for logs
    pub fn mode(&self) -> &'static str {
        match self {
            ExtractionWindow::Full => "full",
            ExtractionWindow::Incremental(WindowBound::Rolling(_)) => "incremental-rolling",
            ExtractionWindow::Incremental(WindowBound::Explicit(_)) => "incremental-since",
        }
    }

    /// Lower bound, if incremental
    pub fn bound(&self) -> Option<&WindowBound> {
        match self {
            ExtractionWindow::Full => None,
            ExtractionWindow::Incremental(bound) => Some(bound),
        }
    }
}

impl fmt::Display for ExtractionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bound() {
            None => f.write_str(self.mode()),
            Some(bound) => write!(
                f,
                "{} since {}",
                self.mode(),
                bound.since().format("%Y-%m-%d %H:%M:%S %:z")
            ),
        }
    }
}

/// Resolves the extraction window from the operator's flags.
///
/// # Errors
///
/// Returns [`CatalogError::Configuration`] when `full` and `since` are both
/// given, when `since` cannot be parsed, or when it lies in the future.
pub fn resolve_window(
    full: bool,
    since: Option<&str>,
    now: DateTime<Local>,
) -> Result<ExtractionWindow> {
    match (full, since) {
        (true, Some(_)) => Err(CatalogError::Configuration(
            "--full and --since are mutually exclusive".to_string(),
        )),
        (true, None) => Ok(ExtractionWindow::Full),
        (false, Some(raw)) => {
            let since = parse_since(raw)?;
            if since > now {
                return Err(CatalogError::Configuration(format!(
                    "--since {raw} is in the future"
                )));
            }
            Ok(ExtractionWindow::Incremental(WindowBound::Explicit(since)))
        }
        (false, None) if is_quarter_start(now.date_naive()) => Ok(ExtractionWindow::Full),
        (false, None) => Ok(ExtractionWindow::Incremental(WindowBound::Rolling(
            now - Duration::hours(ROLLING_WINDOW_HOURS),
        ))),
    }
}

/// First day of January, April, July or October
pub fn is_quarter_start(date: NaiveDate) -> bool {
    date.day() == 1 && matches!(date.month(), 1 | 4 | 7 | 10)
}

/// Parses an operator-supplied `since` value.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (local
/// time) and a bare `YYYY-MM-DD`, which means local midnight.
pub fn parse_since(raw: &str) -> Result<DateTime<Local>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Local));
    }

    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| {
            CatalogError::Configuration(format!(
                "Invalid --since '{raw}'. Expected YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or RFC 3339"
            ))
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| {
            CatalogError::Configuration(format!("--since '{raw}' does not exist in local time"))
        })
}
