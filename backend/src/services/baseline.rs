//! Baseline capacity spreadsheets.
//!
//! # Layout
//!
//! The first worksheet is read as a plain grid; nothing is inferred from
//! headers.
//!
//! ```text
//!        col 0            col 1      col 2  col 3  col 4   col 5  ...
//! row 0  ...              ...        ...    ...    Ada     Bob
//!        ITE_2026_04_01                                           <- iteration context
//!        ...              Capacity                 72      80     <- hours per member
//!        ...              Absences                 8              <- ignored
//!        ITE_2026_04_02
//!        ...              Capacity                 64      80
//! ```
//!
//! - Row 0 from column [`MEMBER_COLUMN_OFFSET`] lists the roster; blank cells are skipped.
//! - A column-0 string starting with [`ITERATION_MARKER`] sets the current iteration.
//! - A column-1 cell equal to [`CAPACITY_ROW_MARKER`] holds the hours of the current iteration.
//!
//! Malformed workbooks are expected input: failures are logged and the loader
//! reports "no baseline" instead of an error.

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::models::{BaselineCapacity, ProgramIncrement, SECONDS_PER_HOUR};

pub const BASELINE_FILE_PREFIX: &str = "PI_CAPA_";
pub const BASELINE_EXTENSION: &str = "xlsx";
pub const MEMBER_COLUMN_OFFSET: usize = 4;
pub const ITERATION_MARKER: &str = "ITE_";
pub const CAPACITY_ROW_MARKER: &str = "Capacity";

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("Failed to open workbook {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Workbook {path} has no worksheet")]
    NoWorksheet { path: PathBuf },

    #[error("Failed to read first worksheet of {path}: {message}")]
    Worksheet { path: PathBuf, message: String },
}

/// Name an uploaded baseline is stored under: `PI_CAPA_20<PI>.xlsx`.
pub fn canonical_file_name(pi: &ProgramIncrement) -> String {
    format!("{}20{}.{}", BASELINE_FILE_PREFIX, pi, BASELINE_EXTENSION)
}

/// Accepted file names for `pi`, most preferred first.
///
/// Year-expanded (`PI_CAPA_2026_04.xlsx`), raw (`PI_CAPA_26_04.xlsx`), then
/// with separators stripped (`PI_CAPA_2604.xlsx`).
pub fn candidate_file_names(pi: &ProgramIncrement) -> Vec<String> {
    let stripped: String = pi.as_str().chars().filter(|c| *c != '_' && *c != '-').collect();
    let mut names = vec![
        canonical_file_name(pi),
        format!("{}{}.{}", BASELINE_FILE_PREFIX, pi, BASELINE_EXTENSION),
        format!("{}{}.{}", BASELINE_FILE_PREFIX, stripped, BASELINE_EXTENSION),
    ];
    let mut seen = std::collections::HashSet::new();
    names.retain(|name| seen.insert(name.clone()));
    names
}

/// First existing baseline file for `pi` in `dir`.
pub fn locate_baseline(dir: &Path, pi: &ProgramIncrement) -> Option<PathBuf> {
    candidate_file_names(pi)
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Strip the iteration marker and shorten a 4-digit year.
///
/// `ITE_2026_04_01` and `ITE_26_04_01` both give `26_04_01`.
pub fn normalize_iteration_label(label: &str) -> Option<String> {
    let rest = label.trim().strip_prefix(ITERATION_MARKER)?.trim();
    if rest.is_empty() {
        return None;
    }

    let bytes = rest.as_bytes();
    let has_full_year = bytes.len() > 5
        && rest.starts_with("20")
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'_';

    if has_full_year {
        Some(rest[2..].to_string())
    } else {
        Some(rest.to_string())
    }
}

/// Cell value as far as the baseline layout cares.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric value, accepting numbers stored as text.
    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Empty => None,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            _ => Cell::Empty,
        }
    }
}

/// Worksheet in absolute coordinates with bounds-checked access.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Re-anchor a calamine range at A1, since ranges start at the first used cell.
    pub fn from_range(range: &Range<Data>) -> Self {
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(Cell::from));
            rows.push(cells);
        }
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(EMPTY)
    }

    fn width(&self, row: usize) -> usize {
        self.rows.get(row).map(Vec::len).unwrap_or(0)
    }
}

/// Extract baseline capacity from a grid laid out as described in the module docs.
pub fn parse_grid(grid: &Grid, source: &str) -> BaselineCapacity {
    let mut baseline = BaselineCapacity {
        source: source.to_string(),
        ..Default::default()
    };

    let mut roster: Vec<(usize, String)> = Vec::new();
    for col in MEMBER_COLUMN_OFFSET..grid.width(0) {
        let Some(name) = grid.cell(0, col).as_text().map(str::trim) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if !baseline.members.iter().any(|m| m == name) {
            baseline.members.push(name.to_string());
        }
        roster.push((col, name.to_string()));
    }

    let mut current_iteration: Option<String> = None;
    for row in 1..grid.height() {
        if let Some(iteration) = grid
            .cell(row, 0)
            .as_text()
            .filter(|label| label.trim_start().starts_with(ITERATION_MARKER))
            .and_then(normalize_iteration_label)
        {
            current_iteration = Some(iteration);
            continue;
        }

        let is_capacity_row = grid
            .cell(row, 1)
            .as_text()
            .is_some_and(|label| label.trim() == CAPACITY_ROW_MARKER);
        let Some(iteration) = current_iteration.as_ref().filter(|_| is_capacity_row) else {
            continue;
        };

        for (col, member) in &roster {
            let Some(hours) = grid.cell(row, *col).as_number() else {
                continue;
            };
            if !hours.is_finite() || hours < 0.0 {
                debug!("Ignoring capacity {} for {} in {}", hours, member, iteration);
                continue;
            }
            let seconds = (hours * SECONDS_PER_HOUR as f64).round() as u64;
            baseline
                .capacity
                .entry(member.clone())
                .or_default()
                .insert(iteration.clone(), seconds);
        }
    }

    baseline
}

/// Parse the first worksheet of an xlsx workbook.
pub fn read_workbook(path: &Path) -> Result<BaselineCapacity, BaselineError> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: calamine::XlsxError| BaselineError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BaselineError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| BaselineError::Worksheet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(parse_grid(&Grid::from_range(&range), &source))
}

/// Locate and parse the baseline for `pi`.
///
/// `None` when no file exists or the file cannot be parsed.
pub fn load_baseline(dir: &Path, pi: &ProgramIncrement) -> Option<BaselineCapacity> {
    let Some(path) = locate_baseline(dir, pi) else {
        debug!("No baseline spreadsheet for PI {} in {}", pi, dir.display());
        return None;
    };

    match read_workbook(&path) {
        Ok(baseline) => {
            info!(
                "Loaded baseline {} ({} members)",
                path.display(),
                baseline.members.len()
            );
            Some(baseline)
        }
        Err(e) => {
            warn!("Ignoring unreadable baseline for PI {}: {}", pi, e);
            None
        }
    }
}

#[cfg(test)]
#[path = "baseline_tests.rs"]
mod baseline_tests;
