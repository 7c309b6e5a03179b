#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use rust_xlsxwriter::Workbook;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// One iteration block of a baseline sheet: marker label and hours per member.
pub struct IterationHours<'a> {
    pub label: &'a str,
    pub hours: &'a [f64],
}

/// Build a baseline workbook in the fixed layout:
/// roster in row 0 from column 4, then per iteration a marker row, a
/// `Capacity` row and an `Absences` row that must be ignored.
pub fn baseline_workbook(members: &[&str], iterations: &[IterationHours<'_>]) -> Workbook {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 0, "Team").unwrap();
    sheet.write_string(0, 1, "Kind").unwrap();
    for (i, member) in members.iter().enumerate() {
        sheet.write_string(0, 4 + i as u16, *member).unwrap();
    }

    let mut row: u32 = 1;
    for iteration in iterations {
        sheet.write_string(row, 0, iteration.label).unwrap();
        row += 1;

        sheet.write_string(row, 1, "Capacity").unwrap();
        for (i, hours) in iteration.hours.iter().enumerate() {
            sheet.write_number(row, 4 + i as u16, *hours).unwrap();
        }
        row += 1;

        sheet.write_string(row, 1, "Absences").unwrap();
        for i in 0..iteration.hours.len() {
            sheet.write_number(row, 4 + i as u16, 999.0).unwrap();
        }
        row += 1;
    }

    workbook
}

pub fn baseline_workbook_bytes(members: &[&str], iterations: &[IterationHours<'_>]) -> Vec<u8> {
    baseline_workbook(members, iterations)
        .save_to_buffer()
        .expect("workbook serializes")
}

pub fn write_baseline_workbook(path: &Path, members: &[&str], iterations: &[IterationHours<'_>]) {
    baseline_workbook(members, iterations)
        .save(path)
        .expect("workbook written");
}
