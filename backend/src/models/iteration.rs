//! Program increments and the iterations they contain.
//!
//! Iteration names are a fixed convention shared by the issue tracker and the
//! baseline spreadsheet: `<PI>_<NN>`, with the sequence number zero-padded to
//! two digits so that lexicographic order matches numeric order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated program-increment token (e.g. `26_04`).
///
/// The token ends up inside file names, so it is restricted to ASCII
/// alphanumerics, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProgramIncrement(String);

impl ProgramIncrement {
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Program increment must not be empty".to_string());
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(format!(
                "Program increment '{}' contains invalid character '{}'",
                trimmed, bad
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The iteration with the given sequence number inside this increment.
    pub fn iteration(&self, sequence: u32) -> Iteration {
        Iteration::new(self.clone(), sequence)
    }
}

impl fmt::Display for ProgramIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProgramIncrement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProgramIncrement {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProgramIncrement> for String {
    fn from(pi: ProgramIncrement) -> Self {
        pi.0
    }
}

/// One iteration (sprint) of a program increment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iteration {
    pi: ProgramIncrement,
    sequence: u32,
}

impl Iteration {
    pub fn new(pi: ProgramIncrement, sequence: u32) -> Self {
        Self { pi, sequence }
    }

    pub fn program_increment(&self) -> &ProgramIncrement {
        &self.pi
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Canonical name, `<PI>_<NN>`.
    pub fn name(&self) -> String {
        format!("{}_{:02}", self.pi, self.sequence)
    }

    pub fn next(&self) -> Self {
        Self::new(self.pi.clone(), self.sequence + 1)
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{:02}", self.pi, self.sequence)
    }
}

impl PartialOrd for Iteration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Iteration {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name().cmp(&other.name())
    }
}
