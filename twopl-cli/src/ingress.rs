//! Schedule input sources.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use twopl_common::error::TplResult;

/// Where schedules are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScheduleSource {
    /// One schedule given on the command line.
    Inline(String),
    /// One schedule per line of a file.
    File(PathBuf),
    /// One schedule per line of standard input.
    Stdin,
}

/// One schedule together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScheduleLine {
    pub(crate) line: usize,
    pub(crate) text: String,
}

impl ScheduleSource {
    /// Loads every schedule the source provides.
    ///
    /// # Errors
    ///
    /// Returns `TplError::Io` when the file or stdin cannot be read.
    pub(crate) fn load(&self) -> TplResult<Vec<ScheduleLine>> {
        match self {
            Self::Inline(text) => Ok(vec![ScheduleLine {
                line: 1,
                text: text.clone(),
            }]),
            Self::File(path) => read_schedule_lines(BufReader::new(File::open(path)?)),
            Self::Stdin => read_schedule_lines(io::stdin().lock()),
        }
    }
}

/// Reads one schedule per line, skipping blank lines and `#` comments.
///
/// # Errors
///
/// Returns `TplError::Io` when reading fails.
pub(crate) fn read_schedule_lines<R: BufRead>(reader: R) -> TplResult<Vec<ScheduleLine>> {
    let mut schedules = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        schedules.push(ScheduleLine {
            line: index + 1,
            text: text.to_owned(),
        });
    }
    Ok(schedules)
}
