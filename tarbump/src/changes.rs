// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

//! `.changes` changelog entries

use std::{fmt, io, path::Path};

use chrono::{DateTime, Utc};
use fs_err as fs;

use crate::{github::Comparison, PackageVersion};

pub const SEPARATOR_WIDTH: usize = 67;

/// Written when there's no previous commit to compare against
pub const FIRST_USE: &str = "- First use of tarbump to track upstream changes";

/// A changelog entry summarising the commits of a [`Comparison`]
#[derive(Debug)]
pub struct Entry<'a> {
    comparison: &'a Comparison,
    version: &'a PackageVersion,
    email: &'a str,
    timestamp: DateTime<Utc>,
}

impl<'a> Entry<'a> {
    pub fn new(
        comparison: &'a Comparison,
        version: &'a PackageVersion,
        email: &'a str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            comparison,
            version,
            email,
            timestamp,
        }
    }
}

impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        writeln!(
            f,
            "{} - {}",
            self.timestamp.format("%a %b %d %H:%M:%S UTC %Y"),
            self.email
        )?;
        writeln!(f)?;

        if self.comparison.commits.is_empty() {
            writeln!(f, "{FIRST_USE}")?;
        } else {
            writeln!(f, "- Update to version {}:", self.version)?;

            for commit in self.comparison.commits.iter().filter(|commit| !commit.is_merge()) {
                writeln!(f, "  * {}", commit.subject())?;
            }
        }

        writeln!(f)
    }
}

/// Write `entry` to the top of the changes file at `path`, creating it if needed
pub fn prepend(path: &Path, entry: &impl fmt::Display) -> io::Result<()> {
    let previous = match fs::read_to_string(path) {
        Ok(previous) => previous,
        Err(error) if error.kind() == io::ErrorKind::NotFound => String::new(),
        Err(error) => return Err(error),
    };

    fs::write(path, format!("{entry}{previous}"))
}
