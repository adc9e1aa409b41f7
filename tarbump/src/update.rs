// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::info;
use thiserror::Error;

use crate::{changes, github::Comparison, recipe, tarball::TopLevel, PackageVersion};

/// Everything needed to move a package onto a new tarball once
/// upstream has been inspected
#[derive(Debug)]
pub struct Update<'a> {
    /// Directory holding the spec and changes files
    pub dir: &'a Path,
    pub package: &'a str,
    /// Tarball file name, written to `Source:`
    pub tarball: &'a str,
    pub top_level: &'a TopLevel,
    pub email: &'a str,
    pub now: DateTime<Utc>,
}

/// Outcome of [`Update::apply`]
#[derive(Debug)]
pub struct Applied {
    pub version: PackageVersion,
    pub changes: PathBuf,
    pub specs: Vec<PathBuf>,
}

impl Update<'_> {
    pub fn spec_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.package, recipe::EXTENSION))
    }

    pub fn changes_path(&self) -> PathBuf {
        self.dir.join(format!("{}.changes", self.package))
    }

    /// The commit recorded by a previous run, if any
    pub fn current_commit(&self) -> Option<String> {
        specfile::current_commit(&self.spec_path())
    }

    /// Write the changelog entry for `comparison` and patch all spec files
    pub fn apply(&self, comparison: &Comparison) -> Result<Applied, Error> {
        let version = PackageVersion::new(&self.top_level.version, comparison, self.now);

        info!("new version {version}");

        // Specs are patched in memory before anything is written
        let updater = recipe::updater(&version, self.top_level, self.tarball);
        let patches = recipe::prepare_all(self.dir, &updater)?;

        let entry = changes::Entry::new(comparison, &version, self.email, self.now);
        let changes = self.changes_path();
        changes::prepend(&changes, &entry).map_err(Error::Changes)?;

        let mut specs = Vec::with_capacity(patches.len());
        for patch in patches {
            patch.write()?;
            specs.push(patch.path);
        }

        Ok(Applied {
            version,
            changes,
            specs,
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("updating changes file")]
    Changes(#[source] io::Error),
    #[error("patching spec files")]
    Recipe(#[from] recipe::Error),
}
