// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use glob::{glob, Pattern};
use log::debug;
use specfile::{Field, Updater};
use thiserror::Error;

use crate::{tarball::TopLevel, PackageVersion};

pub const EXTENSION: &str = "spec";

/// Updates pointing a recipe at a new tarball
pub fn updater(version: &PackageVersion, top_level: &TopLevel, source: &str) -> Updater {
    let mut updater = Updater::new();
    updater.update(Field::Version, version);
    updater.update(Field::Setup, &top_level.parent_dir);
    updater.update(Field::Source, source);
    updater
}

/// A patched spec file waiting to be written
#[derive(Debug)]
pub struct Patch {
    pub path: PathBuf,
    output: String,
}

impl Patch {
    pub fn write(&self) -> Result<(), Error> {
        fs::write(&self.path, &self.output).map_err(Error::Write)
    }
}

/// Apply `updater` in memory to every `*.spec` file in `dir`, returning
/// the files which change. Nothing is written.
pub fn prepare_all(dir: &Path, updater: &Updater) -> Result<Vec<Patch>, Error> {
    let pattern = format!("{}/*.{EXTENSION}", Pattern::escape(&dir.to_string_lossy()));

    let mut patches = vec![];

    for entry in glob(&pattern)? {
        let path = entry?;

        if let Some(patch) = prepare(path, updater)? {
            patches.push(patch);
        }
    }

    Ok(patches)
}

/// Apply `updater` in memory to the spec file at `path`
pub fn prepare(path: PathBuf, updater: &Updater) -> Result<Option<Patch>, Error> {
    let input = fs::read_to_string(&path).map_err(Error::Read)?;
    let output = updater.apply(&input);

    if output == input {
        debug!("{} unchanged", path.display());
        return Ok(None);
    }

    Ok(Some(Patch { path, output }))
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("reading spec file")]
    Read(#[source] io::Error),
    #[error("writing spec file")]
    Write(#[source] io::Error),
    #[error("spec file pattern")]
    Pattern(#[from] glob::PatternError),
    #[error("listing spec files")]
    Glob(#[from] glob::GlobError),
}
