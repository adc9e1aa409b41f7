// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Reading and patching RPM style `.spec` recipes

use std::{path::Path, sync::LazyLock};

use fs_err as fs;
use log::debug;
use regex::Regex;

pub use self::updater::{Field, Updater};

mod updater;

/// `Version: 1.2.3+git.1700000000.abc1234` with an optional trailing comment
static VERSION_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Version:[ \t]*\S*\+git\.\d+\.([0-9A-Fa-f]+)[ \t\r]*(?:#.*)?$").expect("valid regex")
});

/// Returns the commit hash embedded in the `Version:` field of `content`, if any
pub fn find_commit(content: &str) -> Option<String> {
    let captures = VERSION_COMMIT.captures(content)?;

    Some(captures.get(1)?.as_str().to_owned())
}

/// Returns the commit recorded by a previous run in the spec file at `path`.
///
/// A missing or unreadable file is treated the same as a version without
/// an embedded commit: there is no prior state.
pub fn current_commit(path: &Path) -> Option<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            debug!("no prior state from {}: {error}", path.display());
            return None;
        }
    };

    find_commit(&content)
}
