// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::fmt;

use chrono::{DateTime, Utc};

use crate::github::Comparison;

/// Number of characters kept from a commit sha
pub const SHORT_HASH_LEN: usize = 7;

/// Package version of the form `<upstream>+git.<unix_timestamp>.<short_hash>`
///
/// The timestamp is taken at synthesis so two runs within the same second
/// produce the same version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub upstream: String,
    pub timestamp: i64,
    pub short_hash: String,
}

impl PackageVersion {
    pub fn new(upstream: impl Into<String>, comparison: &Comparison, now: DateTime<Utc>) -> Self {
        Self {
            upstream: upstream.into(),
            timestamp: now.timestamp(),
            short_hash: short_hash(comparison.latest_sha()).to_owned(),
        }
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+git.{}.{}", self.upstream, self.timestamp, self.short_hash)
    }
}

/// Abbreviate `sha` to [`SHORT_HASH_LEN`] characters
pub fn short_hash(sha: &str) -> &str {
    match sha.char_indices().nth(SHORT_HASH_LEN) {
        Some((end, _)) => &sha[..end],
        None => sha,
    }
}
