// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{
    fmt, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use fs_err as fs;
use log::debug;
use thiserror::Error;

/// Dotfile in the home directory holding `user:token`
pub const FILE_NAME: &str = ".github-credentials";

/// GitHub user and personal access token used for API requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub token: String,
}

impl Credentials {
    /// `~/.github-credentials`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(FILE_NAME))
    }

    /// Load credentials from `path`, a missing file means anonymous access
    pub fn load(path: &Path) -> Result<Option<Self>, Error> {
        match fs::read_to_string(path) {
            Ok(content) => content.parse().map(Some),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, using anonymous access", path.display());
                Ok(None)
            }
            Err(error) => Err(Error::Read(error)),
        }
    }
}

impl FromStr for Credentials {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user, token) = s.trim().split_once(':').ok_or(Error::Malformed)?;

        if user.is_empty() || token.is_empty() {
            return Err(Error::Malformed);
        }

        Ok(Self {
            user: user.to_owned(),
            token: token.to_owned(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("reading credentials")]
    Read(#[source] io::Error),
    #[error("expected a single `user:token` line")]
    Malformed,
}
