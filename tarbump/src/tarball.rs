// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{
    io::{self, Read, Seek},
    path::{Component, Path, PathBuf},
};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use fs_err::File;
use log::debug;
use tar::{Archive, EntryType};
use thiserror::Error;
use xz2::read::XzDecoder;

/// Compression applied on top of the tar stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    /// Longest magic number we look for
    const MAGIC_LEN: usize = 6;

    /// Identify compression from the leading bytes of a file
    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        if magic.starts_with(&[0x1f, 0x8b]) {
            Some(Self::Gzip)
        } else if magic.starts_with(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00]) {
            Some(Self::Xz)
        } else if magic.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
            Some(Self::Zstd)
        } else if magic.starts_with(b"BZh") {
            Some(Self::Bzip2)
        } else {
            None
        }
    }

    /// Guess compression from the file name, plain tar when unknown
    pub fn from_name(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::Gzip
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Self::Xz
        } else if name.ends_with(".tar.zst") || name.ends_with(".tzst") {
            Self::Zstd
        } else if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") {
            Self::Bzip2
        } else {
            Self::None
        }
    }

    /// Detect compression of `file` from its contents, falling back to the
    /// name of `path`. The file is rewound afterwards.
    fn detect(file: &mut File, path: &Path) -> io::Result<Self> {
        let mut magic = Vec::with_capacity(Self::MAGIC_LEN);
        file.by_ref().take(Self::MAGIC_LEN as u64).read_to_end(&mut magic)?;
        file.rewind()?;

        Ok(Self::from_magic(&magic).unwrap_or_else(|| Self::from_name(path)))
    }
}

/// The top-level directory of an upstream tarball
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevel {
    /// Directory the archive unpacks to, i.e. `foo-1.2.3`
    pub parent_dir: String,
    /// Upstream version, i.e. `1.2.3`
    pub version: String,
}

impl TopLevel {
    /// Split the first component of `member` on its last `-`
    pub fn from_member(member: &str) -> Result<Self, Error> {
        let parent_dir = Path::new(member)
            .components()
            .find_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .ok_or_else(|| Error::NoVersion(member.to_owned()))?;

        match parent_dir.rsplit_once('-') {
            Some((_, version)) if !version.is_empty() => Ok(Self {
                version: version.to_owned(),
                parent_dir,
            }),
            _ => Err(Error::NoVersion(parent_dir)),
        }
    }
}

/// A downloaded upstream archive
#[derive(Debug)]
pub struct Tarball {
    first_member: String,
}

impl Tarball {
    /// Open the archive at `path` and read its first member
    pub fn open(path: &Path) -> Result<Self, Error> {
        let mut file = File::open(path)?;
        let compression = Compression::detect(&mut file, path)?;

        debug!("inspecting {} as {compression:?}", path.display());

        let reader: Box<dyn Read> = match compression {
            Compression::None => Box::new(file),
            Compression::Gzip => Box::new(GzDecoder::new(file)),
            Compression::Bzip2 => Box::new(BzDecoder::new(file)),
            Compression::Xz => Box::new(XzDecoder::new(file)),
            Compression::Zstd => Box::new(zstd::Decoder::new(file)?),
        };

        let first_member = first_member(Archive::new(reader))?.ok_or_else(|| Error::Empty(path.to_owned()))?;

        Ok(Self { first_member })
    }

    pub fn first_member(&self) -> &str {
        &self.first_member
    }

    pub fn top_level(&self) -> Result<TopLevel, Error> {
        TopLevel::from_member(&self.first_member)
    }
}

fn first_member<R: Read>(mut archive: Archive<R>) -> Result<Option<String>, Error> {
    for entry in archive.entries()? {
        let entry = entry?;

        // `git archive` leads with a pax global header holding the commit id
        if matches!(entry.header().entry_type(), EntryType::XGlobalHeader) {
            continue;
        }

        return Ok(Some(entry.path()?.to_string_lossy().into_owned()));
    }

    Ok(None)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("reading archive")]
    Io(#[from] io::Error),
    #[error("archive {0:?} has no members")]
    Empty(PathBuf),
    #[error("cannot determine version from {0:?}, expected `name-version`")]
    NoVersion(String),
}
