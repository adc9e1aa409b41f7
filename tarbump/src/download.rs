// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use fs_err::File;
use log::debug;
use reqwest::blocking;
use thiserror::Error;
use tui::{ProgressWriter, Styled};
use url::Url;

use crate::USER_AGENT;

/// Last path segment of `url`, if it names a file
pub fn file_name(url: &Url) -> Option<&str> {
    url.path().rsplit('/').next().filter(|name| !name.is_empty())
}

/// Download `url` to `output`, returning the number of bytes written.
///
/// `file://` urls are copied from the local filesystem.
pub fn fetch(url: &Url, output: &Path) -> Result<u64, Error> {
    let (reader, total) = match url_file(url) {
        Some(path) => {
            let file = File::open(path).map_err(Error::Open)?;
            let total = file.metadata().map_err(Error::Open)?.len();
            let reader: Box<dyn Read> = Box::new(file);
            (reader, Some(total))
        }
        None => {
            let client = blocking::Client::builder().user_agent(USER_AGENT).build()?;
            let response = client.get(url.clone()).send()?.error_for_status()?;
            let total = response.content_length();
            let reader: Box<dyn Read> = Box::new(response);
            (reader, total)
        }
    };

    let pb = tui::transfer_bar(total, format!("{} {}", "Downloading".blue(), url.as_str().bold()));

    let written = write(reader, output, pb.clone());

    pb.finish_and_clear();

    let written = written?;
    debug!("wrote {written} bytes to {}", output.display());

    Ok(written)
}

fn write(mut reader: impl Read, output: &Path, pb: tui::ProgressBar) -> Result<u64, Error> {
    let file = File::create(output)?;
    let mut writer = ProgressWriter::new(BufWriter::new(file), pb);

    let written = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;

    Ok(written)
}

fn url_file(url: &Url) -> Option<PathBuf> {
    if url.scheme() == "file" {
        url.to_file_path().ok()
    } else {
        None
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("requesting tarball")]
    Fetch(#[from] reqwest::Error),
    #[error("opening local tarball")]
    Open(#[source] io::Error),
    #[error("writing tarball")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod test {
    use fs_err as fs;

    use super::*;

    #[test]
    fn test_file_name() {
        let url = Url::parse("https://github.com/octo/foo/archive/master.tar.gz").unwrap();
        assert_eq!(file_name(&url), Some("master.tar.gz"));

        let url = Url::parse("https://example.com/releases/?page=2").unwrap();
        assert_eq!(file_name(&url), None);
    }

    #[test]
    fn test_fetch_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.tar.gz");
        let output = dir.path().join("output.tar.gz");
        fs::write(&source, b"not really a tarball").unwrap();

        let url = Url::from_file_path(&source).unwrap();
        let written = fetch(&url, &output).unwrap();

        assert_eq!(written, 20);
        assert_eq!(fs::read(&output).unwrap(), b"not really a tarball");
    }

    #[test]
    fn test_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("missing.tar.gz")).unwrap();

        let error = fetch(&url, &dir.path().join("out")).unwrap_err();
        assert!(matches!(error, Error::Open(_)));
        assert_eq!(error.to_string(), "opening local tarball");
    }

    #[test]
    fn test_fetch_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.tar.gz");
        fs::write(&source, b"data").unwrap();

        let url = Url::from_file_path(&source).unwrap();
        let error = fetch(&url, &dir.path().join("missing/out.tar.gz")).unwrap_err();

        assert!(matches!(error, Error::Io(_)));
        assert_eq!(error.to_string(), "writing tarball");
    }
}
