// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{env, io, path::PathBuf};

use chrono::Utc;
use clap::Parser;
use log::{debug, info};
use tarbump::{credentials, download, github, tarball, update, Credentials, Tarball, Update};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tui::Styled;
use url::Url;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Update a spec recipe and its changelog from a GitHub tarball"
)]
pub struct Command {
    #[arg(long, help = "Tarball to download")]
    pub url: Url,
    #[arg(long, help = "Name to save the tarball as [default: last path segment of the url]")]
    pub filename: Option<String>,
    #[arg(
        long,
        help = "Package whose .spec and .changes files are updated [default: current directory name]"
    )]
    pub package: Option<String>,
    #[arg(long = "repo_owner", help = "GitHub user or organisation owning the repository")]
    pub repo_owner: String,
    #[arg(long = "repo_name", help = "GitHub repository name")]
    pub repo_name: String,
    #[arg(long, help = "Commit or ref the package is updated to")]
    pub target: String,
    #[arg(long, help = "Author of the changelog entry")]
    pub email: String,
    #[arg(long, help = "Accepted for compatibility, files are always updated in place")]
    pub outdir: Option<PathBuf>,
    #[arg(long, help = "File holding `user:token` for the GitHub API [default: ~/.github-credentials]")]
    pub credentials: Option<PathBuf>,
    #[arg(
        short,
        long = "verbose",
        help = "Prints additional information about what tarbump is doing",
        default_value = "false"
    )]
    pub verbose: bool,
}

pub fn process() -> Result<(), Error> {
    let command = Command::parse();

    init_logging(command.verbose);

    if let Some(outdir) = &command.outdir {
        debug!("ignoring outdir {}", outdir.display());
    }

    let dir = env::current_dir().map_err(Error::CurrentDir)?;
    let package = match command.package {
        Some(package) => package,
        None => dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(Error::PackageName)?,
    };
    let filename = match command.filename {
        Some(filename) => filename,
        None => download::file_name(&command.url)
            .map(ToOwned::to_owned)
            .ok_or_else(|| Error::FileName(command.url.clone()))?,
    };

    let credentials = load_credentials(command.credentials)?;
    let client = github::Client::new(credentials)?;

    let tarball_path = dir.join(&filename);
    download::fetch(&command.url, &tarball_path)?;
    println!("{} {filename}", "Downloaded".green());

    let tarball = Tarball::open(&tarball_path)?;
    let top_level = tarball.top_level()?;
    info!("upstream version {} in {}", top_level.version, top_level.parent_dir);

    let update = Update {
        dir: &dir,
        package: &package,
        tarball: &filename,
        top_level: &top_level,
        email: &command.email,
        now: Utc::now(),
    };

    let base = match update.current_commit() {
        Some(commit) => commit,
        None => {
            info!("no commit recorded in {}, starting from {}", update.spec_path().display(), command.target);
            command.target.clone()
        }
    };

    let comparison = client.compare(&command.repo_owner, &command.repo_name, &base, &command.target)?;
    let applied = update.apply(&comparison)?;

    println!("{} {}", "Updated".green(), applied.changes.display());
    for spec in &applied.specs {
        println!("{} {}", "Updated".green(), spec.display());
    }
    println!("{} {}", "Version".bold(), applied.version);

    Ok(())
}

fn load_credentials(path: Option<PathBuf>) -> Result<Option<Credentials>, Error> {
    let Some(path) = path.or_else(Credentials::default_path) else {
        debug!("no home directory, using anonymous access");
        return Ok(None);
    };

    Ok(Credentials::load(&path)?)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("reading current directory")]
    CurrentDir(#[source] io::Error),
    #[error("cannot derive package name from current directory, pass --package")]
    PackageName,
    #[error("cannot derive file name from {0}, pass --filename")]
    FileName(Url),
    #[error("loading credentials")]
    Credentials(#[from] credentials::Error),
    #[error("downloading tarball")]
    Download(#[from] download::Error),
    #[error("inspecting tarball")]
    Tarball(#[from] tarball::Error),
    #[error("comparing commits")]
    Github(#[from] github::Error),
    #[error("updating package")]
    Update(#[from] update::Error),
}
