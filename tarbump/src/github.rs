// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Client for the GitHub commit compare API

use log::debug;
use reqwest::{blocking, header::ACCEPT, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{Credentials, USER_AGENT};

pub const API_ROOT: &str = "https://api.github.com";

/// Result of comparing two revisions
#[derive(Debug, Clone, Deserialize)]
pub struct Comparison {
    /// Commits reachable from head but not base, oldest first
    #[serde(default)]
    pub commits: Vec<Commit>,
    pub base_commit: BaseCommit,
}

impl Comparison {
    /// Sha of the most recent commit, or the base commit when
    /// there are no new commits
    pub fn latest_sha(&self) -> &str {
        self.commits
            .last()
            .map_or(self.base_commit.sha.as_str(), |commit| commit.sha.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
}

impl Commit {
    /// First line of the commit message
    pub fn subject(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }

    pub fn is_merge(&self) -> bool {
        self.subject().starts_with("Merge ")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseCommit {
    pub sha: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug)]
pub struct Client {
    http: blocking::Client,
    api_root: Url,
    credentials: Option<Credentials>,
}

impl Client {
    pub fn new(credentials: Option<Credentials>) -> Result<Self, Error> {
        let http = blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Request)?;
        let api_root = Url::parse(API_ROOT).map_err(|_| Error::InvalidApiRoot(API_ROOT.to_owned()))?;

        Ok(Self {
            http,
            api_root,
            credentials,
        })
    }

    /// Talk to a GitHub Enterprise instance or mirror instead
    pub fn with_api_root(self, api_root: Url) -> Self {
        Self { api_root, ..self }
    }

    /// `{api_root}/repos/{owner}/{repo}/compare/{base}...{head}`, refs may
    /// contain `/` which is kept as is
    pub fn compare_url(&self, owner: &str, repo: &str, base: &str, head: &str) -> Result<Url, Error> {
        let mut url = self.api_root.clone();

        url.path_segments_mut()
            .map_err(|_| Error::InvalidApiRoot(self.api_root.to_string()))?
            .pop_if_empty()
            .extend(["repos", owner, repo, "compare"]);

        let path = format!("{}/{base}...{head}", url.path());
        url.set_path(&path);

        Ok(url)
    }

    /// List the commits between `base` and `head` of `owner/repo`
    pub fn compare(&self, owner: &str, repo: &str, base: &str, head: &str) -> Result<Comparison, Error> {
        let url = self.compare_url(owner, repo, base, head)?;

        debug!("comparing {owner}/{repo} {base}...{head}");

        let mut request = self.http.get(url).header(ACCEPT, "application/vnd.github+json");
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.user, Some(&credentials.token));
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if status != StatusCode::OK {
            return Err(Error::Status {
                status,
                message: error_message(&body),
            });
        }

        let comparison: Comparison = serde_json::from_str(&body)?;

        debug!(
            "{} new commits since {}",
            comparison.commits.len(),
            comparison.base_commit.sha
        );

        Ok(comparison)
    }
}

/// GitHub reports errors as `{"message": "..."}`
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("sending compare request")]
    Request(#[from] reqwest::Error),
    #[error("compare failed with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("decoding compare response")]
    Decode(#[from] serde_json::Error),
    #[error("invalid api root {0}")]
    InvalidApiRoot(String),
}

#[cfg(test)]
mod test {
    use std::{
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread,
    };

    use super::*;

    /// Answer a single request on a local port with `status` and `body`
    fn serve_once(status: &'static str, body: &'static str) -> (Url, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();

            request_line
        });

        (url, handle)
    }

    const COMPARE: &str = r#"{
        "url": "https://api.github.com/repos/octo/foo/compare/1111111...2222222",
        "status": "ahead",
        "ahead_by": 2,
        "base_commit": {
            "sha": "abcdef1234567890abcdef1234567890abcdef12",
            "commit": { "message": "Release 1.0" }
        },
        "commits": [
            {
                "sha": "1111111aaa",
                "commit": { "message": "Fix bug\n\nLonger description" }
            },
            {
                "sha": "2222222bbb",
                "commit": { "message": "Merge pull request #1 from octo/branch" }
            }
        ]
    }"#;

    #[test]
    fn test_decode() {
        let comparison: Comparison = serde_json::from_str(COMPARE).unwrap();

        assert_eq!(comparison.commits.len(), 2);
        assert_eq!(comparison.commits[0].subject(), "Fix bug");
        assert!(!comparison.commits[0].is_merge());
        assert!(comparison.commits[1].is_merge());
        assert_eq!(comparison.latest_sha(), "2222222bbb");
    }

    #[test]
    fn test_latest_falls_back_to_base() {
        let comparison: Comparison =
            serde_json::from_str(r#"{"base_commit": {"sha": "abcdef1234"}, "commits": []}"#).unwrap();

        assert_eq!(comparison.latest_sha(), "abcdef1234");

        let comparison: Comparison = serde_json::from_str(r#"{"base_commit": {"sha": "abcdef1234"}}"#).unwrap();

        assert!(comparison.commits.is_empty());
        assert_eq!(comparison.latest_sha(), "abcdef1234");
    }

    #[test]
    fn test_compare_url() {
        let client = Client::new(None).unwrap();

        assert_eq!(
            client.compare_url("octo", "foo", "abc1234", "master").unwrap().as_str(),
            "https://api.github.com/repos/octo/foo/compare/abc1234...master"
        );

        let client = client.with_api_root(Url::parse("https://git.example.com/api/v3/").unwrap());

        assert_eq!(
            client.compare_url("octo", "foo", "v1", "v2").unwrap().as_str(),
            "https://git.example.com/api/v3/repos/octo/foo/compare/v1...v2"
        );
    }

    #[test]
    fn test_compare_url_keeps_slashed_refs() {
        let client = Client::new(None).unwrap();

        assert_eq!(
            client
                .compare_url("octo", "foo", "abc1234", "release/2.0")
                .unwrap()
                .as_str(),
            "https://api.github.com/repos/octo/foo/compare/abc1234...release/2.0"
        );
    }

    #[test]
    fn test_compare() {
        let (url, server) = serve_once("200 OK", COMPARE);
        let client = Client::new(None).unwrap().with_api_root(url);

        let comparison = client.compare("octo", "foo", "abcdef1", "master").unwrap();

        assert_eq!(comparison.latest_sha(), "2222222bbb");
        assert_eq!(
            server.join().unwrap(),
            "GET /repos/octo/foo/compare/abcdef1...master HTTP/1.1\r\n"
        );
    }

    #[test]
    fn test_compare_not_found() {
        let (url, server) = serve_once("404 Not Found", r#"{"message": "Not Found"}"#);
        let client = Client::new(None).unwrap().with_api_root(url);

        let result = client.compare("octo", "missing", "abcdef1", "master");

        assert!(matches!(
            result,
            Err(Error::Status { status, ref message }) if status == StatusCode::NOT_FOUND && message == "Not Found"
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_compare_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
        drop(listener);

        let client = Client::new(None).unwrap().with_api_root(url);

        assert!(matches!(
            client.compare("octo", "foo", "abcdef1", "master"),
            Err(Error::Request(_))
        ));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"message": "Not Found", "status": "404"}"#), "Not Found");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }
}
