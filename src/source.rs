//! Where tree text comes from: a local file, stdin, or a GitHub gist.

use serde::Deserialize;
use serde_json::Map;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const GIST_API: &str = "https://api.github.com/gists";
const USER_AGENT: &str = concat!("tree2dir/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {what}: {source}")]
    Read {
        what: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch gist {id}: {source}")]
    Http {
        id: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("gist {0} contains no files")]
    EmptyGist(String),
    #[error("not a gist id or URL: {0}")]
    InvalidGistId(String),
}

/// An input the tree text can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    File(PathBuf),
    /// Gist id or URL.
    Gist(String),
    Stdin,
}

impl TreeSource {
    /// Read the raw tree text.
    pub fn read(&self) -> Result<String, SourceError> {
        match self {
            TreeSource::File(path) => {
                if !path.exists() {
                    return Err(SourceError::NotFound(path.clone()));
                }
                std::fs::read_to_string(path).map_err(|source| SourceError::Read {
                    what: path.display().to_string(),
                    source,
                })
            }
            TreeSource::Gist(input) => fetch_gist(input),
            TreeSource::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|source| SourceError::Read {
                        what: "stdin".to_string(),
                        source,
                    })?;
                Ok(text)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    files: Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    content: String,
}

/// Extract the gist id from a bare id or a gist URL.
///
/// `https://gist.github.com/user/abc123#file-tree-txt` and
/// `https://gist.github.com/abc123.git` both yield `abc123`.
pub fn gist_id(input: &str) -> Result<String, SourceError> {
    let trimmed = input.trim();
    let without_fragment = trimmed.split(['#', '?']).next().unwrap_or_default();
    let last = without_fragment
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let id = last.strip_suffix(".git").unwrap_or(last);

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SourceError::InvalidGistId(input.to_string()));
    }
    Ok(id.to_string())
}

/// Pick the content of the first file of a gist API response.
fn first_file_content(id: &str, body: &str) -> Result<String, SourceError> {
    let parsed: GistResponse = serde_json::from_str(body).map_err(|e| SourceError::Read {
        what: format!("gist {id} response"),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;
    let (name, value) = parsed
        .files
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::EmptyGist(id.to_string()))?;
    debug!(gist = id, file = %name, "using first gist file");
    let file: GistFile = serde_json::from_value(value).map_err(|e| SourceError::Read {
        what: format!("gist {id} file {name}"),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;
    Ok(file.content)
}

fn fetch_gist(input: &str) -> Result<String, SourceError> {
    let id = gist_id(input)?;
    let url = format!("{GIST_API}/{id}");
    debug!(%url, "fetching gist");

    let http_err = |source: reqwest::Error| SourceError::Http {
        id: id.clone(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(http_err)?;
    let body = client
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .map_err(http_err)?;
    first_file_content(&id, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id_is_accepted() {
        assert_eq!(gist_id("8f2a1c").unwrap(), "8f2a1c");
    }

    #[test]
    fn id_from_urls() {
        assert_eq!(
            gist_id("https://gist.github.com/someone/8f2a1c").unwrap(),
            "8f2a1c"
        );
        assert_eq!(
            gist_id("https://gist.github.com/someone/8f2a1c/").unwrap(),
            "8f2a1c"
        );
        assert_eq!(
            gist_id("https://gist.github.com/8f2a1c.git").unwrap(),
            "8f2a1c"
        );
        assert_eq!(
            gist_id("https://gist.github.com/someone/8f2a1c#file-tree-txt").unwrap(),
            "8f2a1c"
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(gist_id(""), Err(SourceError::InvalidGistId(_))));
        assert!(matches!(
            gist_id("https://gist.github.com/"),
            Err(SourceError::InvalidGistId(_))
        ));
        assert!(matches!(
            gist_id("not a gist!"),
            Err(SourceError::InvalidGistId(_))
        ));
    }

    #[test]
    fn first_file_in_document_order_wins() {
        let body = r#"{"files": {"z-tree.txt": {"content": "first"}, "a.txt": {"content": "second"}}}"#;
        assert_eq!(first_file_content("abc", body).unwrap(), "first");
    }

    #[test]
    fn gist_without_files_is_an_error() {
        let body = r#"{"files": {}}"#;
        assert!(matches!(
            first_file_content("abc", body),
            Err(SourceError::EmptyGist(id)) if id == "abc"
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = TreeSource::File(PathBuf::from("/definitely/not/here.txt"))
            .read()
            .unwrap_err();
        assert_eq!(err.to_string(), "File not found: /definitely/not/here.txt");
    }
}
