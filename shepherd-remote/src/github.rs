//! GitHub REST implementation of [`RepositoryHost`].
//!
//! Blocking `ureq` agent with connect/read timeouts. The token is sent as a
//! bearer credential on every request and never logged.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use shepherd_core::RepositoryRef;

use crate::error::RemoteError;
use crate::host::{EncodedContent, RepositoryHost, PAGE_SIZE};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const API_URL_ENV: &str = "GITHUB_API_URL";

/// `GITHUB_TOKEN`, or [`RemoteError::Auth`] when it is unset or blank.
pub fn token_from_env() -> Result<String, RemoteError> {
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(RemoteError::Auth {
            reason: format!("{TOKEN_ENV} not set in environment variables"),
        }),
    }
}

/// `GITHUB_API_URL`, defaulting to [`DEFAULT_API_URL`].
pub fn api_url_from_env() -> String {
    std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

#[derive(Debug, Deserialize)]
struct ContentPayload {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

/// Client for `api.github.com` (or a compatible base URL).
pub struct GithubHost {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl fmt::Debug for GithubHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubHost")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GithubHost {
    /// Build a client; fails with [`RemoteError::Auth`] on an empty token.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(RemoteError::Auth {
                reason: format!("{TOKEN_ENV} is empty"),
            });
        }
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .user_agent(concat!("shepherd/", env!("CARGO_PKG_VERSION")))
            .build();
        Ok(Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Build a client from `GITHUB_TOKEN` and the optional `GITHUB_API_URL`.
    pub fn from_env(timeout: Duration) -> Result<Self, RemoteError> {
        Self::new(api_url_from_env(), token_from_env()?, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> ureq::Request {
        self.agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28")
    }
}

/// `Ok(None)` for 404, typed errors for everything else that is not 2xx.
fn classify(
    url: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<Option<ureq::Response>, RemoteError> {
    match result {
        Ok(response) => Ok(Some(response)),
        Err(ureq::Error::Status(404, _)) => Ok(None),
        Err(ureq::Error::Status(401, _)) => Err(RemoteError::Auth {
            reason: format!("credential rejected by {url}"),
        }),
        Err(ureq::Error::Status(status, response)) => Err(RemoteError::Api {
            status,
            url: url.to_string(),
            message: response.into_string().unwrap_or_default(),
        }),
        Err(ureq::Error::Transport(transport)) => Err(RemoteError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        }),
    }
}

fn decode_err(url: &str, err: impl fmt::Display) -> RemoteError {
    RemoteError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    }
}

impl RepositoryHost for GithubHost {
    fn list_repos(&self, org: &str, page: u32) -> Result<Vec<RepositoryRef>, RemoteError> {
        let url = format!("{}/orgs/{org}/repos", self.base_url);
        let request = self
            .get(&url)
            .query("type", "all")
            .query("per_page", &PAGE_SIZE.to_string())
            .query("page", &page.to_string());

        match classify(&url, request.call())? {
            Some(response) => response
                .into_json::<Vec<RepositoryRef>>()
                .map_err(|e| decode_err(&url, e)),
            None => Ok(Vec::new()),
        }
    }

    fn get_file_content(
        &self,
        org: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<EncodedContent>, RemoteError> {
        let url = format!(
            "{}/repos/{org}/{repo}/contents/{}",
            self.base_url,
            path.trim_start_matches('/')
        );

        let Some(response) = classify(&url, self.get(&url).call())? else {
            return Ok(None);
        };
        let payload: ContentPayload = response.into_json().map_err(|e| decode_err(&url, e))?;
        Ok(Some(EncodedContent {
            encoding: payload.encoding,
            content: payload.content,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_auth_error() {
        let err = GithubHost::new(DEFAULT_API_URL, "  ", Duration::from_secs(1)).unwrap_err();
        assert!(err.is_auth(), "got: {err}");
    }

    #[test]
    fn debug_output_hides_token() {
        let host = GithubHost::new(DEFAULT_API_URL, "ghp_secret", Duration::from_secs(1))
            .expect("host");
        let rendered = format!("{host:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let host = GithubHost::new("http://localhost:9/", "t", Duration::from_secs(1))
            .expect("host");
        assert_eq!(host.base_url(), "http://localhost:9");
    }
}
