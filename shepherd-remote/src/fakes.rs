//! In-memory [`RepositoryHost`] for tests.
//!
//! Serves canned listing pages and files, and can be told to fail listing or
//! to fail every file request for a given repository.

use std::collections::HashMap;
use std::sync::Mutex;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shepherd_core::RepositoryRef;

use crate::error::RemoteError;
use crate::host::{EncodedContent, RepositoryHost};

#[derive(Debug, Default)]
pub struct FakeHost {
    pages: Vec<Vec<RepositoryRef>>,
    endless: Option<Vec<RepositoryRef>>,
    files: HashMap<(String, String), EncodedContent>,
    repo_failures: HashMap<String, RemoteError>,
    listing_failure: Option<RemoteError>,
    requested: Mutex<Vec<u32>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing pages in order; page N+1 onward is empty.
    pub fn with_pages(mut self, pages: Vec<Vec<RepositoryRef>>) -> Self {
        self.pages = pages;
        self
    }

    /// Every page returns `page`, forever.
    pub fn endless(mut self, page: Vec<RepositoryRef>) -> Self {
        self.endless = Some(page);
        self
    }

    /// Serve `text` base64-encoded at `repo/path`.
    pub fn with_file(self, repo: &str, path: &str, text: &str) -> Self {
        self.with_raw_file(
            repo,
            path,
            EncodedContent {
                encoding: "base64".to_string(),
                content: STANDARD.encode(text),
            },
        )
    }

    pub fn with_raw_file(mut self, repo: &str, path: &str, content: EncodedContent) -> Self {
        self.files
            .insert((repo.to_string(), path.to_string()), content);
        self
    }

    /// Every file request for `repo` fails with `err`.
    pub fn fail_repo(mut self, repo: &str, err: RemoteError) -> Self {
        self.repo_failures.insert(repo.to_string(), err);
        self
    }

    pub fn fail_listing(mut self, err: RemoteError) -> Self {
        self.listing_failure = Some(err);
        self
    }

    /// Page numbers requested so far, in call order.
    pub fn pages_requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

impl RepositoryHost for FakeHost {
    fn list_repos(&self, _org: &str, page: u32) -> Result<Vec<RepositoryRef>, RemoteError> {
        self.requested.lock().unwrap().push(page);
        if let Some(err) = &self.listing_failure {
            return Err(err.clone());
        }
        if let Some(endless) = &self.endless {
            return Ok(endless.clone());
        }
        let index = page.saturating_sub(1) as usize;
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    fn get_file_content(
        &self,
        _org: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<EncodedContent>, RemoteError> {
        if let Some(err) = self.repo_failures.get(repo) {
            return Err(err.clone());
        }
        Ok(self
            .files
            .get(&(repo.to_string(), path.to_string()))
            .cloned())
    }
}
