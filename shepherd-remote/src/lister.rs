//! Paged repository listing with name and archive filters.

use shepherd_core::{RepoFilter, RepositoryRef};

use crate::error::RemoteError;
use crate::host::RepositoryHost;

/// Upper bound on pages requested, even if the host keeps answering.
pub const MAX_PAGES: u32 = 100;

/// List the repositories of `filter.org` that pass `filter`.
///
/// Pages from 1 until an empty page comes back or [`MAX_PAGES`] is reached.
/// Entries the host returns are filtered here, never trusted.
pub fn list_repositories(
    host: &dyn RepositoryHost,
    filter: &RepoFilter,
) -> Result<Vec<RepositoryRef>, RemoteError> {
    let mut repos = Vec::new();
    let mut exhausted = false;

    for page in 1..=MAX_PAGES {
        let batch = host.list_repos(&filter.org, page)?;
        tracing::debug!(org = %filter.org, page, count = batch.len(), "fetched repository page");
        if batch.is_empty() {
            exhausted = true;
            break;
        }
        repos.extend(batch.into_iter().filter(|repo| filter.matches(repo)));
    }

    if !exhausted {
        tracing::warn!(
            org = %filter.org,
            max_pages = MAX_PAGES,
            "stopped listing at the page limit; results may be incomplete"
        );
    }

    Ok(repos)
}
