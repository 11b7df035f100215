//! Candidate scan: list, then probe each repository in isolation.

use shepherd_core::{CandidateSet, ProbePredicate, RepoFilter};

use crate::error::RemoteError;
use crate::host::RepositoryHost;
use crate::lister::list_repositories;
use crate::prober::probe;

/// List repositories matching `filter` and keep those whose `probe_path`
/// satisfies `predicate`, preserving listing order.
///
/// A probe failure excludes that repository and the scan moves on. Listing
/// failures and authentication failures abort the scan.
pub fn scan_candidates(
    host: &dyn RepositoryHost,
    filter: &RepoFilter,
    probe_path: &str,
    predicate: &ProbePredicate,
) -> Result<CandidateSet, RemoteError> {
    let repos = list_repositories(host, filter)?;
    tracing::info!(
        org = %filter.org,
        count = repos.len(),
        "listed repositories matching filter"
    );

    let mut candidates = CandidateSet::new();
    for repo in repos {
        match probe(host, &filter.org, &repo.name, probe_path, predicate) {
            Ok(true) => candidates.push(repo),
            Ok(false) => {
                tracing::debug!(repo = %repo.name, path = probe_path, %predicate, "probe did not match");
            }
            Err(err) if err.is_auth() => return Err(err),
            Err(err) => {
                tracing::warn!(repo = %repo.name, error = %err, "probe failed; skipping repository");
            }
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeHost;
    use shepherd_core::RepositoryRef;

    fn filter() -> RepoFilter {
        RepoFilter {
            org: "acme".to_string(),
            suffix: "-dotnet".to_string(),
            ..RepoFilter::default()
        }
    }

    fn three_repos() -> FakeHost {
        FakeHost::new()
            .with_pages(vec![vec![
                RepositoryRef::new("a-dotnet", false),
                RepositoryRef::new("b-dotnet", false),
                RepositoryRef::new("c-dotnet", false),
            ]])
            .with_file("a-dotnet", "Jenkinsfile", "pipeline {}")
            .with_file("c-dotnet", "Jenkinsfile", "pipeline {}")
    }

    #[test]
    fn keeps_only_probed_repositories_in_order() {
        let host = three_repos();
        let found = scan_candidates(&host, &filter(), "Jenkinsfile", &ProbePredicate::Exists)
            .expect("scan");
        let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a-dotnet", "c-dotnet"]);
    }

    #[test]
    fn probe_failure_is_isolated() {
        let host = three_repos().fail_repo(
            "a-dotnet",
            RemoteError::Transport {
                url: "fake".to_string(),
                message: "connection reset".to_string(),
            },
        );
        let found = scan_candidates(&host, &filter(), "Jenkinsfile", &ProbePredicate::Exists)
            .expect("scan");
        let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c-dotnet"]);
    }

    #[test]
    fn auth_failure_aborts_scan() {
        let host = three_repos().fail_repo(
            "b-dotnet",
            RemoteError::Auth {
                reason: "token revoked".to_string(),
            },
        );
        let err = scan_candidates(&host, &filter(), "Jenkinsfile", &ProbePredicate::Exists)
            .unwrap_err();
        assert!(err.is_auth());
    }
}
