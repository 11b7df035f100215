//! # shepherd-remote
//!
//! Repository discovery against a code-hosting API.
//!
//! [`list_repositories`] pages through an organization, [`probe`] checks one
//! file in one repository, and [`scan_candidates`] combines the two with
//! per-repository failure isolation. [`GithubHost`] is the production
//! [`RepositoryHost`]; [`fakes::FakeHost`] serves canned data for tests.

pub mod error;
pub mod fakes;
pub mod github;
pub mod host;
pub mod lister;
pub mod prober;
pub mod scan;

pub use error::RemoteError;
pub use github::GithubHost;
pub use host::{EncodedContent, RepositoryHost, PAGE_SIZE};
pub use lister::{list_repositories, MAX_PAGES};
pub use prober::{decode_content, probe};
pub use scan::scan_candidates;
