//! The two calls shepherd needs from a code-hosting service.

use shepherd_core::RepositoryRef;

use crate::error::RemoteError;

/// Number of repositories requested per listing page.
pub const PAGE_SIZE: u32 = 100;

/// File content as returned by the host, still in its transfer encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedContent {
    /// `"base64"` for regular files; `"none"` when the host omits large bodies.
    pub encoding: String,
    pub content: String,
}

/// Read-only access to an organization's repositories.
pub trait RepositoryHost {
    /// One page (1-based) of the organization's repositories, in host order.
    /// An empty page means the listing is exhausted.
    fn list_repos(&self, org: &str, page: u32) -> Result<Vec<RepositoryRef>, RemoteError>;

    /// The file at `path` in `org/repo`, or `None` when it does not exist.
    fn get_file_content(
        &self,
        org: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<EncodedContent>, RemoteError>;
}
