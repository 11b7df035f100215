//! Single-file content probe.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shepherd_core::ProbePredicate;

use crate::error::RemoteError;
use crate::host::{EncodedContent, RepositoryHost};

/// Decode host content into text.
///
/// Base64 bodies are wrapped at 60 columns by GitHub, so whitespace is
/// stripped first. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_content(encoded: &EncodedContent) -> Result<String, RemoteError> {
    match encoded.encoding.as_str() {
        "base64" => {
            let compact: String = encoded
                .content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = STANDARD.decode(compact).map_err(|e| RemoteError::Decode {
                url: String::new(),
                message: format!("invalid base64 content: {e}"),
            })?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        // "none" (body too large to inline) and unencoded bodies.
        _ => Ok(encoded.content.clone()),
    }
}

/// Does `org/repo` contain `path`, and does its content satisfy `predicate`?
///
/// A missing file is `Ok(false)`; only other failures are errors.
pub fn probe(
    host: &dyn RepositoryHost,
    org: &str,
    repo: &str,
    path: &str,
    predicate: &ProbePredicate,
) -> Result<bool, RemoteError> {
    let Some(encoded) = host.get_file_content(org, repo, path)? else {
        tracing::debug!(repo, path, "probe file not found");
        return Ok(false);
    };
    let text = decode_content(&encoded).map_err(|e| match e {
        RemoteError::Decode { message, .. } => RemoteError::Decode {
            url: format!("{org}/{repo}/{path}"),
            message,
        },
        other => other,
    })?;
    Ok(predicate.matches(&text))
}
