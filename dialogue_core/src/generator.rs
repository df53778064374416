//! The text-generation capability the session talks to.
//!
//! Any real backend (an HTTP client, a local model) lives outside this
//! crate and implements [`TextGenerator`].

use async_trait::async_trait;
use thiserror::Error;

/// Substituted for an empty generator response.
pub const NO_RESPONSE: &str = "No response generated.";

/// Failures reported by a generator backend. The session never retries them.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("quota exceeded: {0}")]
    Quota(String),

    #[error("generation failed: {0}")]
    Other(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        (**self).generate(prompt).await
    }
}

/// Trim a raw response, mapping an empty one to [`NO_RESPONSE`].
pub fn normalize_response(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NO_RESPONSE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_response() {
        assert_eq!(normalize_response("  Hello there.\n"), "Hello there.");
        assert_eq!(normalize_response(""), NO_RESPONSE);
        assert_eq!(normalize_response(" \n\t "), NO_RESPONSE);
    }

    #[test]
    fn test_error_display() {
        let err = GeneratorError::Quota("monthly limit".into());
        assert_eq!(err.to_string(), "quota exceeded: monthly limit");
    }
}
