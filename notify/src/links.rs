//! Verification link construction.
//!
//! The public resolve path is `/verify-employment/{tokenId}/{action}` —
//! this shape is a hard boundary shared with the resolver's route table.
//! Only the token id goes into a link; record ids are not capabilities.

use zid_types::{TokenId, VerificationAction};

/// The pair of action links embedded in a verification email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationLinks {
    pub accept_url: String,
    pub reject_url: String,
}

impl VerificationLinks {
    /// Build both links for `token` under the service's public base URL.
    pub fn build(base_url: &str, token: &TokenId) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            accept_url: link(base, token, VerificationAction::Accept),
            reject_url: link(base, token, VerificationAction::Reject),
        }
    }
}

fn link(base: &str, token: &TokenId, action: VerificationAction) -> String {
    format!("{base}/verify-employment/{token}/{action}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_follow_the_public_path_shape() {
        let token = TokenId::parse("vtk_abc123").unwrap();
        let links = VerificationLinks::build("https://app.example.com", &token);
        assert_eq!(
            links.accept_url,
            "https://app.example.com/verify-employment/vtk_abc123/accept"
        );
        assert_eq!(
            links.reject_url,
            "https://app.example.com/verify-employment/vtk_abc123/reject"
        );
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let token = TokenId::parse("vtk_abc123").unwrap();
        let links = VerificationLinks::build("https://app.example.com/", &token);
        assert!(!links.accept_url.contains("//verify-employment"));
    }
}
