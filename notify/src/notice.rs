//! Rendering the verification request email.

use crate::links::VerificationLinks;
use serde::Serialize;
use zid_types::{EmailAddress, JobHistoryRecord};

/// A fully rendered notification, ready for dispatch.
#[derive(Clone, Debug, Serialize)]
pub struct VerificationNotice {
    pub to: EmailAddress,
    pub subject: String,
    pub body: String,
}

impl VerificationNotice {
    /// Render the verification request for `record`, addressed to the
    /// verifier, with the requester's optional note and both action links.
    pub fn verification_request(
        to: EmailAddress,
        record: &JobHistoryRecord,
        message: Option<&str>,
        links: &VerificationLinks,
    ) -> Self {
        let subject = format!(
            "Please verify employment: {} at {}",
            record.details.job_title, record.details.company_name
        );

        let mut body = String::new();
        body.push_str(&format!(
            "A candidate has asked you to verify that they worked as {} at {}.\n\n",
            record.details.job_title, record.details.company_name
        ));
        if let Some(message) = message {
            body.push_str(&format!("Message from the candidate:\n{message}\n\n"));
        }
        body.push_str(&format!(
            "To confirm this employment, open:\n{}\n\n\
             If you cannot confirm it, open:\n{}\n\n\
             The link is single-use and expires automatically.\n",
            links.accept_url, links.reject_url
        ));

        Self { to, subject, body }
    }
}
