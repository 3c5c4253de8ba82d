//! Notification dispatch for verification requests.
//!
//! The issuer hands a fully rendered [`VerificationNotice`] to a
//! [`Notifier`]; delivery is awaited and a dispatch failure is a hard
//! failure for the issuance operation (the issuer rolls back). No
//! fire-and-forget sends.

pub mod error;
pub mod links;
pub mod mailer;
pub mod notice;

pub use error::NotifyError;
pub use links::VerificationLinks;
pub use mailer::HttpMailer;
pub use notice::VerificationNotice;

/// The notification dispatch collaborator.
pub trait Notifier {
    /// Deliver the notice, or fail. Must not return `Ok` unless the
    /// downstream service accepted the message.
    fn send(
        &self,
        notice: &VerificationNotice,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}

impl<N: Notifier + Send + Sync> Notifier for std::sync::Arc<N> {
    fn send(
        &self,
        notice: &VerificationNotice,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send {
        (**self).send(notice)
    }
}
