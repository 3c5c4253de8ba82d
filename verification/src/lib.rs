//! The job-history verification workflow.
//!
//! Two stateless request-handlers over the storage and notification seams:
//! 1. **Request issuer** — creates the single-use token, moves the record to
//!    `PENDING`, and dispatches the verifier email (with rollback if
//!    dispatch fails).
//! 2. **Link resolver** — validates a token presented via a verification
//!    link and applies the accept/reject/expire transition exactly once,
//!    enqueueing the anchor follow-up on acceptance.
//!
//! Record CRUD for candidates lives in [`records`]; it shares the
//! no-pending-token delete guard with the token store.

pub mod error;
pub mod issuer;
pub mod records;
pub mod resolver;

pub use error::VerificationError;
pub use issuer::{IssuedRequest, RequestIssuer};
pub use records::RecordService;
pub use resolver::{LinkResolver, Resolution};
