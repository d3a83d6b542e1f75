pub mod outcome;
pub mod service;
pub mod totp;

pub use outcome::{Denial, DenialReason, IssueOutcome, IssuedCode, UsageStatus};
pub use service::CodeIssuer;
pub use totp::{CodeGenerator, SecretError};
