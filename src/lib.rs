//! # Codegate (one-time codes behind per-user quotas)
//!
//! `codegate` hands out the current authenticator code for a shared account to chat
//! members, one member at a time, under two limits:
//!
//! - **Cooldown:** at least 30 seconds between two successful requests of a member.
//! - **Daily quota:** at most 2 codes per member per local calendar date. The counter
//!   resets the first time a member is seen on a new date (rollover-on-read).
//!
//! Denials are values ([`issuer::IssueOutcome::Denied`]), never errors. A missing
//! shared secret only disables issuance; a missing platform credential stops the
//! process at startup.
//!
//! The chat gateway itself lives outside this crate. A relay forwards button clicks
//! and slash commands to the HTTP API in [`api`] and renders the replies.

pub mod api;
pub mod cli;
pub mod issuer;
pub mod quota;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
