pub mod codes;
pub mod health;
pub mod messages;
pub mod relay_auth;
pub mod setup;
pub mod status;

pub use relay_auth::RelayCredential;
