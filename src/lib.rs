//! # identity-2fa
//!
//! Client side of the platform's two-factor authentication.
//!
//! ## Flows
//!
//! Every interactive flow is a reducer over an explicit step enum: events in,
//! effects out, no I/O inside the reducer. The [`runtime`] executes effects
//! against the API and feeds results back as events, so flows are tested
//! without a network and the same flow runs in the terminal or in tests.
//!
//! - **Setup:** enroll a phone number or authenticator app, or verify with an
//!   active factor. Phone factors receive a code by SMS with a 10 second
//!   resend cooldown.
//! - **Deactivate:** remove an active factor after confirming a code.
//! - **Gate:** decides whether a session must pass 2FA, hosting the setup
//!   flow when it does, and optionally pairs a companion device.
//!
//! ## Session
//!
//! The session token lives in an explicit [`session::SessionContext`],
//! persisted to a JSON file and attached as a bearer token to every request.

pub mod api;
pub mod cli;
pub mod controls;
pub mod flows;
pub mod identity;
pub mod polling;
pub mod runtime;
pub mod session;
pub mod view;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
