//! # Signet (Signed-Cookie Login)
//!
//! `signet` authenticates a username/password pair against an immutable user
//! directory and hands the browser a self-verifying session cookie. No session
//! state is kept on the server: the cookie *is* the session.
//!
//! ## Session Token
//!
//! The cookie value has the shape `base64(username) "." HMAC-SHA256(key, username)`,
//! with the signature rendered as uppercase hex. A token is accepted only when the
//! recomputed signature matches the embedded one (constant-time). Anything else,
//! including a missing separator or broken base64, degrades to the anonymous
//! login form and the cookie is cleared.
//!
//! ## Passwords
//!
//! Stored hashes are `SHA256(password + salt)` in hex. The salt is a process-wide
//! secret; use `signet hash <PASSWORD>` to produce entries for the user file.

pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
