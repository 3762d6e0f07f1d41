//! Accounts: credential handling and the user-facing auth flows.
//!
//! - [`password`] -- Argon2id hashing and verification.
//! - [`service`] -- registration, login, profile lookup, and the OTP-based
//!   password-reset flow.

pub mod password;
pub mod service;
