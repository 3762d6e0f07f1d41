//! Shared domain primitives for the taskdeck backend.
//!
//! This crate has no internal dependencies so it can be used by the
//! persistence, session, and API layers alike.

pub mod otp;
pub mod types;
pub mod validation;
