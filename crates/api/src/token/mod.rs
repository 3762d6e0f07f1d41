//! Bearer-token issuance, verification, and session-backed renewal.
//!
//! - [`codec`] -- stateless signing/verification of self-contained tokens.
//! - [`service`] -- orchestrates the codec and the session store to issue,
//!   renew, and revoke access/refresh token pairs.

pub mod codec;
pub mod service;
