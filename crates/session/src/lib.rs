//! Refresh-token session store.
//!
//! Every refresh token is mirrored by a [`model::Session`] keyed by the
//! token's payload UUID. The store is a TTL'd key-value mapping: Redis in
//! production ([`redis_store::RedisSessionStore`]), a mutex-guarded map in
//! tests ([`memory::MemorySessionStore`]). Both expose the same
//! [`store::SessionStore`] trait, and an expired session is indistinguishable
//! from a deleted one.

pub mod error;
pub mod memory;
pub mod model;
pub mod redis_store;
pub mod store;

pub use error::SessionStoreError;
pub use memory::MemorySessionStore;
pub use model::{CreateSession, Session};
pub use redis_store::RedisSessionStore;
pub use store::SessionStore;
