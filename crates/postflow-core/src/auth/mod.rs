//! Session boundary: persisted credential + cached user record.
//!
//! This module provides:
//! - `SessionStore`: the key-value storage port, with in-memory, file and
//!   OS keychain implementations
//! - `Session`: typed access to the stored token and user, and the
//!   authenticated / anonymous state derived from them
//!
//! No expiry is tracked locally. A session ends on logout or when the API
//! client sees a 401 outside the exempt routes.

pub mod keychain;
pub mod session;
pub mod store;

pub use keychain::KeyringStore;
pub use session::{AuthState, Session, TOKEN_KEY, USER_KEY};
pub use store::{FileStore, MemoryStore, SessionStore};
