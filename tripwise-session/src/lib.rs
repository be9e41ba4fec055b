//! # tripwise-session
//!
//! Session storage for Tripwise conversations.
//!
//! A session is keyed by app name, user id and session id. It holds the
//! ordered event log and a key/value state map. Keys prefixed `app:` are
//! shared by every session of the app, `user:` keys by every session of the
//! user, and `temp:` keys are never stored.
//!
//! Two services are provided:
//!
//! - [`InMemorySessionService`] keeps sessions for the life of the process.
//! - [`FileSessionService`] persists them to a JSON file.

pub mod file;
pub mod inmemory;
pub mod service;
pub mod session;
mod store;

pub use file::FileSessionService;
pub use inmemory::InMemorySessionService;
pub use service::{CreateRequest, DeleteRequest, GetRequest, ListRequest, SessionService};
pub use session::{Session, SessionKey, SessionSnapshot};
