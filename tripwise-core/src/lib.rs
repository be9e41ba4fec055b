//! # tripwise-core
//!
//! Core traits and types shared by every Tripwise crate.
//!
//! - [`Agent`] - a pipeline stage producing a stream of [`Event`]s
//! - [`Llm`] - the hosted model boundary
//! - [`Tool`] - capabilities a stage can call (web search)
//! - [`Session`] / [`InvocationContext`] - state visible to a running stage
//! - [`TripwiseError`] / [`Result`] - unified error handling
//!
//! ## State Management
//!
//! Session state keys may carry a scope prefix:
//!
//! - `user:` - shared by all sessions of a user
//! - `app:` - shared by the whole application
//! - `temp:` - dropped before the event is persisted

pub mod agent;
pub mod context;
pub mod error;
pub mod event;
pub mod model;
pub mod tool;
pub mod types;

pub use agent::{Agent, EventStream};
pub use context::{InvocationContext, ReadonlyContext, Session, user_text};
pub use error::{Result, TripwiseError};
pub use event::{Event, EventActions, KEY_PREFIX_APP, KEY_PREFIX_TEMP, KEY_PREFIX_USER};
pub use model::{
    FinishReason, GOOGLE_SEARCH_TOOL, GenerateContentConfig, GroundingChunk, GroundingMetadata,
    Llm, LlmRequest, LlmResponse, UsageMetadata,
};
pub use tool::{Tool, ToolContext};
pub use types::{Content, FunctionResponseData, Part, ROLE_MODEL, ROLE_USER};
