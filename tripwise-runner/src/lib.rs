//! # tripwise-runner
//!
//! Invocation runtime for Tripwise.
//!
//! - [`Runner`] - runs an agent for one user turn against a stored session
//! - [`RunnerConfig`] - app name, agent and session service
//! - [`InvocationContext`] - the context handed to agents
//! - [`MutableSession`] - live session view shared by pipeline stages
//! - [`final_response`] - drains an event stream down to its answer
//!
//! ```rust,ignore
//! let runner = Runner::new(RunnerConfig {
//!     app_name: "travel_agent".to_string(),
//!     agent: pipeline,
//!     session_service: Arc::new(InMemorySessionService::new()),
//! });
//! let events = runner.run("usertravel1".into(), "1002".into(), Content::user("Paris")).await?;
//! let answer = final_response(events).await?;
//! ```

mod context;
mod runner;

pub use context::{InvocationContext, MutableSession};
pub use runner::{Runner, RunnerConfig, final_response};
