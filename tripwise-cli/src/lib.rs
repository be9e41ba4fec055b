//! # tripwise-cli
//!
//! The `tripwise` command-line front end.
//!
//! - `tripwise ask <message>` sends one message and prints
//!   `Agent Response: <text>`
//! - `tripwise console` runs the multi-turn conversation in a REPL
//!
//! Settings come from a TOML file (see [`AppConfig`]) and the API key from
//! `GOOGLE_API_KEY` or `GEMINI_API_KEY`. Pass `session.store` to keep
//! conversations across runs.

pub mod app;
pub mod cli;
pub mod config;
pub mod console;

pub use app::{build_model, build_pipeline, build_runner, build_session_service, call_agent};
pub use cli::{Cli, Commands};
pub use config::{AppConfig, IdentityConfig, ModelConfig, RetryConfig, SessionConfig, api_key_from_env};
pub use console::run_console;
