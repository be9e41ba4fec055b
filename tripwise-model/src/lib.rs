//! # tripwise-model
//!
//! Model integrations for Tripwise stages.
//!
//! - [`GeminiModel`] - Gemini `generateContent` over REST
//! - [`RetryPolicy`] / [`execute_with_retry`] - bounded exponential backoff
//! - [`MockLlm`] - scripted model for tests
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tripwise_model::{GeminiModel, RetryPolicy};
//!
//! let policy = Arc::new(RetryPolicy::default());
//! let model = GeminiModel::new("api-key", "gemini-2.5-flash-lite")
//!     .unwrap()
//!     .with_retry_policy(policy);
//! ```

pub mod gemini;
pub mod mock;
pub mod retry;

pub use gemini::{DEFAULT_GEMINI_BASE_URL, GeminiModel};
pub use mock::MockLlm;
pub use retry::{DEFAULT_RETRYABLE_STATUS_CODES, RetryPolicy, execute_with_retry};
