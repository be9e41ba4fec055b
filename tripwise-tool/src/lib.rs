//! # tripwise-tool
//!
//! Search capability for the research stage.
//!
//! Every search tool takes `{"query": "..."}` and returns a [`SearchResponse`]
//! as JSON: a list of results plus an optional `tool_error` field.
//!
//! - [`GoogleSearchTool`] - search grounded by Gemini's Google Search
//! - [`FunctionTool`] - wrap any async closure as a tool
//!
//! ```rust
//! use tripwise_tool::{FunctionTool, SearchHit, SearchResponse};
//!
//! let tool = FunctionTool::new("google_search", "canned search", |_ctx, args| async move {
//!     let query = args["query"].as_str().unwrap_or_default().to_string();
//!     Ok(SearchResponse::new(query, vec![SearchHit::new("Louvre", "Art museum")]).to_value())
//! });
//! ```

mod function_tool;
mod google_search;
pub mod search;

pub use function_tool::FunctionTool;
pub use google_search::GoogleSearchTool;
pub use search::{SearchHit, SearchResponse, SearchSource, SearchValidation};
pub use tripwise_core::{Tool, ToolContext};
