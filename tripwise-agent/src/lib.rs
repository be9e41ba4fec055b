//! # tripwise-agent
//!
//! The stages of the Tripwise travel-planning pipeline.
//!
//! - [`ResearchStage`] asks for the six trip parameters one at a time,
//!   researches the destination with a search tool and writes a research
//!   document under [`RESEARCH_FINDINGS_KEY`].
//! - [`SummarizationStage`] rewrites that document into a day-by-day
//!   itinerary under [`FINAL_SUMMARY_KEY`].
//! - [`SequentialPipeline`] chains stages over one shared session.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tripwise_agent::{ResearchStage, SequentialPipeline, SummarizationStage};
//!
//! let pipeline = SequentialPipeline::new(
//!     "trip_planner",
//!     vec![
//!         Arc::new(ResearchStage::new(search_tool)),
//!         Arc::new(SummarizationStage::new()),
//!     ],
//! );
//! ```

pub mod pipeline;
pub mod research;
pub mod summarize;
mod tool_context;

pub use pipeline::SequentialPipeline;
pub use research::{
    COMPLETION_MESSAGE, LlmParameterExtractor, ParameterExtractor, RESEARCH_FINDINGS_KEY,
    ResearchPhase, ResearchStage, TripParameter, TripParameters,
};
pub use summarize::{FINAL_SUMMARY_KEY, SummarizationStage, render_itinerary};
