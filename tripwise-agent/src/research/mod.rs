//! The research stage and the pieces of its state machine.

pub mod document;
pub mod elicitation;
pub mod extractor;
pub mod params;
pub mod phase;
mod stage;
pub mod topics;

pub use document::ResearchDocument;
pub use elicitation::{Elicitation, Pending};
pub use extractor::{LlmParameterExtractor, ParameterExtractor};
pub use params::{Budget, MAX_TRIP_DAYS, TripParameter, TripParameters, trip_days};
pub use phase::ResearchPhase;
pub use stage::{
    COMPLETION_MESSAGE, PENDING_KEY, PHASE_KEY, RESEARCH_FINDINGS_KEY, RESULTS_KEY, ResearchStage,
};
pub use topics::{SearchTopic, SearchVerdict, TopicOutcome, TopicResults};
