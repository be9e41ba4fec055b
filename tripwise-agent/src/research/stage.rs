use super::document::ResearchDocument;
use super::elicitation::{Elicitation, Pending, looks_like_request};
use super::extractor::ParameterExtractor;
use super::params::{TripParameter, TripParameters};
use super::phase::ResearchPhase;
use super::topics::{SearchTopic, SearchVerdict, TopicOutcome, TopicResults};
use crate::tool_context::StageToolContext;
use async_stream::stream;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tripwise_core::{
    Agent, Content, Event, EventStream, InvocationContext, Result, Tool, ToolContext,
    TripwiseError, user_text,
};
use tripwise_telemetry::Instrument;
use tripwise_tool::SearchResponse;

pub const RESEARCH_FINDINGS_KEY: &str = "research_findings";
pub const PHASE_KEY: &str = "research:phase";
pub const PENDING_KEY: &str = "research:pending";
pub const RESULTS_KEY: &str = "research:results";

pub const COMPLETION_MESSAGE: &str =
    "Great, I have all the details I need. I will now create your itinerary.";

const DATES_REASK_NOTE: &str = "I need to know how long the trip is to plan each day.";

/// First pipeline stage: collects trip parameters, researches the
/// destination and writes a research document under `research_findings`.
///
/// Each run handles one user turn. Everything the stage learns is kept in
/// session state, so a conversation continues where the last turn stopped:
/// confirmed parameters under `trip:<name>`, the open question under
/// `research:pending`, per-topic results under `research:results`.
///
/// The stage writes its output key only once research is complete. Runs
/// that end with a question leave it untouched.
pub struct ResearchStage {
    name: String,
    description: String,
    search_tool: Arc<dyn Tool>,
    extractor: Option<Arc<dyn ParameterExtractor>>,
}

impl ResearchStage {
    pub fn new(search_tool: Arc<dyn Tool>) -> Self {
        Self {
            name: "research_agent".to_string(),
            description: "Collects trip details and researches the destination".to_string(),
            search_tool,
            extractor: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ParameterExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }
}

/// Working copy of the stage's session state for one run. Changes are
/// collected in `delta` and flushed onto the next emitted event.
struct Turn {
    params: TripParameters,
    phase: ResearchPhase,
    pending: Option<Pending>,
    results: TopicResults,
    hints: HashMap<SearchTopic, String>,
    delta: HashMap<String, Value>,
}

impl Turn {
    fn load(state: &HashMap<String, Value>) -> Self {
        let results = state
            .get(RESULTS_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let hints = SearchTopic::ALL
            .into_iter()
            .filter_map(|t| Some((t, state.get(&t.hint_key())?.as_str()?.to_string())))
            .collect();

        Self {
            params: TripParameters::from_state(state),
            phase: ResearchPhase::from_value(state.get(PHASE_KEY)),
            pending: Pending::from_value(state.get(PENDING_KEY)),
            results,
            hints,
            delta: HashMap::new(),
        }
    }

    fn set_param(&mut self, param: TripParameter, value: String) {
        self.delta.insert(param.state_key(), Value::String(value.clone()));
        self.params.set(param, value);
    }

    fn set_phase(&mut self, phase: ResearchPhase) {
        if self.phase != phase {
            tracing::debug!(from = %self.phase, to = %phase, "research phase transition");
        }
        self.phase = phase;
        self.delta.insert(PHASE_KEY.to_string(), json!(phase));
    }

    fn set_pending(&mut self, pending: Option<Pending>) {
        self.pending = pending;
        self.delta.insert(PENDING_KEY.to_string(), pending.map(Pending::to_value).unwrap_or(Value::Null));
    }

    fn set_hint(&mut self, topic: SearchTopic, hint: &str) {
        self.delta.insert(topic.hint_key(), Value::String(hint.to_string()));
        self.hints.insert(topic, hint.to_string());
    }

    fn record(&mut self, topic: SearchTopic, outcome: TopicOutcome) {
        self.results.insert(topic, outcome);
        self.delta.insert(
            RESULTS_KEY.to_string(),
            serde_json::to_value(&self.results).unwrap_or(Value::Null),
        );
    }

    fn event(&mut self, invocation_id: &str, author: &str, text: Option<String>) -> Event {
        let mut event = match text {
            Some(text) => Event::reply(invocation_id, author, Content::model(text)),
            None => {
                let mut event = Event::new(invocation_id);
                event.author = author.to_string();
                event
            }
        };
        event.actions.state_delta = std::mem::take(&mut self.delta);
        event
    }
}

/// Fill parameters from the user's message. Returns the parameter whose
/// answer was given but rejected, so the question can be asked again
/// with a note.
async fn absorb_answer(
    turn: &mut Turn,
    text: &str,
    extractor: Option<&dyn ParameterExtractor>,
) -> Result<Option<TripParameter>> {
    if text.is_empty() || turn.params.is_complete() {
        return Ok(None);
    }

    let target = match turn.pending {
        Some(Pending::Parameter(param)) => Some(param),
        None if !looks_like_request(text) => turn.params.first_missing(),
        _ => None,
    };

    if let Some(extractor) = extractor {
        let extracted = extractor.extract(text, &turn.params.missing()).await?;
        for param in TripParameter::ALL {
            if let Some(value) = extracted.get(&param) {
                if turn.params.get(param).is_none() {
                    turn.set_param(param, value.clone());
                }
            }
        }
    }

    let Some(param) = target.filter(|p| turn.params.get(*p).is_none()) else {
        return Ok(None);
    };
    match param.accept(text) {
        Some(value) => {
            turn.set_param(param, value);
            Ok(None)
        }
        None => Ok(Some(param)),
    }
}

async fn search(
    tool: &Arc<dyn Tool>,
    ctx: &Arc<dyn InvocationContext>,
    call_id: String,
    query: &str,
) -> Result<SearchResponse> {
    let tool_ctx: Arc<dyn ToolContext> = Arc::new(StageToolContext::new(ctx.clone(), call_id));
    let value = tool.execute(tool_ctx, json!({ "query": query })).await?;
    SearchResponse::from_value(value).ok_or_else(|| {
        TripwiseError::Tool(format!("{} returned malformed output for '{query}'", tool.name()))
    })
}

#[async_trait]
impl Agent for ResearchStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn output_key(&self) -> Option<&str> {
        Some(RESEARCH_FINDINGS_KEY)
    }

    #[tripwise_telemetry::instrument(
        skip(self, ctx),
        fields(agent.name = %self.name, invocation.id = %ctx.invocation_id())
    )]
    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        let author = self.name.clone();
        let search_tool = self.search_tool.clone();
        let extractor = self.extractor.clone();
        let span = tripwise_telemetry::agent_run_span(&self.name, ctx.invocation_id());

        let s = stream! {
            let invocation_id = ctx.invocation_id().to_string();
            let text = user_text(ctx.as_ref());
            let mut turn = Turn::load(&ctx.session().state());

            if let Some(Pending::Clarification(topic)) = turn.pending {
                tracing::info!(topic = topic.key(), "clarification received");
                turn.set_hint(topic, &text);
                turn.set_pending(None);
            }

            let rejected = match absorb_answer(&mut turn, &text, extractor.as_deref()).instrument(span.clone()).await {
                Ok(rejected) => rejected,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            // Elicitation gate
            if let Elicitation::Ask(param) = Elicitation::next(&turn.params) {
                turn.set_phase(ResearchPhase::Eliciting);
                turn.set_pending(Some(Pending::Parameter(param)));
                let question = if rejected == Some(param) && param == TripParameter::Dates {
                    format!("{DATES_REASK_NOTE} {}", param.question())
                } else {
                    param.question().to_string()
                };
                tracing::info!(parameter = param.key(), "asking for trip parameter");
                yield Ok(turn.event(&invocation_id, &author, Some(question)));
                return;
            }

            if turn.phase == ResearchPhase::Eliciting {
                tracing::info!(destination = turn.params.destination(), "all trip parameters confirmed");
                turn.set_pending(None);
                turn.set_phase(ResearchPhase::Searching);
                yield Ok(turn.event(&invocation_id, &author, Some(COMPLETION_MESSAGE.to_string())));
            }

            for topic in SearchTopic::ALL {
                if turn.results.contains_key(&topic) {
                    continue;
                }
                let clarified = turn.hints.contains_key(&topic);
                let queries = topic.queries(&turn.params, turn.hints.get(&topic).map(String::as_str));

                let mut outcome = None;
                for (attempt, query) in queries.iter().enumerate() {
                    turn.set_phase(ResearchPhase::Searching);
                    tracing::debug!(topic = topic.key(), query = %query, variant = attempt + 1, "searching");
                    let call_id = format!("{invocation_id}_{}_{}", topic.key(), attempt + 1);
                    let response = match search(&search_tool, &ctx, call_id, query).instrument(span.clone()).await {
                        Ok(response) => response,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    };

                    turn.set_phase(ResearchPhase::Validating);
                    let validation = response.validate();
                    let reason = validation.reason();
                    match SearchVerdict::decide(validation, attempt + 1 < queries.len(), clarified) {
                        SearchVerdict::Accept(hits) => {
                            tracing::debug!(topic = topic.key(), hits = hits.len(), "search accepted");
                            outcome = Some(TopicOutcome::Found(hits));
                            break;
                        }
                        SearchVerdict::Reformulate => {
                            tracing::info!(topic = topic.key(), reason = %reason, "reformulating search");
                        }
                        SearchVerdict::AskUser => {
                            tracing::info!(topic = topic.key(), reason = %reason, "asking user about topic");
                            turn.set_pending(Some(Pending::Clarification(topic)));
                            let question = topic.clarification_question(turn.params.destination());
                            yield Ok(turn.event(&invocation_id, &author, Some(question)));
                            return;
                        }
                        SearchVerdict::Unavailable => {
                            tracing::warn!(topic = topic.key(), reason = %reason, "no verified results");
                            outcome = Some(TopicOutcome::Unavailable);
                            break;
                        }
                    }
                }

                if let Some(outcome) = outcome {
                    turn.record(topic, outcome);
                    yield Ok(turn.event(&invocation_id, &author, None));
                }
            }

            turn.set_phase(ResearchPhase::Emitting);
            let document = ResearchDocument::build(&turn.params, &turn.results).render();
            tracing::info!(destination = turn.params.destination(), "research findings ready");
            turn.delta.insert(RESEARCH_FINDINGS_KEY.to_string(), Value::String(document.clone()));
            yield Ok(turn.event(&invocation_id, &author, Some(document)));
        };

        Ok(Box::pin(s))
    }
}
