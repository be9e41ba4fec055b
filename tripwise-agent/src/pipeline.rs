use async_stream::stream;
use async_trait::async_trait;
use std::sync::Arc;
use tripwise_core::{Agent, EventStream, InvocationContext, Result};

/// Runs stages once each, in order, against one shared session.
///
/// Every event's state delta is applied to the live session before the
/// next event is read, so a stage sees what earlier stages wrote. The
/// pipeline stops early when a stage fails or declares an output key it
/// did not write during this run.
pub struct SequentialPipeline {
    name: String,
    description: String,
    stages: Vec<Arc<dyn Agent>>,
}

impl SequentialPipeline {
    pub fn new(name: impl Into<String>, stages: Vec<Arc<dyn Agent>>) -> Self {
        Self { name: name.into(), description: String::new(), stages }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

#[async_trait]
impl Agent for SequentialPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sub_agents(&self) -> &[Arc<dyn Agent>] {
        &self.stages
    }

    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        let stages = self.stages.clone();
        let pipeline = self.name.clone();

        let s = stream! {
            use futures::StreamExt;

            for stage in &stages {
                tracing::debug!(pipeline = %pipeline, stage = stage.name(), "running stage");
                let mut events = match stage.run(ctx.clone()).await {
                    Ok(events) => events,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let mut wrote_output = false;
                while let Some(result) = events.next().await {
                    match result {
                        Ok(event) => {
                            if !event.actions.state_delta.is_empty() {
                                ctx.session().apply_state_delta(&event.actions.state_delta);
                            }
                            if let Some(key) = stage.output_key() {
                                wrote_output |= event.actions.state_delta.contains_key(key);
                            }
                            if let Some(ref content) = event.llm_response.content {
                                ctx.session().append_to_history(content.clone());
                            }
                            yield Ok(event);
                        }
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }

                if let Some(key) = stage.output_key() {
                    if !wrote_output {
                        tracing::info!(
                            pipeline = %pipeline,
                            stage = stage.name(),
                            output_key = key,
                            "stage produced no output, waiting for user input"
                        );
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_agents_are_stages() {
        let pipeline = SequentialPipeline::new("planner", vec![]).with_description("two stages");
        assert_eq!(pipeline.name(), "planner");
        assert_eq!(pipeline.description(), "two stages");
        assert!(pipeline.sub_agents().is_empty());
        assert!(pipeline.output_key().is_none());
    }
}
