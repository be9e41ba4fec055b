use crate::config::{AppConfig, IdentityConfig, SessionConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tripwise_agent::{LlmParameterExtractor, ResearchStage, SequentialPipeline, SummarizationStage};
use tripwise_core::{Agent, Content, Llm};
use tripwise_model::GeminiModel;
use tripwise_runner::{Runner, RunnerConfig, final_response};
use tripwise_session::{FileSessionService, InMemorySessionService, SessionService};
use tripwise_tool::GoogleSearchTool;

pub const PIPELINE_NAME: &str = "trip_planner";

/// Research followed by summarization, both driven by `model`.
///
/// The model backs the search tool and the parameter extractor.
pub fn build_pipeline(model: Arc<dyn Llm>) -> Arc<dyn Agent> {
    let search = Arc::new(GoogleSearchTool::new(model.clone()));
    let extractor = Arc::new(LlmParameterExtractor::new(model));

    let research = ResearchStage::new(search).with_extractor(extractor);
    let summary = SummarizationStage::new();

    Arc::new(
        SequentialPipeline::new(
            PIPELINE_NAME,
            vec![Arc::new(research) as Arc<dyn Agent>, Arc::new(summary) as Arc<dyn Agent>],
        )
        .with_description("Researches a destination and turns the findings into a day-by-day plan"),
    )
}

pub fn build_model(config: &AppConfig, api_key: &str) -> Result<Arc<dyn Llm>> {
    let policy = config.retry.to_policy()?;
    let mut model = GeminiModel::new(api_key, &config.model.name)?
        .with_retry_policy(Arc::new(policy))
        .with_timeout(Duration::from_secs(config.model.timeout_secs))?;
    if let Some(base_url) = &config.model.base_url {
        model = model.with_base_url(base_url);
    }
    Ok(Arc::new(model))
}

pub async fn build_session_service(config: &SessionConfig) -> Result<Arc<dyn SessionService>> {
    match &config.store {
        Some(path) => {
            let service = FileSessionService::open(path)
                .await
                .with_context(|| format!("opening session store {}", path.display()))?;
            tracing::info!(path = %path.display(), "using file session store");
            Ok(Arc::new(service))
        }
        None => Ok(Arc::new(InMemorySessionService::new())),
    }
}

pub fn build_runner(
    identity: &IdentityConfig,
    agent: Arc<dyn Agent>,
    session_service: Arc<dyn SessionService>,
) -> Runner {
    Runner::new(RunnerConfig { app_name: identity.app_name.clone(), agent, session_service })
}

/// Submit one message for the configured user and session and return the
/// last final response. Any error in the run is returned instead of a
/// partial answer.
pub async fn call_agent(runner: &Runner, identity: &IdentityConfig, query: &str) -> Result<String> {
    tracing::info!(
        user.id = %identity.user_id,
        session.id = %identity.session_id,
        "submitting query"
    );
    let events = runner
        .run(identity.user_id.clone(), identity.session_id.clone(), Content::user(query))
        .await?;
    let answer = final_response(events).await.context("agent run failed")?;
    answer.ok_or_else(|| anyhow::anyhow!("agent finished without a final response"))
}
