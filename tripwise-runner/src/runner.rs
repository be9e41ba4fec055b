use crate::context::{InvocationContext, MutableSession};
use async_stream::stream;
use futures::StreamExt;
use std::sync::Arc;
use tripwise_core::{Agent, Content, Event, EventStream, Result, Session};
use tripwise_session::{SessionKey, SessionService};

pub struct RunnerConfig {
    pub app_name: String,
    pub agent: Arc<dyn Agent>,
    pub session_service: Arc<dyn SessionService>,
}

/// Drives one agent against stored sessions.
///
/// Each call to [`Runner::run`] is one invocation: the session is fetched
/// or created, the user turn is recorded, and every event the agent yields
/// is persisted before it is handed to the caller.
pub struct Runner {
    app_name: String,
    root_agent: Arc<dyn Agent>,
    session_service: Arc<dyn SessionService>,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            app_name: config.app_name,
            root_agent: config.agent,
            session_service: config.session_service,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub async fn run(
        &self,
        user_id: String,
        session_id: String,
        user_content: Content,
    ) -> Result<EventStream> {
        let key = SessionKey::new(self.app_name.clone(), user_id, session_id);
        let session_service = self.session_service.clone();
        let root_agent = self.root_agent.clone();

        let s = stream! {
            let stored = match session_service.get_or_create(&key).await {
                Ok(s) => s,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let invocation_id = format!("inv-{}", uuid::Uuid::new_v4());
            tracing::info!(
                invocation.id = %invocation_id,
                session = %key,
                agent = root_agent.name(),
                "starting invocation"
            );
            let live = Arc::new(MutableSession::new(stored.as_ref()));
            let ctx = Arc::new(InvocationContext::new(
                invocation_id.clone(),
                root_agent.clone(),
                user_content.clone(),
                live.clone(),
            ));

            let user_event = Event::reply(&invocation_id, "user", user_content.clone());
            live.append_to_history(user_content);
            if let Err(e) = session_service.append_event(&key, user_event).await {
                yield Err(e);
                return;
            }

            let mut agent_stream = match root_agent.run(ctx).await {
                Ok(s) => s,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            while let Some(result) = agent_stream.next().await {
                match result {
                    Ok(event) => {
                        live.apply_state_delta(&event.actions.state_delta);
                        if let Err(e) = session_service.append_event(&key, event.clone()).await {
                            yield Err(e);
                            return;
                        }
                        yield Ok(event);
                    }
                    Err(e) => {
                        tracing::error!(invocation.id = %invocation_id, error = %e, "invocation failed");
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(s))
    }
}

/// Drain `events` and return the text of the last final response.
///
/// The first error aborts the drain and is returned instead, so callers
/// never see a partial answer.
pub async fn final_response(mut events: EventStream) -> Result<Option<String>> {
    let mut last = None;
    while let Some(event) = events.next().await {
        let event = event?;
        if event.is_final_response() {
            if let Some(text) = event.text() {
                last = Some(text);
            }
        }
    }
    Ok(last)
}
