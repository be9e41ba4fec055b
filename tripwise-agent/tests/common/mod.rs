#![allow(dead_code)]

use futures::StreamExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tripwise_core::{
    Agent, Content, Event, InvocationContext, ReadonlyContext, Result, Session, Tool,
};
use tripwise_tool::{FunctionTool, SearchHit, SearchResponse};

#[derive(Default)]
pub struct TestSession {
    state: RwLock<HashMap<String, Value>>,
    history: RwLock<Vec<Content>>,
}

impl TestSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_state(state: HashMap<String, Value>) -> Arc<Self> {
        Arc::new(Self { state: RwLock::new(state), history: RwLock::new(Vec::new()) })
    }

    pub fn str(&self, key: &str) -> Option<String> {
        self.get_state(key).and_then(|v| v.as_str().map(String::from))
    }
}

impl Session for TestSession {
    fn id(&self) -> &str {
        "test-session"
    }
    fn app_name(&self) -> &str {
        "test-app"
    }
    fn user_id(&self) -> &str {
        "test-user"
    }
    fn get_state(&self, key: &str) -> Option<Value> {
        self.state.read().unwrap().get(key).cloned()
    }
    fn state(&self) -> HashMap<String, Value> {
        self.state.read().unwrap().clone()
    }
    fn apply_state_delta(&self, delta: &HashMap<String, Value>) {
        self.state.write().unwrap().extend(delta.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    fn conversation_history(&self) -> Vec<Content> {
        self.history.read().unwrap().clone()
    }
    fn append_to_history(&self, content: Content) {
        self.history.write().unwrap().push(content);
    }
}

pub struct TestContext {
    content: Content,
    session: Arc<TestSession>,
}

impl TestContext {
    pub fn new(session: Arc<TestSession>, message: &str) -> Arc<Self> {
        Arc::new(Self { content: Content::user(message), session })
    }
}

impl ReadonlyContext for TestContext {
    fn invocation_id(&self) -> &str {
        "test-inv"
    }
    fn agent_name(&self) -> &str {
        "test-agent"
    }
    fn user_id(&self) -> &str {
        "test-user"
    }
    fn app_name(&self) -> &str {
        "test-app"
    }
    fn session_id(&self) -> &str {
        "test-session"
    }
    fn user_content(&self) -> &Content {
        &self.content
    }
}

impl InvocationContext for TestContext {
    fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }
}

/// Run one user turn to completion, applying state deltas to the session
/// the way the runner persists them.
pub async fn run_turn(
    agent: &Arc<dyn Agent>,
    session: &Arc<TestSession>,
    message: &str,
) -> Result<Vec<Event>> {
    let ctx = TestContext::new(session.clone(), message);
    let mut stream = agent.run(ctx).await?;
    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        let event = event?;
        session.apply_state_delta(&event.actions.state_delta);
        events.push(event);
    }
    Ok(events)
}

pub fn final_texts(events: &[Event]) -> Vec<String> {
    events.iter().filter(|e| e.is_final_response()).filter_map(Event::text).collect()
}

/// Canned results for the travel topics, matched on query wording.
pub fn paris_results(query: &str) -> Vec<SearchHit> {
    let q = query.to_lowercase();
    let hits: &[(&str, &str)] = if q.contains("hotel") || q.contains("stay") || q.contains("accommodation") {
        &[("Hotel du Marais", "Boutique hotel near Place des Vosges"), ("Hotel Rive Gauche", "Quiet rooms in Saint-Germain")]
    } else if q.contains("safety") || q.contains("scams") {
        &[("Pickpockets", "Keep bags closed on metro line 1")]
    } else if q.contains("weather") || q.contains("climate") {
        &[("Spring", "Mild days between 10 and 18 C")]
    } else if q.contains("transport") {
        &[("Metro", "Sixteen lines cover the city"), ("Velib", "Bike share stations everywhere")]
    } else if q.contains("restaurant") || q.contains("food") || q.contains("to eat") {
        &[("Le Comptoir", "Classic bistro cooking"), ("Cafe de Flore", "Historic Left Bank cafe")]
    } else if q.contains("neighborhood") || q.contains("areas") {
        &[("Le Marais", "Historic district with galleries"), ("Montmartre", "Hilltop village atmosphere")]
    } else {
        &[("Louvre", "World's largest art museum"), ("Musee d'Orsay", "Impressionist masterpieces")]
    };
    hits.iter().map(|(t, s)| SearchHit::new(*t, *s)).collect()
}

pub type QueryLog = Arc<Mutex<Vec<String>>>;

/// Search tool whose reply is computed by `respond` from the query. Every
/// query is recorded in the returned log.
pub fn scripted_search<F>(respond: F) -> (Arc<dyn Tool>, QueryLog)
where
    F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
{
    let log: QueryLog = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);
    let tool_log = log.clone();
    let tool = FunctionTool::new("google_search", "scripted search", move |_ctx, args: Value| {
        let respond = respond.clone();
        let log = tool_log.clone();
        async move {
            let query = args["query"].as_str().unwrap_or_default().to_string();
            log.lock().unwrap().push(query.clone());
            (respond.as_ref())(&query)
        }
    });
    (Arc::new(tool), log)
}

pub fn paris_search() -> (Arc<dyn Tool>, QueryLog) {
    scripted_search(|q| Ok(SearchResponse::new(q, paris_results(q)).to_value()))
}

pub fn complete_paris_state() -> HashMap<String, Value> {
    [
        ("trip:destination", "Paris"),
        ("trip:dates", "3 days"),
        ("trip:travelers", "2 travelers"),
        ("trip:budget", "$2000"),
        ("trip:interests", "museums"),
        ("trip:style", "relaxed"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), json!(v)))
    .collect()
}
