use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tripwise_core::{Content, Llm, LlmRequest, LlmResponse, Result, TripwiseError};

enum Scripted {
    Response(LlmResponse),
    Http(u16, String),
}

/// Model double that replays scripted replies in order and records requests.
pub struct MockLlm {
    name: String,
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, response: LlmResponse) -> Self {
        self.push(Scripted::Response(response));
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(LlmResponse::new(Content::model(text)))
    }

    /// Script a failed call with the given HTTP status.
    pub fn with_http_error(self, status: u16, message: impl Into<String>) -> Self {
        self.push(Scripted::Http(status, message.into()));
        self
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_else(|p| p.into_inner().clone())
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn push(&self, reply: Scripted) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, req: LlmRequest) -> Result<LlmResponse> {
        self.requests
            .lock()
            .map_err(|_| TripwiseError::Model("mock request log poisoned".into()))?
            .push(req);

        let next = self
            .replies
            .lock()
            .map_err(|_| TripwiseError::Model("mock replies poisoned".into()))?
            .pop_front();

        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Http(status, message)) => Err(TripwiseError::Http { status, message }),
            None => Err(TripwiseError::Model(format!("{}: no scripted response left", self.name))),
        }
    }
}
