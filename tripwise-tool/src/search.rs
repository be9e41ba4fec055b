use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One result item returned by a search tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSource {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// JSON payload every search tool returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchHit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SearchSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchValidation {
    Valid(Vec<SearchHit>),
    Empty,
    MissingData,
    ToolError(String),
}

impl SearchValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, SearchValidation::Valid(_))
    }

    pub fn reason(&self) -> String {
        match self {
            SearchValidation::Valid(_) => "valid".to_string(),
            SearchValidation::Empty => "empty results".to_string(),
            SearchValidation::MissingData => "results carried no usable data".to_string(),
            SearchValidation::ToolError(message) => format!("tool_error: {message}"),
        }
    }
}

impl SearchHit {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self { title: title.into(), snippet: snippet.into(), url: None }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    fn is_usable(&self) -> bool {
        !self.title.trim().is_empty() || !self.snippet.trim().is_empty()
    }
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        Self { query: query.into(), results, ..Default::default() }
    }

    pub fn error(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self { query: query.into(), tool_error: Some(message.into()), ..Default::default() }
    }

    /// Parse tool output, treating anything that is not a search payload as missing data.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn validate(&self) -> SearchValidation {
        if let Some(message) = self.tool_error.as_deref().filter(|m| !m.trim().is_empty()) {
            return SearchValidation::ToolError(message.to_string());
        }
        if self.results.is_empty() {
            return SearchValidation::Empty;
        }
        let usable: Vec<SearchHit> =
            self.results.iter().filter(|hit| hit.is_usable()).cloned().collect();
        if usable.is_empty() { SearchValidation::MissingData } else { SearchValidation::Valid(usable) }
    }
}
