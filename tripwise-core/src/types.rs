use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "user";
pub const ROLE_MODEL: &str = "model";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponseData {
    pub name: String,
    pub response: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FunctionCall {
        name: String,
        args: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    FunctionResponse {
        function_response: FunctionResponseData,
    },
}

impl Content {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into(), parts: Vec::new() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ROLE_USER).with_text(text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ROLE_MODEL).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text { text: text.into() });
        self
    }

    /// Concatenated text of all text parts, `None` when there are none.
    pub fn text(&self) -> Option<String> {
        let mut out = String::new();
        let mut found = false;
        for part in &self.parts {
            if let Some(text) = part.text() {
                out.push_str(text);
                found = true;
            }
        }
        found.then_some(out)
    }
}

impl Part {
    /// Returns the text content if this is a Text part, None otherwise
    pub fn text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn text_part(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self, Part::FunctionCall { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_creation() {
        let content = Content::user("Hello");
        assert_eq!(content.role, "user");
        assert_eq!(content.parts.len(), 1);
    }

    #[test]
    fn test_content_text_joins_parts() {
        let content = Content::new(ROLE_MODEL).with_text("Day 1").with_text(" - Louvre");
        assert_eq!(content.text().as_deref(), Some("Day 1 - Louvre"));
    }

    #[test]
    fn test_content_text_none_without_text_parts() {
        let mut content = Content::new(ROLE_MODEL);
        content.parts.push(Part::FunctionCall {
            name: "google_search".to_string(),
            args: serde_json::json!({"query": "paris"}),
        });
        assert_eq!(content.text(), None);
        assert!(content.parts[0].is_function_call());
    }

    #[test]
    fn test_function_response_uses_camel_case() {
        let part = Part::FunctionResponse {
            function_response: FunctionResponseData {
                name: "google_search".to_string(),
                response: serde_json::json!({"results": []}),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert!(json.get("functionResponse").is_some());
    }
}
