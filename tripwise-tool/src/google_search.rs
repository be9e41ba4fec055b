use crate::search::{SearchHit, SearchResponse, SearchSource};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tripwise_core::{
    Content, FinishReason, GOOGLE_SEARCH_TOOL, Llm, LlmRequest, LlmResponse, Result, Tool,
    ToolContext, TripwiseError,
};
use tripwise_telemetry::Instrument;

const SEARCH_INSTRUCTION: &str = "You are a web search backend. Use Google Search to answer the \
query. Reply only with a bulleted list, one result per line, formatted as \
`- <name>: <one sentence of facts>`. Do not add an introduction or a conclusion. \
If the search finds nothing relevant, reply with exactly NO_RESULTS.";

const NO_RESULTS: &str = "NO_RESULTS";

/// Web search grounded by Gemini's built-in Google Search.
///
/// The model does the searching; this tool turns its bulleted answer and
/// grounding sources into a [`SearchResponse`]. Transport failures surface as
/// errors (after the model's retry policy); unusable answers come back with
/// `tool_error` set or with no results.
pub struct GoogleSearchTool {
    model: Arc<dyn Llm>,
}

impl GoogleSearchTool {
    pub fn new(model: Arc<dyn Llm>) -> Self {
        Self { model }
    }

    fn parse_response(query: &str, response: &LlmResponse) -> SearchResponse {
        if let Some(reason @ (FinishReason::Safety | FinishReason::Recitation)) =
            response.finish_reason
        {
            return SearchResponse::error(query, format!("search blocked ({reason:?})"));
        }
        if let Some(message) = &response.error_message {
            return SearchResponse::error(query, message.clone());
        }
        let Some(text) = response.text() else {
            return SearchResponse::error(query, "search returned no content");
        };

        let results = if text.trim() == NO_RESULTS { Vec::new() } else { parse_hits(&text) };
        let sources = response
            .grounding_metadata
            .as_ref()
            .map(|g| {
                g.grounding_chunks
                    .iter()
                    .map(|c| SearchSource { title: c.title.clone(), url: c.uri.clone() })
                    .collect()
            })
            .unwrap_or_default();

        SearchResponse { query: query.to_string(), results, sources, tool_error: None }
    }
}

fn strip_bullet(line: &str) -> Option<&str> {
    let line = line.trim();
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest);
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        return line[digits..].strip_prefix(". ");
    }
    None
}

/// Bulleted `name: facts` lines into hits. Lines that are not bullets are ignored.
pub(crate) fn parse_hits(text: &str) -> Vec<SearchHit> {
    text.lines()
        .filter_map(strip_bullet)
        .map(|item| item.replace("**", ""))
        .filter(|item| !item.trim().is_empty())
        .map(|item| match item.split_once(": ") {
            Some((title, snippet)) => SearchHit::new(title.trim(), snippet.trim()),
            None => SearchHit::new(item.trim(), ""),
        })
        .collect()
}

#[async_trait]
impl Tool for GoogleSearchTool {
    fn name(&self) -> &str {
        GOOGLE_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Performs a Google search to retrieve information from the web."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        }))
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| TripwiseError::Tool("google_search requires a `query` string".into()))?
            .to_string();

        let request = LlmRequest::new(self.model.name(), vec![Content::user(query.clone())])
            .with_system_instruction(SEARCH_INSTRUCTION)
            .with_google_search();

        let span = tripwise_telemetry::tool_execute_span(GOOGLE_SEARCH_TOOL);
        let response = self.model.generate_content(request).instrument(span).await?;
        let parsed = Self::parse_response(&query, &response);

        tracing::debug!(
            call.id = ctx.function_call_id(),
            query = %query,
            results = parsed.results.len(),
            sources = parsed.sources.len(),
            tool_error = parsed.tool_error.as_deref(),
            "google_search completed"
        );

        Ok(parsed.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripwise_core::{GroundingChunk, GroundingMetadata};

    #[test]
    fn parses_bullets_and_numbered_lines() {
        let hits = parse_hits(
            "Here you go:\n- **Louvre**: World's largest art museum.\n2. Musée d'Orsay: Impressionists\n* Sainte-Chapelle\n",
        );
        assert_eq!(hits, vec![
            SearchHit::new("Louvre", "World's largest art museum."),
            SearchHit::new("Musée d'Orsay", "Impressionists"),
            SearchHit::new("Sainte-Chapelle", ""),
        ]);
    }

    #[test]
    fn no_results_marker_yields_empty_results() {
        let resp = LlmResponse::new(Content::model("NO_RESULTS"));
        let parsed = GoogleSearchTool::parse_response("q", &resp);
        assert!(parsed.results.is_empty());
        assert!(parsed.tool_error.is_none());
    }

    #[test]
    fn blocked_answer_sets_tool_error() {
        let mut resp = LlmResponse::new(Content::model("- a: b"));
        resp.finish_reason = Some(FinishReason::Safety);
        let parsed = GoogleSearchTool::parse_response("q", &resp);
        assert!(parsed.tool_error.unwrap().contains("Safety"));
    }

    #[test]
    fn grounding_chunks_become_sources() {
        let resp = LlmResponse::new(Content::model("- Louvre: museum")).with_grounding(
            GroundingMetadata {
                web_search_queries: vec!["paris museums".into()],
                grounding_chunks: vec![GroundingChunk {
                    uri: Some("https://louvre.fr".into()),
                    title: Some("louvre.fr".into()),
                }],
            },
        );
        let parsed = GoogleSearchTool::parse_response("q", &resp);
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.sources[0].url.as_deref(), Some("https://louvre.fr"));
    }
}
