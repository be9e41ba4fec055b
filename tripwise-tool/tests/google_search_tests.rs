use std::sync::Arc;
use tripwise_core::{Content, ReadonlyContext, Tool, ToolContext, TripwiseError};
use tripwise_model::MockLlm;
use tripwise_tool::{FunctionTool, GoogleSearchTool, SearchResponse, SearchValidation};

struct TestToolContext {
    content: Content,
}

impl ReadonlyContext for TestToolContext {
    fn invocation_id(&self) -> &str {
        "inv-1"
    }
    fn agent_name(&self) -> &str {
        "research"
    }
    fn user_id(&self) -> &str {
        "user"
    }
    fn app_name(&self) -> &str {
        "travel_agent"
    }
    fn session_id(&self) -> &str {
        "1002"
    }
    fn user_content(&self) -> &Content {
        &self.content
    }
}

impl ToolContext for TestToolContext {
    fn function_call_id(&self) -> &str {
        "inv-1_google_search"
    }
}

fn ctx() -> Arc<dyn ToolContext> {
    Arc::new(TestToolContext { content: Content::user("Paris") })
}

#[tokio::test]
async fn grounded_search_returns_parsed_results() {
    let model = Arc::new(
        MockLlm::new("gemini-test").with_text("- Louvre: Largest art museum\n- Musée d'Orsay: Impressionism"),
    );
    let tool = GoogleSearchTool::new(model.clone());

    let value = tool
        .execute(ctx(), serde_json::json!({"query": "top museums in Paris"}))
        .await
        .unwrap();
    let resp = SearchResponse::from_value(value).unwrap();

    assert_eq!(resp.query, "top museums in Paris");
    assert!(matches!(resp.validate(), SearchValidation::Valid(hits) if hits.len() == 2));

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].uses_google_search());
    assert!(requests[0].system_instruction.is_some());
}

#[tokio::test]
async fn transport_failure_propagates() {
    let model = Arc::new(MockLlm::new("gemini-test").with_http_error(500, "boom"));
    let tool = GoogleSearchTool::new(model);

    let err = tool.execute(ctx(), serde_json::json!({"query": "paris"})).await.unwrap_err();
    assert!(matches!(err, TripwiseError::Http { status: 500, .. }));
}

#[tokio::test]
async fn missing_query_is_rejected() {
    let tool = GoogleSearchTool::new(Arc::new(MockLlm::new("gemini-test")));
    let err = tool.execute(ctx(), serde_json::json!({})).await.unwrap_err();
    assert!(matches!(err, TripwiseError::Tool(_)));
}

#[tokio::test]
async fn function_tool_runs_closure() {
    let tool = FunctionTool::new("google_search", "canned", |_ctx, args| async move {
        Ok(SearchResponse::error(args["query"].as_str().unwrap_or_default(), "quota").to_value())
    })
    .with_parameters_schema(serde_json::json!({"type": "object"}));

    assert_eq!(tool.name(), "google_search");
    assert!(tool.parameters_schema().is_some());

    let value = tool.execute(ctx(), serde_json::json!({"query": "paris food"})).await.unwrap();
    let resp = SearchResponse::from_value(value).unwrap();
    assert_eq!(resp.validate(), SearchValidation::ToolError("quota".into()));
}
