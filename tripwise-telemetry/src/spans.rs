//! Span helpers for pipeline operations

use tracing::Span;

/// Span covering one stage run inside an invocation.
pub fn agent_run_span(agent_name: &str, invocation_id: &str) -> Span {
    tracing::info_span!("agent.run", agent.name = agent_name, invocation.id = invocation_id)
}

/// Span covering one model API call, retries included.
pub fn model_call_span(model_name: &str) -> Span {
    tracing::info_span!("model.call", model.name = model_name)
}

pub fn tool_execute_span(tool_name: &str) -> Span {
    tracing::info_span!("tool.execute", tool.name = tool_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_without_subscriber() {
        let span = agent_run_span("research", "inv-1");
        let _enter = span.enter();
        let _model = model_call_span("gemini-2.5-flash-lite");
        let _tool = tool_execute_span("google_search");
    }
}
