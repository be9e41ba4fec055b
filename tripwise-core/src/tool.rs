use crate::{ReadonlyContext, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Option<Value> {
        None
    }
    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value>;
}

pub trait ToolContext: ReadonlyContext {
    fn function_call_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Content;

    struct TestTool;

    struct TestContext {
        content: Content,
    }

    impl ReadonlyContext for TestContext {
        fn invocation_id(&self) -> &str {
            "test"
        }
        fn agent_name(&self) -> &str {
            "test"
        }
        fn user_id(&self) -> &str {
            "user"
        }
        fn app_name(&self) -> &str {
            "app"
        }
        fn session_id(&self) -> &str {
            "session"
        }
        fn user_content(&self) -> &Content {
            &self.content
        }
    }

    impl ToolContext for TestContext {
        fn function_call_id(&self) -> &str {
            "call-123"
        }
    }

    #[async_trait]
    impl Tool for TestTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "echoes its arguments"
        }

        async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
            Ok(args)
        }
    }

    #[tokio::test]
    async fn test_tool_execute() {
        let tool = TestTool;
        assert!(tool.parameters_schema().is_none());
        let ctx = Arc::new(TestContext { content: Content::user("hi") }) as Arc<dyn ToolContext>;
        let result = tool.execute(ctx, serde_json::json!({"query": "q"})).await.unwrap();
        assert_eq!(result["query"], "q");
    }
}
