use std::sync::Arc;
use tripwise_core::{Content, InvocationContext, ReadonlyContext, ToolContext};

/// Tool context that delegates to the invocation a stage runs in.
pub(crate) struct StageToolContext {
    parent_ctx: Arc<dyn InvocationContext>,
    function_call_id: String,
}

impl StageToolContext {
    pub(crate) fn new(parent_ctx: Arc<dyn InvocationContext>, function_call_id: String) -> Self {
        Self { parent_ctx, function_call_id }
    }
}

impl ReadonlyContext for StageToolContext {
    fn invocation_id(&self) -> &str {
        self.parent_ctx.invocation_id()
    }

    fn agent_name(&self) -> &str {
        self.parent_ctx.agent_name()
    }

    fn user_id(&self) -> &str {
        self.parent_ctx.user_id()
    }

    fn app_name(&self) -> &str {
        self.parent_ctx.app_name()
    }

    fn session_id(&self) -> &str {
        self.parent_ctx.session_id()
    }

    fn user_content(&self) -> &Content {
        self.parent_ctx.user_content()
    }
}

impl ToolContext for StageToolContext {
    fn function_call_id(&self) -> &str {
        &self.function_call_id
    }
}
