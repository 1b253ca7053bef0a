use crate::error::Result;
use crate::events::{Handler, HandlerContext, HandlerResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetMakeParams {
    /// Text typed into the make input (key or label)
    #[serde(default)]
    pub make: String,
}

/// Make input changed
#[derive(Default)]
pub struct SetMakeHandler;

impl Handler for SetMakeHandler {
    type Params = SetMakeParams;

    fn name(&self) -> &str {
        "set_make"
    }

    fn handle_typed(&self, params: SetMakeParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        let resolved = context
            .state
            .set_make(&params.make, &context.catalog.vehicles)
            .map(str::to_string);

        Ok(HandlerResult::success_with(json!({
            "make": resolved,
            "model_enabled": context.state.vehicle().model_enabled(),
            "models": context.state.vehicle().model_suggestions(),
        })))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetModelParams {
    #[serde(default)]
    pub model: String,
}

#[derive(Default)]
pub struct SetModelHandler;

impl Handler for SetModelHandler {
    type Params = SetModelParams;

    fn name(&self) -> &str {
        "set_model"
    }

    fn handle_typed(&self, params: SetModelParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        context.state.set_model(&params.model)?;
        let model = context.state.vehicle().model_value(&context.catalog.vehicles);
        Ok(HandlerResult::success_with(json!({ "model": model })))
    }
}
