use crate::error::Result;
use crate::events::{Handler, HandlerContext, HandlerResult};
use crate::form::{ScalarField, YesNo};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetFieldParams {
    pub field: ScalarField,

    /// New value; empty clears optional fields
    #[serde(default)]
    pub value: String,
}

/// Plain input or select changed (addresses, weather, utilization, accident)
#[derive(Default)]
pub struct SetFieldHandler;

impl Handler for SetFieldHandler {
    type Params = SetFieldParams;

    fn name(&self) -> &str {
        "set_field"
    }

    fn handle_typed(&self, params: SetFieldParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        context
            .state
            .set_field(params.field, &params.value, &context.catalog.modifiers)?;
        Ok(HandlerResult::success())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetNeedTowParams {
    pub answer: YesNo,
}

/// "Do you need a tow?" answered
#[derive(Default)]
pub struct SetNeedTowHandler;

impl Handler for SetNeedTowHandler {
    type Params = SetNeedTowParams;

    fn name(&self) -> &str {
        "set_need_tow"
    }

    fn handle_typed(&self, params: SetNeedTowParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        context.state.set_need_tow(params.answer);
        Ok(HandlerResult::success_with(json!({
            "first_service": context.state.blocks().first().selected(),
        })))
    }
}
