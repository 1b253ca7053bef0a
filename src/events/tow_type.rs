use crate::error::Result;
use crate::events::{Handler, HandlerContext, HandlerResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectTowTypeParams {
    /// Tow type key from the pricing table
    pub tow_type: String,
}

/// Tow type dropdown changed
#[derive(Default)]
pub struct SelectTowTypeHandler;

impl Handler for SelectTowTypeHandler {
    type Params = SelectTowTypeParams;

    fn name(&self) -> &str {
        "select_tow_type"
    }

    fn handle_typed(&self, params: SelectTowTypeParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        context
            .state
            .select_tow_type(&context.catalog.pricing, &params.tow_type)?;

        let selections: Vec<_> = context
            .state
            .blocks()
            .iter()
            .map(|b| b.selected().map(str::to_string))
            .collect();

        Ok(HandlerResult::success_with(serde_json::json!({
            "tow_type": params.tow_type,
            "selections": selections,
        })))
    }
}
