use crate::error::Result;
use crate::events::{Handler, HandlerContext, HandlerResult};
use crate::form::{AddOutcome, BlockId};
use log::info;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Parameters for the add button (none needed)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AddServiceParams {}

/// "+ Add More Service" clicked
#[derive(Default)]
pub struct AddServiceHandler;

impl Handler for AddServiceHandler {
    type Params = AddServiceParams;

    fn name(&self) -> &str {
        "add_service"
    }

    fn handle_typed(&self, _params: AddServiceParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        match context.state.add_service(&context.catalog.pricing) {
            AddOutcome::Added(id) => Ok(HandlerResult::success_with(json!({
                "block": id,
                "count": context.state.blocks().len(),
            }))),
            AddOutcome::LimitReached => {
                info!(
                    "Service limit of {} reached",
                    context.state.blocks().max()
                );
                Ok(HandlerResult::rejected(
                    context.options.limit_message.clone(),
                    json!({ "count": context.state.blocks().len() }),
                ))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveServiceParams {
    /// Id of the block to remove; the first block cannot be removed
    pub block: u32,
}

#[derive(Default)]
pub struct RemoveServiceHandler;

impl Handler for RemoveServiceHandler {
    type Params = RemoveServiceParams;

    fn name(&self) -> &str {
        "remove_service"
    }

    fn handle_typed(&self, params: RemoveServiceParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        context.state.remove_service(BlockId(params.block))?;
        Ok(HandlerResult::success_with(json!({
            "count": context.state.blocks().len(),
        })))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectServiceParams {
    pub block: u32,

    /// Service key offered under the current tow type
    pub service: String,
}

/// A block's service dropdown changed
#[derive(Default)]
pub struct SelectServiceHandler;

impl Handler for SelectServiceHandler {
    type Params = SelectServiceParams;

    fn name(&self) -> &str {
        "select_service"
    }

    fn handle_typed(&self, params: SelectServiceParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        let id = BlockId(params.block);
        context.state.select_service(id, &params.service)?;

        let fields: Vec<&str> = context
            .state
            .blocks()
            .get(id)
            .map(|b| b.extras().specs().iter().map(|spec| spec.name).collect())
            .unwrap_or_default();

        Ok(HandlerResult::success_with(json!({
            "block": id,
            "service": params.service,
            "extra_fields": fields,
        })))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetExtraFieldParams {
    pub block: u32,

    /// Extra input name, e.g. `side_window` or `equipment_hours`
    pub field: String,

    /// Raw input text; empty clears the field
    #[serde(default)]
    pub value: String,
}

/// One of a block's extra numeric inputs changed
#[derive(Default)]
pub struct SetExtraFieldHandler;

impl Handler for SetExtraFieldHandler {
    type Params = SetExtraFieldParams;

    fn name(&self) -> &str {
        "set_extra_field"
    }

    fn handle_typed(&self, params: SetExtraFieldParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        context
            .state
            .set_extra_field(BlockId(params.block), &params.field, &params.value)?;
        Ok(HandlerResult::success())
    }
}
