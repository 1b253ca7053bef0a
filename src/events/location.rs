use crate::catalog::ModifierTable;
use crate::error::{QuoteError, Result};
use crate::events::{Handler, HandlerContext, HandlerResult};
use crate::form::{LaneChoice, YesNo};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetUnsafeLocationParams {
    pub answer: YesNo,
}

/// Unsafe-location radio toggled
#[derive(Default)]
pub struct SetUnsafeLocationHandler;

impl Handler for SetUnsafeLocationHandler {
    type Params = SetUnsafeLocationParams;

    fn name(&self) -> &str {
        "set_unsafe_location"
    }

    fn handle_typed(
        &self,
        params: SetUnsafeLocationParams,
        context: &mut HandlerContext<'_>,
    ) -> Result<HandlerResult> {
        context.state.set_unsafe_location(params.answer);
        let location = context.state.location();
        Ok(HandlerResult::success_with(json!({
            "lane_visible": location.lane_visible(),
            "lane_required": location.lane_required(),
        })))
    }
}

/// Lane to select, either by its parts or by the rendered option value
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LaneParams {
    Explicit {
        /// Road-type key (the option group)
        road_type: String,
        lane: String,
    },
    ByValue {
        /// Option value as rendered, `<road type>::<lane>`, or empty to clear
        option: String,
    },
}

impl LaneParams {
    /// The empty placeholder option
    fn is_placeholder(&self) -> bool {
        matches!(self, LaneParams::ByValue { option } if option.trim().is_empty())
    }

    fn into_choice(self, modifiers: &ModifierTable) -> Result<LaneChoice> {
        match self {
            LaneParams::Explicit { road_type, lane } => Ok(LaneChoice::new(road_type, lane)),
            LaneParams::ByValue { option } => {
                LaneChoice::from_option_value(&option, modifiers).ok_or_else(|| QuoteError::InvalidParams {
                    handler: "select_lane".to_string(),
                    reason: format!("no lane option has the value '{}'", option),
                })
            }
        }
    }
}

/// Lane select changed
///
/// The empty placeholder clears the lane.
#[derive(Default)]
pub struct SelectLaneHandler;

impl Handler for SelectLaneHandler {
    type Params = LaneParams;

    fn name(&self) -> &str {
        "select_lane"
    }

    fn handle_typed(&self, params: LaneParams, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        if params.is_placeholder() {
            context.state.clear_lane();
            return Ok(HandlerResult::success_with(json!({
                "value": "",
                "label": null,
            })));
        }

        let modifiers = &context.catalog.modifiers;
        let choice = params.into_choice(modifiers)?;
        context.state.select_lane(choice.clone(), modifiers)?;

        Ok(HandlerResult::success_with(json!({
            "value": choice.option_value(),
            "label": context.state.location().option_label(&choice, modifiers),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::tests::fixture;

    #[test]
    fn test_lane_requires_yes() {
        let (catalog, options, mut state) = fixture();
        let mut context = HandlerContext::new(&catalog, &options, &mut state);

        let err = SelectLaneHandler
            .handle(json!({"road_type": "Highway", "lane": "Shoulder"}), &mut context)
            .unwrap_err();
        assert!(matches!(err, QuoteError::LaneNotRequired));
    }

    #[test]
    fn test_select_lane_by_option_value() {
        let (catalog, options, mut state) = fixture();
        let mut context = HandlerContext::new(&catalog, &options, &mut state);

        let result = SetUnsafeLocationHandler
            .handle(json!({"answer": "yes"}), &mut context)
            .unwrap();
        assert_eq!(result.data.unwrap()["lane_required"], true);

        let result = SelectLaneHandler
            .handle(json!({"option": "Highway::Shoulder"}), &mut context)
            .unwrap();
        assert_eq!(result.data.unwrap()["label"], "Highway – Shoulder");
        assert_eq!(
            state.location().lane(),
            Some(&LaneChoice::new("Highway", "Shoulder"))
        );
    }

    #[test]
    fn test_malformed_option_value() {
        let (catalog, options, mut state) = fixture();
        let mut context = HandlerContext::new(&catalog, &options, &mut state);

        SetUnsafeLocationHandler
            .handle(json!({"answer": "yes"}), &mut context)
            .unwrap();
        let err = SelectLaneHandler
            .handle(json!({"option": "Shoulder"}), &mut context)
            .unwrap_err();
        assert!(matches!(err, QuoteError::InvalidParams { .. }));
    }

    #[test]
    fn test_placeholder_clears_lane() {
        let (catalog, options, mut state) = fixture();
        let mut context = HandlerContext::new(&catalog, &options, &mut state);

        SetUnsafeLocationHandler
            .handle(json!({"answer": "yes"}), &mut context)
            .unwrap();
        SelectLaneHandler
            .handle(json!({"option": "Highway::Shoulder"}), &mut context)
            .unwrap();
        let result = SelectLaneHandler
            .handle(json!({"option": ""}), &mut context)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.data.unwrap()["value"], "");
        assert!(state.location().lane().is_none());
        assert!(state.location().lane_required());
    }

    #[test]
    fn test_answer_no_clears_lane() {
        let (catalog, options, mut state) = fixture();
        let mut context = HandlerContext::new(&catalog, &options, &mut state);

        SetUnsafeLocationHandler
            .handle(json!({"answer": "yes"}), &mut context)
            .unwrap();
        SelectLaneHandler
            .handle(json!({"road_type": "Highway", "lane": "Shoulder"}), &mut context)
            .unwrap();
        let result = SetUnsafeLocationHandler
            .handle(json!({"answer": "no"}), &mut context)
            .unwrap();

        assert_eq!(result.data.unwrap()["lane_visible"], false);
        assert!(state.location().lane().is_none());
    }
}
