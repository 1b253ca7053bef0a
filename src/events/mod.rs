//! Named state-transition handlers
//!
//! Every user interaction on the quote form maps to one handler here. A
//! handler decodes its typed parameters from JSON, applies the transition to
//! [`FormState`] and reports a [`HandlerResult`]. The rendering layer only
//! ever dispatches by name, so the state machine stays testable on its own.

pub mod fields;
pub mod location;
pub mod services;
pub mod tow_type;
pub mod vehicle;

pub use fields::{SetFieldHandler, SetFieldParams, SetNeedTowHandler, SetNeedTowParams};
pub use location::{LaneParams, SelectLaneHandler, SetUnsafeLocationHandler, SetUnsafeLocationParams};
pub use services::{
    AddServiceHandler, AddServiceParams, RemoveServiceHandler, RemoveServiceParams, SelectServiceHandler,
    SelectServiceParams, SetExtraFieldHandler, SetExtraFieldParams,
};
pub use tow_type::{SelectTowTypeHandler, SelectTowTypeParams};
pub use vehicle::{SetMakeHandler, SetMakeParams, SetModelHandler, SetModelParams};

use crate::catalog::Catalog;
use crate::controller::ControllerOptions;
use crate::error::{QuoteError, Result};
use crate::form::FormState;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a handler sees while it runs
pub struct HandlerContext<'a> {
    pub catalog: &'a Catalog,
    pub options: &'a ControllerOptions,
    pub state: &'a mut FormState,
}

impl<'a> HandlerContext<'a> {
    pub fn new(catalog: &'a Catalog, options: &'a ControllerOptions, state: &'a mut FormState) -> Self {
        Self {
            catalog,
            options,
            state,
        }
    }
}

/// Outcome of a handler run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandlerResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HandlerResult {
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn success_with(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Transition refused without an error (e.g. the block limit)
    pub fn rejected(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message.into()),
        }
    }
}

/// A typed state-transition handler
pub trait Handler: Send + Sync {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    /// JSON schema of the parameters
    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or_default()
    }

    fn handle_typed(&self, params: Self::Params, context: &mut HandlerContext<'_>) -> Result<HandlerResult>;

    /// Decode JSON parameters and run
    fn handle(&self, params: Value, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        let typed = serde_json::from_value(params).map_err(|e| QuoteError::InvalidParams {
            handler: self.name().to_string(),
            reason: e.to_string(),
        })?;
        self.handle_typed(typed, context)
    }
}

/// Object-safe view of [`Handler`] for the registry
pub trait DynHandler: Send + Sync {
    fn name(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    fn handle(&self, params: Value, context: &mut HandlerContext<'_>) -> Result<HandlerResult>;
}

impl<T: Handler> DynHandler for T {
    fn name(&self) -> &str {
        Handler::name(self)
    }

    fn parameters_schema(&self) -> Value {
        Handler::parameters_schema(self)
    }

    fn handle(&self, params: Value, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        Handler::handle(self, params, context)
    }
}

/// Handlers by name, in registration order
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: IndexMap<String, Box<dyn DynHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every form handler
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SelectTowTypeHandler);
        registry.register(AddServiceHandler);
        registry.register(RemoveServiceHandler);
        registry.register(SelectServiceHandler);
        registry.register(SetExtraFieldHandler);
        registry.register(SetMakeHandler);
        registry.register(SetModelHandler);
        registry.register(SetUnsafeLocationHandler);
        registry.register(SelectLaneHandler);
        registry.register(SetFieldHandler);
        registry.register(SetNeedTowHandler);
        registry
    }

    pub fn register<H: Handler + 'static>(&mut self, handler: H) {
        self.handlers
            .insert(Handler::name(&handler).to_string(), Box::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<&dyn DynHandler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn execute(&self, name: &str, params: Value, context: &mut HandlerContext<'_>) -> Result<HandlerResult> {
        let handler = self
            .get(name)
            .ok_or_else(|| QuoteError::UnknownHandler(name.to_string()))?;
        handler.handle(params, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PricingTable, ServiceEntry};
    use crate::form::MAX_SERVICE_BLOCKS;
    use serde_json::json;

    pub(crate) fn fixture() -> (Catalog, ControllerOptions, FormState) {
        let mut catalog = Catalog::default();
        catalog.pricing = PricingTable::new();
        catalog
            .pricing
            .insert("light", "tow", ServiceEntry::new("Tow").with_rank(1.0));
        catalog.pricing.insert("light", "winch", ServiceEntry::new("Winch"));
        catalog
            .pricing
            .insert("light", "window_film", ServiceEntry::new("Window Film"));
        catalog
            .pricing
            .insert("heavy", "recovery", ServiceEntry::new("Recovery"));
        catalog.vehicles.insert_make("ford", "Ford");
        catalog.vehicles.insert_model("ford", "f150", "F-150");
        catalog
            .modifiers
            .insert_lane("Highway", "Highway", "Shoulder", "Shoulder");

        let options = ControllerOptions::default();
        let state = FormState::new(&catalog.pricing, MAX_SERVICE_BLOCKS, "tow");
        (catalog, options, state)
    }

    #[test]
    fn test_registry_defaults() {
        let registry = HandlerRegistry::with_defaults();
        assert_eq!(registry.len(), 11);
        assert!(registry.get("select_tow_type").is_some());
        assert!(registry.get("submit").is_none());
    }

    #[test]
    fn test_every_handler_publishes_a_schema() {
        let registry = HandlerRegistry::with_defaults();
        for name in registry.names() {
            let schema = registry.get(name).unwrap().parameters_schema();
            assert!(schema.is_object(), "schema for {} is not an object", name);
        }
    }

    #[test]
    fn test_unknown_handler() {
        let (catalog, options, mut state) = fixture();
        let registry = HandlerRegistry::with_defaults();
        let mut context = HandlerContext::new(&catalog, &options, &mut state);

        let err = registry
            .execute("launch_rocket", json!({}), &mut context)
            .unwrap_err();
        assert!(matches!(err, QuoteError::UnknownHandler(_)));
    }

    #[test]
    fn test_invalid_params_name_the_handler() {
        let (catalog, options, mut state) = fixture();
        let registry = HandlerRegistry::with_defaults();
        let mut context = HandlerContext::new(&catalog, &options, &mut state);

        let err = registry
            .execute("select_tow_type", json!({"tow": 1}), &mut context)
            .unwrap_err();
        match err {
            QuoteError::InvalidParams { handler, .. } => assert_eq!(handler, "select_tow_type"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
