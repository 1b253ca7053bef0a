use crate::catalog::Catalog;
use crate::controller::config::ControllerOptions;
use crate::dom::{self, DomEvent, DomTree};
use crate::error::Result;
use crate::events::{HandlerContext, HandlerRegistry, HandlerResult};
use crate::form::{FormState, QuotePayload, SubmitTime};
use crate::submit::{QuoteTransport, ResultBox};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of a scripted interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// Call a handler by name
    Dispatch {
        handler: String,
        #[serde(default)]
        params: Value,
    },
    /// Act on an element of the current rendering
    Dom(DomEvent),
}

/// Owns the form state for one quote page and applies events to it
pub struct QuoteController {
    catalog: Catalog,

    options: ControllerOptions,

    state: FormState,

    /// Handler registry for state transitions
    registry: HandlerRegistry,

    result: ResultBox,
}

impl QuoteController {
    pub fn new(catalog: Catalog, options: ControllerOptions) -> Self {
        let state = FormState::new(
            &catalog.pricing,
            options.max_services,
            options.tow_service_key.clone(),
        );
        info!(
            "Quote form ready: {} tow type(s), {} make(s)",
            catalog.pricing.len(),
            catalog.vehicles.len()
        );

        Self {
            catalog,
            options,
            state,
            registry: HandlerRegistry::with_defaults(),
            result: ResultBox::hidden(),
        }
    }

    /// Controller over the data embedded in a quote page
    pub fn from_page(html: &str, options: ControllerOptions) -> Result<Self> {
        Ok(Self::new(Catalog::from_page(html)?, options))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn result(&self) -> &ResultBox {
        &self.result
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Run a named handler against the form state
    ///
    /// A failed handler leaves the controller usable.
    pub fn dispatch(&mut self, handler: &str, params: Value) -> Result<HandlerResult> {
        debug!("Dispatching {} with {}", handler, params);
        let mut context = HandlerContext::new(&self.catalog, &self.options, &mut self.state);
        let outcome = self.registry.execute(handler, params, &mut context);

        if let Err(e) = &outcome {
            warn!("Handler {} failed: {}", handler, e);
        }
        outcome
    }

    /// Render the current state
    pub fn render(&self) -> DomTree {
        dom::render_form(
            &self.state,
            &self.catalog,
            &self.result,
            &self.options.limit_message,
        )
    }

    /// Apply an event on an element of the current rendering
    pub fn handle_dom_event(&mut self, event: &DomEvent) -> Result<HandlerResult> {
        let dispatch = dom::translate(&self.render(), event)?;
        self.dispatch(&dispatch.handler, dispatch.params)
    }

    pub fn apply(&mut self, step: &ScriptStep) -> Result<HandlerResult> {
        match step {
            ScriptStep::Dispatch { handler, params } => {
                let params = if params.is_null() {
                    Value::Object(Default::default())
                } else {
                    params.clone()
                };
                self.dispatch(handler, params)
            }
            ScriptStep::Dom(event) => self.handle_dom_event(event),
        }
    }

    /// Validate and assemble the request body
    pub fn snapshot(&self, at: SubmitTime) -> Result<QuotePayload> {
        self.state.snapshot(&self.catalog, at)
    }

    /// Submit using the current clock
    pub async fn submit<T>(&mut self, transport: &T) -> Result<ResultBox>
    where
        T: QuoteTransport + ?Sized,
    {
        self.submit_at(transport, SubmitTime::now()).await
    }

    /// Validate, POST once and update the result box
    ///
    /// Validation failures return an error and leave the result box as it
    /// was. Once the request is sent, every outcome ends in a visible result
    /// box: the response text, or the apology when the request failed.
    pub async fn submit_at<T>(&mut self, transport: &T, at: SubmitTime) -> Result<ResultBox>
    where
        T: QuoteTransport + ?Sized,
    {
        let payload = self.snapshot(at)?;
        info!(
            "Submitting quote for {} with {} service(s)",
            payload.tow_type,
            payload.services.len()
        );

        self.result = match transport.calculate(&payload).await {
            Ok(body) => ResultBox::from_response(&body),
            Err(e) => {
                warn!("Quote submission failed: {}", e);
                ResultBox::apology(self.options.apology.as_str())
            }
        };

        Ok(self.result.clone())
    }
}
