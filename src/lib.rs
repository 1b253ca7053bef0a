//! # tow-quote
//!
//! Controller for a towing-service price quote form.
//!
//! ## Features
//!
//! - **Page data**: pricing, vehicle and modifier tables parsed from the
//!   `<script id="...">` blocks of the quote page
//! - **Form state machine**: tow type, 1-3 service blocks with conditional
//!   inputs, make/model autocomplete, unsafe-location lane select
//! - **Handlers**: every interaction is a named handler with a typed,
//!   schema-published parameter struct
//! - **Rendering adapter**: the state drawn as an indexed element tree; events
//!   on indexed elements dispatch the bound handler
//! - **Submission**: one JSON POST to `/calculate`, the answer shown in the
//!   result box
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tow_quote::{ControllerOptions, HttpTransport, QuoteController};
//! use serde_json::json;
//!
//! # async fn run(html: &str) -> tow_quote::Result<()> {
//! let mut controller = QuoteController::from_page(html, ControllerOptions::default())?;
//!
//! controller.dispatch("select_tow_type", json!({"tow_type": "light"}))?;
//! controller.dispatch("set_field", json!({"field": "source", "value": "1 Main St"}))?;
//! controller.dispatch("set_field", json!({"field": "destination", "value": "Joe's Garage"}))?;
//!
//! let transport = HttpTransport::new("http://localhost:5000/calculate");
//! let result = controller.submit(&transport).await?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`catalog`]: read-only page tables
//! - [`form`]: the rendering-free form state
//! - [`events`]: named state-transition handlers
//! - [`dom`]: element tree rendering and event translation
//! - [`submit`]: transport seam, HTTP client and result box
//! - [`controller`]: the controller tying them together
//! - [`error`]: error types and result aliases

pub mod catalog;
pub mod controller;
pub mod dom;
pub mod error;
pub mod events;
pub mod form;
pub mod submit;

pub use catalog::{Catalog, ModifierTable, PricingTable, VehicleTable};
pub use controller::{ControllerOptions, QuoteController, ScriptStep};
pub use dom::{DomEvent, DomTree, ElementNode, ElementSelector, SelectorMap};
pub use error::{QuoteError, Result};
pub use events::{Handler, HandlerContext, HandlerRegistry, HandlerResult};
pub use form::{FormState, QuotePayload, SubmitTime};
pub use submit::{CannedTransport, QuoteTransport, ResultBox};

#[cfg(feature = "http")]
pub use submit::HttpTransport;
