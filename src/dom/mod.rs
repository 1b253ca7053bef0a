//! Rendering adapter between the form state and a page
//!
//! - ElementNode: one rendered element with attributes and children
//! - DomTree: the rendered form with an index of interactive elements
//! - SelectorMap: index -> selector plus the handler binding read from
//!   `data-handler` / `data-args` / `data-value-key`
//! - render: draws a FormState into a DomTree
//! - DomEvent: a change or click on an indexed element

pub mod element;
pub mod render;
pub mod selector_map;
pub mod tree;

pub use element::ElementNode;
pub use render::render_form;
pub use selector_map::{ElementSelector, SelectorMap};
pub use tree::DomTree;

use crate::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user event on an indexed element of the rendered form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum DomEvent {
    /// Input or select value changed
    Change { index: usize, value: String },
    /// Button or radio clicked
    Click { index: usize },
}

impl DomEvent {
    pub fn index(&self) -> usize {
        match self {
            DomEvent::Change { index, .. } | DomEvent::Click { index } => *index,
        }
    }
}

/// A handler call derived from an event
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub handler: String,
    pub params: Value,
}

/// Translate an event into the handler call bound on its element
pub fn translate(tree: &DomTree, event: &DomEvent) -> Result<Dispatch> {
    let index = event.index();
    let selector = tree
        .get_selector(index)
        .ok_or_else(|| QuoteError::ElementNotFound(format!("index {}", index)))?;
    let handler = selector
        .handler
        .clone()
        .ok_or_else(|| QuoteError::ElementNotFound(format!("no handler bound to index {}", index)))?;

    let value = match event {
        DomEvent::Change { value, .. } => Some(value.as_str()),
        DomEvent::Click { .. } => None,
    };

    Ok(Dispatch {
        handler,
        params: selector.params_with(value),
    })
}
