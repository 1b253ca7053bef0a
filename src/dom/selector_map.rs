use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the adapter needs to turn an event on an element into a dispatch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementSelector {
    /// CSS selector for the element
    pub css_selector: String,

    pub tag_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Handler bound through `data-handler`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    /// Fixed parameters from `data-args`
    #[serde(default)]
    pub args: Value,

    /// Parameter name the element's value is sent under (`data-value-key`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_key: Option<String>,

    /// The element's own `value` attribute (radio buttons)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ElementSelector {
    pub fn new(css_selector: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            css_selector: css_selector.into(),
            tag_name: tag_name.into(),
            id: None,
            handler: None,
            args: Value::Object(Default::default()),
            value_key: None,
            value: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_handler(mut self, handler: impl Into<String>, args: Value) -> Self {
        self.handler = Some(handler.into());
        self.args = args;
        self
    }

    pub fn with_value_key(mut self, key: impl Into<String>) -> Self {
        self.value_key = Some(key.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Handler parameters for an event carrying `value`
    ///
    /// The value is merged into the fixed arguments under the value key. When
    /// no value is given, the element's own `value` attribute is used.
    pub fn params_with(&self, value: Option<&str>) -> Value {
        let mut params = match &self.args {
            Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };

        if let Some(key) = &self.value_key {
            if let Some(value) = value.or(self.value.as_deref()) {
                params.insert(key.clone(), Value::String(value.to_string()));
            }
        }

        Value::Object(params)
    }
}

/// Map of element indices to their selectors
/// Uses IndexMap to preserve insertion order
#[derive(Debug, Clone, Default)]
pub struct SelectorMap {
    map: IndexMap<usize, ElementSelector>,

    next_index: usize,
}

impl SelectorMap {
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
            next_index: 0,
        }
    }

    /// Register a new element and return its assigned index
    pub fn register(&mut self, selector: ElementSelector) -> usize {
        let index = self.next_index;
        self.map.insert(index, selector);
        self.next_index += 1;
        index
    }

    pub fn get(&self, index: usize) -> Option<&ElementSelector> {
        self.map.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.map.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.next_index = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &ElementSelector)> {
        self.map.iter()
    }

    pub fn indices(&self) -> impl Iterator<Item = &usize> {
        self.map.keys()
    }

    /// Find index by element ID
    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.map
            .iter()
            .find(|(_, sel)| sel.id.as_deref() == Some(id))
            .map(|(idx, _)| *idx)
    }

    /// Indices bound to a handler, in document order
    pub fn find_by_handler(&self, handler: &str) -> Vec<usize> {
        self.map
            .iter()
            .filter(|(_, sel)| sel.handler.as_deref() == Some(handler))
            .map(|(idx, _)| *idx)
            .collect()
    }

    /// Export to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.map)
    }
}
