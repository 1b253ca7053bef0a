use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelEntry {
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MakeEntry {
    pub label: String,

    #[serde(default)]
    pub models: IndexMap<String, ModelEntry>,
}

/// Suggestion list entry (datalist option)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub value: String,
    pub label: String,
}

/// Make key -> make entry, in page order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct VehicleTable {
    makes: IndexMap<String, MakeEntry>,
}

impl VehicleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn insert_make(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.makes.insert(
            key.into(),
            MakeEntry {
                label: label.into(),
                models: IndexMap::new(),
            },
        );
    }

    /// Add a model under an existing make
    ///
    /// Returns `false` and leaves the table unchanged when the make is unknown.
    pub fn insert_model(
        &mut self,
        make_key: &str,
        model_key: impl Into<String>,
        label: impl Into<String>,
    ) -> bool {
        let Some(make) = self.makes.get_mut(make_key) else {
            return false;
        };
        make.models.insert(
            model_key.into(),
            ModelEntry {
                label: label.into(),
            },
        );
        true
    }

    pub fn make(&self, key: &str) -> Option<&MakeEntry> {
        self.makes.get(key)
    }

    /// Resolve typed text to a make key: exact key first, then label
    pub fn resolve_make(&self, input: &str) -> Option<&str> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        resolve_key(&self.makes, input, |entry| &entry.label)
    }

    /// Resolve typed text to a model key of the given make
    pub fn resolve_model(&self, make_key: &str, input: &str) -> Option<&str> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let make = self.makes.get(make_key)?;
        resolve_key(&make.models, input, |entry| &entry.label)
    }

    /// Suggestions for the make input
    pub fn make_suggestions(&self) -> Vec<Suggestion> {
        self.makes
            .iter()
            .map(|(key, entry)| Suggestion {
                value: key.clone(),
                label: entry.label.clone(),
            })
            .collect()
    }

    /// Suggestions for the model input of a resolved make
    pub fn model_suggestions(&self, make_key: &str) -> Vec<Suggestion> {
        self.makes
            .get(make_key)
            .map(|make| {
                make.models
                    .iter()
                    .map(|(key, entry)| Suggestion {
                        value: key.clone(),
                        label: entry.label.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.makes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.makes.is_empty()
    }
}

fn resolve_key<'a, T>(
    map: &'a IndexMap<String, T>,
    input: &str,
    label: impl Fn(&T) -> &String,
) -> Option<&'a str> {
    if let Some((key, _)) = map.get_key_value(input) {
        return Some(key.as_str());
    }

    map.iter()
        .find(|(_, entry)| label(entry) == input)
        .or_else(|| {
            map.iter()
                .find(|(_, entry)| label(entry).eq_ignore_ascii_case(input))
        })
        .map(|(key, _)| key.as_str())
}
