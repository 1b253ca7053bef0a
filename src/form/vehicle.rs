use crate::catalog::{Suggestion, VehicleTable};
use crate::error::{QuoteError, Result};

/// Make/model autocomplete state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehiclePicker {
    make_input: String,
    resolved_make: Option<String>,
    model_input: String,
    model_suggestions: Vec<Suggestion>,
}

impl VehiclePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make input changed: resolve it and rebuild the model list
    ///
    /// Returns the resolved make key. Any change resets the model input.
    pub fn set_make(&mut self, input: &str, vehicles: &VehicleTable) -> Option<&str> {
        self.make_input = input.to_string();
        self.model_input.clear();

        match vehicles.resolve_make(input) {
            Some(key) => {
                self.model_suggestions = vehicles.model_suggestions(key);
                self.resolved_make = Some(key.to_string());
            }
            None => {
                self.model_suggestions.clear();
                self.resolved_make = None;
            }
        }

        self.resolved_make.as_deref()
    }

    pub fn set_model(&mut self, input: &str) -> Result<()> {
        if !self.model_enabled() {
            return Err(QuoteError::ModelInputDisabled);
        }
        self.model_input = input.to_string();
        Ok(())
    }

    pub fn make_input(&self) -> &str {
        &self.make_input
    }

    pub fn resolved_make(&self) -> Option<&str> {
        self.resolved_make.as_deref()
    }

    pub fn model_input(&self) -> &str {
        &self.model_input
    }

    pub fn model_enabled(&self) -> bool {
        self.resolved_make.is_some()
    }

    pub fn model_suggestions(&self) -> &[Suggestion] {
        &self.model_suggestions
    }

    /// Make value for the payload: resolved key, else the typed text
    pub fn make_value(&self) -> Option<String> {
        self.resolved_make
            .clone()
            .or_else(|| non_empty(&self.make_input))
    }

    /// Model value for the payload: resolved key, else the typed text
    pub fn model_value(&self, vehicles: &VehicleTable) -> Option<String> {
        let make = self.resolved_make.as_deref()?;
        vehicles
            .resolve_model(make, &self.model_input)
            .map(str::to_string)
            .or_else(|| non_empty(&self.model_input))
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VehicleTable {
        let mut table = VehicleTable::new();
        table.insert_make("ford_motor", "Ford");
        table.insert_model("ford_motor", "f150", "F-150");
        table.insert_model("ford_motor", "ranger", "Ranger");
        table
    }

    #[test]
    fn test_make_resolves_through_label() {
        let vehicles = table();
        let mut picker = VehiclePicker::new();

        assert_eq!(picker.set_make("Ford", &vehicles), Some("ford_motor"));
        assert!(picker.model_enabled());
        assert_eq!(picker.model_suggestions().len(), 2);
        assert_eq!(picker.make_value(), Some("ford_motor".to_string()));
    }

    #[test]
    fn test_unknown_make_disables_model() {
        let vehicles = table();
        let mut picker = VehiclePicker::new();
        picker.set_make("Ford", &vehicles);
        picker.set_model("Ranger").unwrap();

        assert_eq!(picker.set_make("Lada", &vehicles), None);
        assert!(!picker.model_enabled());
        assert!(picker.model_suggestions().is_empty());
        assert_eq!(picker.model_input(), "");
        assert!(matches!(
            picker.set_model("Niva"),
            Err(QuoteError::ModelInputDisabled)
        ));
        assert_eq!(picker.make_value(), Some("Lada".to_string()));
        assert_eq!(picker.model_value(&vehicles), None);
    }

    #[test]
    fn test_empty_make_clears_everything() {
        let vehicles = table();
        let mut picker = VehiclePicker::new();
        picker.set_make("ford_motor", &vehicles);
        picker.set_make("  ", &vehicles);

        assert!(!picker.model_enabled());
        assert_eq!(picker.make_value(), None);
    }

    #[test]
    fn test_model_value_prefers_key() {
        let vehicles = table();
        let mut picker = VehiclePicker::new();
        picker.set_make("Ford", &vehicles);

        picker.set_model("F-150").unwrap();
        assert_eq!(picker.model_value(&vehicles), Some("f150".to_string()));

        picker.set_model("Bronco").unwrap();
        assert_eq!(picker.model_value(&vehicles), Some("Bronco".to_string()));
    }
}
