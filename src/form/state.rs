use crate::catalog::{Catalog, ModifierTable, PricingTable, ServiceOption, VehicleTable};
use crate::error::{QuoteError, Result};
use crate::form::blocks::{AddOutcome, BlockId, ServiceBlockList};
use crate::form::location::{LaneChoice, UnsafeLocation, YesNo};
use crate::form::snapshot::{QuotePayload, SubmitTime};
use crate::form::vehicle::VehiclePicker;
use log::debug;
use serde::{Deserialize, Serialize};

/// Plain form fields without dependent controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    Source,
    Destination,
    Weather,
    TruckUtilization,
    IsAccident,
}

impl ScalarField {
    pub fn name(self) -> &'static str {
        match self {
            ScalarField::Source => "source",
            ScalarField::Destination => "destination",
            ScalarField::Weather => "weather",
            ScalarField::TruckUtilization => "truck_utilization",
            ScalarField::IsAccident => "is_accident",
        }
    }
}

/// Complete state of the quote form
///
/// Every mutation goes through a method here; nothing in this type knows how
/// the form is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    tow_type: Option<String>,
    blocks: ServiceBlockList,
    vehicle: VehiclePicker,
    location: UnsafeLocation,
    need_tow: Option<YesNo>,
    is_accident: YesNo,
    source: String,
    destination: String,
    weather: Option<String>,
    truck_utilization: Option<String>,
    tow_service_key: String,
}

impl FormState {
    /// Initial state: first tow type of the table selected, one service block
    pub fn new(pricing: &PricingTable, max_blocks: usize, tow_service_key: impl Into<String>) -> Self {
        let tow_type = pricing.tow_types().next().map(str::to_string);
        let options = tow_type
            .as_deref()
            .and_then(|t| pricing.options_for(t))
            .unwrap_or_default();

        Self {
            tow_type,
            blocks: ServiceBlockList::new(options, max_blocks),
            vehicle: VehiclePicker::new(),
            location: UnsafeLocation::new(),
            need_tow: None,
            is_accident: YesNo::No,
            source: String::new(),
            destination: String::new(),
            weather: None,
            truck_utilization: None,
            tow_service_key: tow_service_key.into(),
        }
    }

    fn current_options(&self, pricing: &PricingTable) -> Vec<ServiceOption> {
        self.tow_type
            .as_deref()
            .and_then(|t| pricing.options_for(t))
            .unwrap_or_default()
    }

    /// Switch tow type and repopulate every block
    pub fn select_tow_type(&mut self, pricing: &PricingTable, tow_type: &str) -> Result<()> {
        let options = pricing
            .options_for(tow_type)
            .ok_or_else(|| QuoteError::UnknownTowType(tow_type.to_string()))?;

        let first_kept = self
            .blocks
            .first()
            .selected()
            .is_some_and(|key| options.iter().any(|o| o.key == key));

        self.tow_type = Some(tow_type.to_string());
        self.blocks.repopulate(&options);
        if !first_kept {
            self.apply_tow_preselection();
        }

        debug!(
            "Tow type {}: {} services loaded into {} blocks",
            tow_type,
            options.len(),
            self.blocks.len()
        );
        Ok(())
    }

    pub fn add_service(&mut self, pricing: &PricingTable) -> AddOutcome {
        let options = self.current_options(pricing);
        self.blocks.add(options)
    }

    pub fn remove_service(&mut self, id: BlockId) -> Result<()> {
        self.blocks.remove(id)
    }

    pub fn select_service(&mut self, id: BlockId, service_key: &str) -> Result<()> {
        let tow_type = self.tow_type.clone().unwrap_or_default();
        let block = self
            .blocks
            .get_mut(id)
            .ok_or(QuoteError::BlockNotFound(id.0))?;

        if block.select(service_key) {
            Ok(())
        } else {
            Err(QuoteError::UnknownService {
                tow_type,
                service: service_key.to_string(),
            })
        }
    }

    pub fn set_extra_field(&mut self, id: BlockId, field: &str, raw: &str) -> Result<()> {
        let block = self
            .blocks
            .get_mut(id)
            .ok_or(QuoteError::BlockNotFound(id.0))?;

        block
            .extras_mut()
            .set(field, raw)
            .map_err(|rejection| rejection.into_error(id.0, field))
    }

    pub fn set_make(&mut self, input: &str, vehicles: &VehicleTable) -> Option<&str> {
        self.vehicle.set_make(input, vehicles)
    }

    pub fn set_model(&mut self, input: &str) -> Result<()> {
        self.vehicle.set_model(input)
    }

    pub fn set_unsafe_location(&mut self, answer: YesNo) {
        self.location.set_answer(answer);
    }

    pub fn select_lane(&mut self, choice: LaneChoice, modifiers: &ModifierTable) -> Result<()> {
        self.location.select_lane(choice, modifiers)
    }

    pub fn clear_lane(&mut self) {
        self.location.clear_lane();
    }

    /// Need-tow answered; "yes" preselects the tow service in the first block
    pub fn set_need_tow(&mut self, answer: YesNo) {
        self.need_tow = Some(answer);
        self.apply_tow_preselection();
    }

    fn apply_tow_preselection(&mut self) {
        if self.need_tow.is_some_and(YesNo::is_yes) {
            let key = self.tow_service_key.clone();
            if self.blocks.first_mut().select(&key) {
                debug!("Preselected '{}' in the first service block", key);
            }
        }
    }

    /// Set a plain field; an empty value clears optional fields
    pub fn set_field(&mut self, field: ScalarField, value: &str, modifiers: &ModifierTable) -> Result<()> {
        let trimmed = value.trim();
        match field {
            ScalarField::Source => self.source = trimmed.to_string(),
            ScalarField::Destination => self.destination = trimmed.to_string(),
            ScalarField::TruckUtilization => self.truck_utilization = non_empty(trimmed),
            ScalarField::Weather => {
                if !trimmed.is_empty()
                    && !modifiers.weather.is_empty()
                    && !modifiers.has_weather(trimmed)
                {
                    return Err(QuoteError::InvalidFieldValue {
                        field: field.name().to_string(),
                        value: trimmed.to_string(),
                        reason: "not a known weather condition".to_string(),
                    });
                }
                self.weather = non_empty(trimmed);
            }
            ScalarField::IsAccident => {
                self.is_accident = match trimmed {
                    "yes" => YesNo::Yes,
                    "no" | "" => YesNo::No,
                    other => {
                        return Err(QuoteError::InvalidFieldValue {
                            field: field.name().to_string(),
                            value: other.to_string(),
                            reason: "expected 'yes' or 'no'".to_string(),
                        });
                    }
                };
            }
        }
        Ok(())
    }

    pub fn tow_type(&self) -> Option<&str> {
        self.tow_type.as_deref()
    }

    pub fn blocks(&self) -> &ServiceBlockList {
        &self.blocks
    }

    pub fn vehicle(&self) -> &VehiclePicker {
        &self.vehicle
    }

    pub fn location(&self) -> &UnsafeLocation {
        &self.location
    }

    pub fn need_tow(&self) -> Option<YesNo> {
        self.need_tow
    }

    pub fn is_accident(&self) -> YesNo {
        self.is_accident
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn weather(&self) -> Option<&str> {
        self.weather.as_deref()
    }

    pub fn truck_utilization(&self) -> Option<&str> {
        self.truck_utilization.as_deref()
    }

    /// Validate required controls and assemble the request body
    pub fn snapshot(&self, catalog: &Catalog, at: SubmitTime) -> Result<QuotePayload> {
        let tow_type = self
            .tow_type
            .clone()
            .ok_or_else(|| QuoteError::MissingRequiredField("tow_type".to_string()))?;

        let services = self.blocks.selected_services();
        if services.is_empty() {
            return Err(QuoteError::MissingRequiredField("service_type".to_string()));
        }
        if self.source.is_empty() {
            return Err(QuoteError::MissingRequiredField("source".to_string()));
        }
        if self.destination.is_empty() {
            return Err(QuoteError::MissingRequiredField("destination".to_string()));
        }

        let unsafe_location = if self.location.lane_required() {
            let lane = self
                .location
                .lane()
                .cloned()
                .ok_or_else(|| QuoteError::MissingRequiredField("lane".to_string()))?;
            Some(lane)
        } else {
            None
        };

        Ok(QuotePayload {
            tow_type,
            services,
            source: self.source.clone(),
            destination: self.destination.clone(),
            need_tow: self.need_tow,
            is_accident: self.is_accident,
            make: self.vehicle.make_value(),
            model: self.vehicle.model_value(&catalog.vehicles),
            weather: self.weather.clone(),
            truck_utilization: self.truck_utilization.clone(),
            unsafe_location,
            extras: self.blocks.totals(),
            local_time: at.iso_utc(),
            timezone_offset: at.timezone_offset,
        })
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
