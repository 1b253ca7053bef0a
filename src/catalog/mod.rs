//! Read-only tables supplied by the host page
//!
//! - PricingTable: services offered per tow type, with display ranks
//! - VehicleTable: makes and their models for the autocomplete inputs
//! - ModifierTable: road types/lanes and weather options
//!
//! All three keep the page's insertion order.

pub mod embedded;
pub mod modifiers;
pub mod pricing;
pub mod vehicles;

pub use modifiers::{LaneEntry, ModifierTable, RoadType, WeatherEntry};
pub use pricing::{PricingTable, ServiceEntry, ServiceOption};
pub use vehicles::{MakeEntry, ModelEntry, Suggestion, VehicleTable};

use crate::error::{QuoteError, Result};

/// Everything the controller reads from the page, parsed once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub pricing: PricingTable,
    pub vehicles: VehicleTable,
    pub modifiers: ModifierTable,
}

impl Catalog {
    pub fn new(pricing: PricingTable, vehicles: VehicleTable, modifiers: ModifierTable) -> Self {
        Self {
            pricing,
            vehicles,
            modifiers,
        }
    }

    /// Parse the three JSON payloads; the modifiers document is optional
    pub fn from_json(pricing: &str, vehicles: &str, modifiers: Option<&str>) -> Result<Self> {
        let pricing = PricingTable::from_json(pricing)
            .map_err(|e| QuoteError::CatalogParse(format!("pricing table: {}", e)))?;
        let vehicles = VehicleTable::from_json(vehicles)
            .map_err(|e| QuoteError::CatalogParse(format!("vehicle table: {}", e)))?;
        let modifiers = match modifiers {
            Some(json) => ModifierTable::from_json(json)
                .map_err(|e| QuoteError::CatalogParse(format!("modifiers table: {}", e)))?,
            None => ModifierTable::default(),
        };

        Ok(Self::new(pricing, vehicles, modifiers))
    }

    /// Extract and parse the payloads embedded in a rendered quote page
    pub fn from_page(html: &str) -> Result<Self> {
        let pricing = embedded::require_script_text(html, embedded::PRICING_SCRIPT_ID)?;
        let vehicles = embedded::require_script_text(html, embedded::CARS_SCRIPT_ID)?;
        let modifiers = embedded::script_text(html, embedded::MODIFIERS_SCRIPT_ID);

        Self::from_json(pricing, vehicles, modifiers)
    }
}
