use crate::error::QuoteError;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

pub const WINDOW_FILM: &str = "window_film";
pub const HEAVY_EQUIPMENT: &str = "heavy_equipment";

pub const SIDE_WINDOW: &str = "side_window";
pub const FRONT_OR_BACK_WINDOW: &str = "front_or_back_window";
pub const EQUIPMENT_HOURS: &str = "equipment_hours";

/// Granularity accepted by a numeric input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStep {
    /// 0, 1, 2, ...
    Whole,
    /// 0, 0.5, 1, 1.5, ...
    Half,
}

impl NumberStep {
    /// Value of the HTML `step` attribute
    pub fn as_attr(self) -> &'static str {
        match self {
            NumberStep::Whole => "1",
            NumberStep::Half => "0.5",
        }
    }
}

/// Static description of one extra input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub step: NumberStep,
}

const WINDOW_FILM_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: SIDE_WINDOW,
        label: "Side Windows",
        step: NumberStep::Whole,
    },
    FieldSpec {
        name: FRONT_OR_BACK_WINDOW,
        label: "Front/Back Windows",
        step: NumberStep::Whole,
    },
];

const EQUIPMENT_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: EQUIPMENT_HOURS,
    label: "Equipment Hours",
    step: NumberStep::Half,
}];

/// Extra inputs attached to a service block, one variant per special service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtraFields {
    #[default]
    None,
    WindowFilm {
        side_window: Option<u32>,
        front_or_back_window: Option<u32>,
    },
    EquipmentHours {
        half_hours: Option<u32>,
    },
}

impl ExtraFields {
    /// Fresh (empty) extra inputs for the selected service key
    pub fn for_service(service_key: Option<&str>) -> Self {
        match service_key {
            Some(WINDOW_FILM) => ExtraFields::WindowFilm {
                side_window: None,
                front_or_back_window: None,
            },
            Some(HEAVY_EQUIPMENT) => ExtraFields::EquipmentHours { half_hours: None },
            _ => ExtraFields::None,
        }
    }

    /// Inputs to render for this variant
    pub fn specs(&self) -> &'static [FieldSpec] {
        match self {
            ExtraFields::None => &[],
            ExtraFields::WindowFilm { .. } => WINDOW_FILM_FIELDS,
            ExtraFields::EquipmentHours { .. } => EQUIPMENT_FIELDS,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ExtraFields::None)
    }

    /// Store a raw input value; an empty string clears the field
    pub fn set(&mut self, field: &str, raw: &str) -> std::result::Result<(), FieldRejection> {
        match (self, field) {
            (ExtraFields::WindowFilm { side_window, .. }, SIDE_WINDOW) => {
                *side_window = parse_whole(raw)?;
            }
            (
                ExtraFields::WindowFilm {
                    front_or_back_window,
                    ..
                },
                FRONT_OR_BACK_WINDOW,
            ) => {
                *front_or_back_window = parse_whole(raw)?;
            }
            (ExtraFields::EquipmentHours { half_hours }, EQUIPMENT_HOURS) => {
                *half_hours = parse_half_steps(raw)?;
            }
            _ => return Err(FieldRejection::UnknownField),
        }
        Ok(())
    }

    /// Current display value of a field
    pub fn value(&self, field: &str) -> Option<String> {
        match (self, field) {
            (ExtraFields::WindowFilm { side_window, .. }, SIDE_WINDOW) => {
                side_window.map(|v| v.to_string())
            }
            (
                ExtraFields::WindowFilm {
                    front_or_back_window,
                    ..
                },
                FRONT_OR_BACK_WINDOW,
            ) => front_or_back_window.map(|v| v.to_string()),
            (ExtraFields::EquipmentHours { half_hours }, EQUIPMENT_HOURS) => {
                half_hours.map(format_half_steps)
            }
            _ => None,
        }
    }

    /// This block's contribution to the payload aggregates
    pub fn totals(&self) -> ExtraTotals {
        match *self {
            ExtraFields::None => ExtraTotals::default(),
            ExtraFields::WindowFilm {
                side_window,
                front_or_back_window,
            } => ExtraTotals {
                side_window: side_window.unwrap_or(0),
                front_or_back_window: front_or_back_window.unwrap_or(0),
                duration_minutes: 0,
            },
            ExtraFields::EquipmentHours { half_hours } => ExtraTotals {
                duration_minutes: half_hours.unwrap_or(0).saturating_mul(30),
                ..ExtraTotals::default()
            },
        }
    }
}

/// Why an extra field value was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRejection {
    UnknownField,
    Invalid { value: String, reason: &'static str },
}

impl FieldRejection {
    /// Attach the block context and turn into a crate error
    pub fn into_error(self, block: u32, field: &str) -> QuoteError {
        match self {
            FieldRejection::UnknownField => QuoteError::UnknownExtraField {
                block,
                field: field.to_string(),
            },
            FieldRejection::Invalid { value, reason } => QuoteError::InvalidFieldValue {
                field: field.to_string(),
                value,
                reason: reason.to_string(),
            },
        }
    }
}

/// Aggregated extra inputs across all blocks, named as the server reads them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraTotals {
    pub side_window: u32,
    pub front_or_back_window: u32,
    pub duration_minutes: u32,
}

impl AddAssign for ExtraTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.side_window = self.side_window.saturating_add(rhs.side_window);
        self.front_or_back_window = self
            .front_or_back_window
            .saturating_add(rhs.front_or_back_window);
        self.duration_minutes = self.duration_minutes.saturating_add(rhs.duration_minutes);
    }
}

fn parse_whole(raw: &str) -> std::result::Result<Option<u32>, FieldRejection> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| FieldRejection::Invalid {
            value: raw.to_string(),
            reason: "expected a non-negative whole number",
        })
}

/// Parse hours in half-hour steps, returning the number of half hours
fn parse_half_steps(raw: &str) -> std::result::Result<Option<u32>, FieldRejection> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let invalid = || FieldRejection::Invalid {
        value: raw.to_string(),
        reason: "expected a non-negative number in steps of 0.5",
    };

    let hours: f64 = raw.parse().map_err(|_| invalid())?;
    if !hours.is_finite() || hours < 0.0 {
        return Err(invalid());
    }

    let doubled = hours * 2.0;
    if doubled.fract() != 0.0 || doubled > u32::MAX as f64 / 30.0 {
        return Err(invalid());
    }

    Ok(Some(doubled as u32))
}

fn format_half_steps(half_hours: u32) -> String {
    if half_hours % 2 == 0 {
        (half_hours / 2).to_string()
    } else {
        format!("{}.5", half_hours / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_table() {
        assert_eq!(ExtraFields::for_service(Some(WINDOW_FILM)).specs().len(), 2);
        assert_eq!(ExtraFields::for_service(Some(HEAVY_EQUIPMENT)).specs().len(), 1);
        assert!(ExtraFields::for_service(Some("tow")).is_empty());
        assert!(ExtraFields::for_service(None).is_empty());
    }

    #[test]
    fn test_window_film_counts() {
        let mut extras = ExtraFields::for_service(Some(WINDOW_FILM));
        extras.set(SIDE_WINDOW, "2").unwrap();
        extras.set(FRONT_OR_BACK_WINDOW, " 1 ").unwrap();

        assert_eq!(extras.value(SIDE_WINDOW), Some("2".to_string()));
        assert_eq!(
            extras.totals(),
            ExtraTotals {
                side_window: 2,
                front_or_back_window: 1,
                duration_minutes: 0
            }
        );

        extras.set(SIDE_WINDOW, "").unwrap();
        assert_eq!(extras.value(SIDE_WINDOW), None);
        assert_eq!(extras.totals().side_window, 0);
    }

    #[test]
    fn test_window_film_rejects_negative_and_fractional() {
        let mut extras = ExtraFields::for_service(Some(WINDOW_FILM));
        assert!(matches!(
            extras.set(SIDE_WINDOW, "-1"),
            Err(FieldRejection::Invalid { .. })
        ));
        assert!(matches!(
            extras.set(SIDE_WINDOW, "1.5"),
            Err(FieldRejection::Invalid { .. })
        ));
    }

    #[test]
    fn test_equipment_hours_half_steps() {
        let mut extras = ExtraFields::for_service(Some(HEAVY_EQUIPMENT));
        extras.set(EQUIPMENT_HOURS, "1.5").unwrap();
        assert_eq!(extras.value(EQUIPMENT_HOURS), Some("1.5".to_string()));
        assert_eq!(extras.totals().duration_minutes, 90);

        extras.set(EQUIPMENT_HOURS, "2").unwrap();
        assert_eq!(extras.value(EQUIPMENT_HOURS), Some("2".to_string()));
        assert_eq!(extras.totals().duration_minutes, 120);

        assert!(extras.set(EQUIPMENT_HOURS, "1.25").is_err());
        assert!(extras.set(EQUIPMENT_HOURS, "-0.5").is_err());
        assert!(extras.set(EQUIPMENT_HOURS, "NaN").is_err());
    }

    #[test]
    fn test_field_not_on_variant() {
        let mut extras = ExtraFields::for_service(Some("tow"));
        assert_eq!(
            extras.set(SIDE_WINDOW, "1"),
            Err(FieldRejection::UnknownField)
        );

        let err = FieldRejection::UnknownField.into_error(3, SIDE_WINDOW);
        assert!(matches!(err, QuoteError::UnknownExtraField { block: 3, .. }));
    }

    #[test]
    fn test_totals_accumulate() {
        let mut totals = ExtraTotals::default();
        totals += ExtraTotals {
            side_window: 2,
            front_or_back_window: 0,
            duration_minutes: 30,
        };
        totals += ExtraTotals {
            side_window: 1,
            front_or_back_window: 1,
            duration_minutes: 0,
        };
        assert_eq!(totals.side_window, 3);
        assert_eq!(totals.front_or_back_window, 1);
        assert_eq!(totals.duration_minutes, 30);
    }
}
