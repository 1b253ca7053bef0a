use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaneEntry {
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadType {
    pub label: String,

    #[serde(default)]
    pub lanes: IndexMap<String, LaneEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherEntry {
    pub label: String,
}

/// The parts of the dynamic modifiers table the form renders
///
/// Mileage buckets, time-of-day slots and upcharge bands are priced by the
/// server and skipped here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModifierTable {
    /// Road type -> lanes; each road type becomes an option group
    #[serde(default)]
    pub vehicle_location: IndexMap<String, RoadType>,

    #[serde(default)]
    pub weather: IndexMap<String, WeatherEntry>,
}

impl ModifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn insert_lane(
        &mut self,
        road_type: impl Into<String>,
        road_label: impl Into<String>,
        lane: impl Into<String>,
        lane_label: impl Into<String>,
    ) {
        let road_label = road_label.into();
        self.vehicle_location
            .entry(road_type.into())
            .or_insert_with(|| RoadType {
                label: road_label,
                lanes: IndexMap::new(),
            })
            .lanes
            .insert(
                lane.into(),
                LaneEntry {
                    label: lane_label.into(),
                },
            );
    }

    pub fn insert_weather(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.weather.insert(
            key.into(),
            WeatherEntry {
                label: label.into(),
            },
        );
    }

    pub fn road_type(&self, key: &str) -> Option<&RoadType> {
        self.vehicle_location.get(key)
    }

    pub fn lane(&self, road_type: &str, lane: &str) -> Option<(&RoadType, &LaneEntry)> {
        let road = self.vehicle_location.get(road_type)?;
        road.lanes.get(lane).map(|entry| (road, entry))
    }

    pub fn has_weather(&self, key: &str) -> bool {
        self.weather.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_modifiers_document() {
        let json = r#"{
            "bucket_mileage_pricing": {"mode": "pattern"},
            "vehicle_location": {
                "Highway": {
                    "label": "Highway",
                    "lanes": {
                        "Left Lane": {"label": "Left Lane", "upcharge": 0.1},
                        "Shoulder": {"label": "Shoulder", "upcharge": 0.05}
                    }
                }
            },
            "weather": {"snow": {"label": "Snow", "upcharge": 0.15}},
            "time_of_day": {}
        }"#;
        let table = ModifierTable::from_json(json).unwrap();

        let (road, lane) = table.lane("Highway", "Shoulder").unwrap();
        assert_eq!(road.label, "Highway");
        assert_eq!(lane.label, "Shoulder");
        assert!(table.lane("Highway", "Median").is_none());
        assert!(table.has_weather("snow"));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let table = ModifierTable::from_json("{}").unwrap();
        assert!(table.vehicle_location.is_empty());
        assert!(table.weather.is_empty());
    }

    #[test]
    fn test_insert_lane_groups_by_road_type() {
        let mut table = ModifierTable::new();
        table.insert_lane("street", "City Street", "curb", "Curb");
        table.insert_lane("street", "ignored", "middle", "Middle Lane");

        let road = table.road_type("street").unwrap();
        assert_eq!(road.label, "City Street");
        assert_eq!(road.lanes.len(), 2);
    }
}
