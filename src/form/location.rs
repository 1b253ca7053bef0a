use crate::catalog::ModifierTable;
use crate::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};

/// Answer of a yes/no radio pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }
}

/// A lane inside a road-type option group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneChoice {
    pub road_type: String,
    pub lane: String,
}

impl LaneChoice {
    pub fn new(road_type: impl Into<String>, lane: impl Into<String>) -> Self {
        Self {
            road_type: road_type.into(),
            lane: lane.into(),
        }
    }

    /// Option value used by the rendered lane select
    pub fn option_value(&self) -> String {
        format!("{}{}{}", self.road_type, LANE_VALUE_SEPARATOR, self.lane)
    }

    /// Find the lane whose rendered option value is `value`
    ///
    /// Road-type keys may contain the separator themselves, so the value is
    /// looked up in the table instead of being split.
    pub fn from_option_value(value: &str, modifiers: &ModifierTable) -> Option<Self> {
        modifiers.vehicle_location.iter().find_map(|(road_key, road)| {
            let lane = value
                .strip_prefix(road_key.as_str())?
                .strip_prefix(LANE_VALUE_SEPARATOR)?;
            road.lanes
                .contains_key(lane)
                .then(|| Self::new(road_key.as_str(), lane))
        })
    }
}

pub const LANE_VALUE_SEPARATOR: &str = "::";

/// "Is the vehicle in an unsafe location?" follow-up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnsafeLocation {
    answer: Option<YesNo>,
    lane: Option<LaneChoice>,
    /// Options whose label already carries the road-type prefix
    relabeled: Vec<LaneChoice>,
}

impl UnsafeLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Radio toggled; "no" hides and clears the lane select
    pub fn set_answer(&mut self, answer: YesNo) {
        self.answer = Some(answer);
        if !answer.is_yes() {
            self.lane = None;
        }
    }

    pub fn select_lane(&mut self, choice: LaneChoice, modifiers: &ModifierTable) -> Result<()> {
        if !self.lane_visible() {
            return Err(QuoteError::LaneNotRequired);
        }
        if modifiers.lane(&choice.road_type, &choice.lane).is_none() {
            return Err(QuoteError::UnknownLane {
                road_type: choice.road_type,
                lane: choice.lane,
            });
        }

        if !self.relabeled.contains(&choice) {
            self.relabeled.push(choice.clone());
        }
        self.lane = Some(choice);
        Ok(())
    }

    /// Placeholder chosen; the lane is required again if still visible
    pub fn clear_lane(&mut self) {
        self.lane = None;
    }

    pub fn answer(&self) -> Option<YesNo> {
        self.answer
    }

    pub fn lane(&self) -> Option<&LaneChoice> {
        self.lane.as_ref()
    }

    pub fn lane_visible(&self) -> bool {
        self.answer.is_some_and(YesNo::is_yes)
    }

    pub fn lane_required(&self) -> bool {
        self.lane_visible()
    }

    /// Visible text of a lane option
    ///
    /// Once selected, an option reads `"<road type> – <lane label>"` for the
    /// rest of the session.
    pub fn option_label(&self, choice: &LaneChoice, modifiers: &ModifierTable) -> Option<String> {
        let (road, lane) = modifiers.lane(&choice.road_type, &choice.lane)?;
        if self.relabeled.contains(choice) {
            Some(format!("{} – {}", road.label, lane.label))
        } else {
            Some(lane.label.clone())
        }
    }
}
