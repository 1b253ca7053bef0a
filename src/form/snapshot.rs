use crate::form::extras::ExtraTotals;
use crate::form::location::{LaneChoice, YesNo};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Flat JSON body posted to the quote endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotePayload {
    pub tow_type: String,

    /// Selected service keys, one per non-blank block
    pub services: Vec<String>,

    pub source: String,
    pub destination: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_tow: Option<YesNo>,

    pub is_accident: YesNo,

    pub make: Option<String>,
    pub model: Option<String>,
    pub weather: Option<String>,
    pub truck_utilization: Option<String>,

    /// Present only when the vehicle was reported unsafe and a lane chosen
    pub unsafe_location: Option<LaneChoice>,

    /// `side_window`, `front_or_back_window` and `duration_minutes` summed
    /// over every block
    #[serde(flatten)]
    pub extras: ExtraTotals,

    /// Client clock in UTC, ISO-8601 with milliseconds
    pub local_time: String,

    /// Minutes behind UTC, browser sign convention (UTC-5 => 300)
    pub timezone_offset: i32,
}

/// Client clock reading taken at submit time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTime {
    pub utc: DateTime<Utc>,
    pub timezone_offset: i32,
}

impl SubmitTime {
    pub fn new(utc: DateTime<Utc>, timezone_offset: i32) -> Self {
        Self {
            utc,
            timezone_offset,
        }
    }

    /// Read the local clock
    pub fn now() -> Self {
        let local = Local::now();
        let offset = -local.offset().local_minus_utc() / 60;
        Self::new(local.with_timezone(&Utc), offset)
    }

    pub fn iso_utc(&self) -> String {
        self.utc.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
