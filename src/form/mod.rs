//! Rendering-free state machine of the quote form
//!
//! - FormState: the whole form, mutated only through its methods
//! - ServiceBlockList: 1..=3 service dropdowns bound to the current tow type
//! - ExtraFields: per-service conditional inputs (window film, equipment hours)
//! - VehiclePicker: make/model autocomplete
//! - UnsafeLocation: yes/no radio gating the required lane select
//! - QuotePayload: the flat request body assembled at submit time

pub mod blocks;
pub mod extras;
pub mod location;
pub mod snapshot;
pub mod state;
pub mod vehicle;

pub use blocks::{AddOutcome, BlockId, MAX_SERVICE_BLOCKS, ServiceBlock, ServiceBlockList};
pub use extras::{ExtraFields, ExtraTotals, FieldSpec, NumberStep};
pub use location::{LaneChoice, UnsafeLocation, YesNo};
pub use snapshot::{QuotePayload, SubmitTime};
pub use state::{FormState, ScalarField};
pub use vehicle::VehiclePicker;
