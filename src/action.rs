//! Actions - every state transition the widget understands

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::WeatherResult;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Country category =====
    /// Select a country by name (resets state, city and weather)
    CountrySelect(String),

    /// Move the country dropdown highlight
    CountryHighlight(usize),

    /// Commit the highlighted country
    CountryConfirm,

    // ===== Region category =====
    /// Select a state by name within the current country
    RegionSelect(String),

    RegionHighlight(usize),

    RegionConfirm,

    // ===== City category =====
    /// Select a city by name (weather is kept)
    CitySelect(String),

    CityHighlight(usize),

    CityConfirm,

    // ===== Weather category =====
    /// Intent: fetch weather for the selected city
    WeatherFetch,

    /// Result: request `request_id` succeeded
    WeatherDidLoad {
        request_id: u64,
        data: WeatherResult,
    },

    /// Result: request `request_id` failed
    WeatherDidError { request_id: u64, error: String },

    // ===== Focus category =====
    FocusNext,

    FocusPrev,

    // ===== Uncategorized (global) =====
    /// Spinner frame while loading
    Tick,

    Quit,
}
