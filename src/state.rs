//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::locations::{find_region, LocationTree, Region};

/// Shown when a fetch is requested before a city is chosen
pub const SELECT_CITY_MESSAGE: &str = "Please select a city.";

/// Prefix for every transport, status, or parse failure
pub const FETCH_FAILED_PREFIX: &str = "Failed to fetch weather data";

/// Spinner timing while a request is in flight.
pub const SPINNER_TICK_MS: u64 = 90;
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Conditions {
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Wind {
    pub speed: f64,
}

/// Current weather as returned by OpenWeatherMap (metric units).
///
/// Only the fields the result panel shows are kept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherResult {
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<Conditions>,
    pub wind: Wind,
}

impl WeatherResult {
    /// Description of the primary condition, if the API sent one
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|c| c.description.as_str())
    }
}

/// Focusable controls, in tab order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Field {
    #[default]
    Country,
    Region,
    City,
    Fetch,
}

impl Field {
    pub const ORDER: [Field; 4] = [Field::Country, Field::Region, Field::City, Field::Fetch];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Caller-supplied catalogue; never written after construction
    #[debug(skip)]
    pub locations: LocationTree,

    // --- Selection ---
    #[debug(section = "Selection", label = "Country")]
    pub selected_country: String,

    #[debug(section = "Selection", label = "State")]
    pub selected_state: String,

    #[debug(section = "Selection", label = "City")]
    pub selected_city: String,

    /// Regions of the selected country
    #[debug(skip)]
    pub states: Vec<Region>,

    /// Cities of the selected region
    #[debug(skip)]
    pub cities: Vec<String>,

    // --- Weather ---
    #[debug(section = "Weather", label = "Result", debug_fmt)]
    pub weather: Option<WeatherResult>,

    #[debug(section = "Weather", label = "Loading")]
    pub loading: bool,

    #[debug(section = "Weather", label = "Error", debug_fmt)]
    pub error: Option<String>,

    /// Number of fetches issued so far
    #[debug(section = "Weather", label = "Requests")]
    pub request_seq: u64,

    /// Generation whose result is still wanted
    #[debug(section = "Weather", label = "In flight", debug_fmt)]
    pub in_flight: Option<u64>,

    // --- UI ---
    #[debug(section = "UI", label = "Focus", debug_fmt)]
    pub focus: Field,

    #[debug(skip)]
    pub country_cursor: usize,

    #[debug(skip)]
    pub state_cursor: usize,

    #[debug(skip)]
    pub city_cursor: usize,

    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn new(locations: LocationTree) -> Self {
        Self {
            locations,
            selected_country: String::new(),
            selected_state: String::new(),
            selected_city: String::new(),
            states: Vec::new(),
            cities: Vec::new(),
            weather: None,
            loading: false,
            error: None,
            request_seq: 0,
            in_flight: None,
            focus: Field::Country,
            country_cursor: 0,
            state_cursor: 0,
            city_cursor: 0,
            tick_count: 0,
        }
    }

    // ===== Cascade =====

    /// Choose a country. Unknown names leave the region list empty.
    pub fn select_country(&mut self, name: &str) {
        let country = self.locations.find_country(name);
        self.states = country.map(|c| c.states.clone()).unwrap_or_default();
        if let Some(index) = self.locations.countries().iter().position(|c| c.name == name) {
            self.country_cursor = index;
        }
        self.selected_country = name.to_string();
        self.selected_state.clear();
        self.selected_city.clear();
        self.cities.clear();
        self.weather = None;
        self.state_cursor = 0;
        self.city_cursor = 0;
    }

    /// Choose a region within the current country.
    pub fn select_state(&mut self, name: &str) {
        self.cities = find_region(&self.states, name)
            .map(|r| r.cities.clone())
            .unwrap_or_default();
        if let Some(index) = self.states.iter().position(|r| r.name == name) {
            self.state_cursor = index;
        }
        self.selected_state = name.to_string();
        self.selected_city.clear();
        self.weather = None;
        self.city_cursor = 0;
    }

    /// Choose a city. Keeps whatever weather is already displayed.
    pub fn select_city(&mut self, name: &str) {
        if let Some(index) = self.cities.iter().position(|c| c == name) {
            self.city_cursor = index;
        }
        self.selected_city = name.to_string();
    }

    /// Forget the in-flight request, if any. Returns whether one was pending.
    pub fn abandon_fetch(&mut self) -> bool {
        let pending = self.in_flight.take().is_some();
        if pending {
            self.loading = false;
        }
        pending
    }

    /// Whether a result tagged `request_id` should be applied
    pub fn is_current_request(&self, request_id: u64) -> bool {
        self.in_flight == Some(request_id)
    }

    // ===== Option lists =====

    pub fn country_names(&self) -> Vec<&str> {
        self.locations
            .countries()
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn region_names(&self) -> Vec<&str> {
        self.states.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn city_names(&self) -> Vec<&str> {
        self.cities.iter().map(String::as_str).collect()
    }

    pub fn options(&self, field: Field) -> Vec<&str> {
        match field {
            Field::Country => self.country_names(),
            Field::Region => self.region_names(),
            Field::City => self.city_names(),
            Field::Fetch => Vec::new(),
        }
    }

    pub fn cursor(&self, field: Field) -> usize {
        match field {
            Field::Country => self.country_cursor,
            Field::Region => self.state_cursor,
            Field::City => self.city_cursor,
            Field::Fetch => 0,
        }
    }

    pub fn selected(&self, field: Field) -> &str {
        match field {
            Field::Country => &self.selected_country,
            Field::Region => &self.selected_state,
            Field::City => &self.selected_city,
            Field::Fetch => "",
        }
    }

    /// Name under the cursor of a dropdown
    pub fn highlighted(&self, field: Field) -> Option<String> {
        self.options(field)
            .get(self.cursor(field))
            .map(|name| name.to_string())
    }

    // ===== Enablement & focus =====

    pub fn can_fetch(&self) -> bool {
        !self.selected_city.is_empty() && !self.loading
    }

    pub fn is_enabled(&self, field: Field) -> bool {
        match field {
            Field::Country => !self.locations.is_empty(),
            Field::Region => !self.states.is_empty(),
            Field::City => !self.cities.is_empty(),
            Field::Fetch => self.can_fetch(),
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.step_focus(Field::ORDER.len() - 1);
    }

    fn step_focus(&self, step: usize) -> Field {
        let len = Field::ORDER.len();
        let start = self.focus.index();
        (1..len)
            .map(|offset| Field::ORDER[(start + offset * step) % len])
            .find(|field| self.is_enabled(*field))
            .unwrap_or(self.focus)
    }

    pub fn fetch_label(&self) -> &'static str {
        if self.loading {
            "Loading..."
        } else {
            "Get Weather"
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.tick_count as usize % SPINNER_FRAMES.len()]
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LocationTree::sample())
    }
}
