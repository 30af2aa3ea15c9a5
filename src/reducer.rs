//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, Field, FETCH_FAILED_PREFIX, SELECT_CITY_MESSAGE};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Cascade =====
        Action::CountrySelect(name) => {
            state.select_country(&name);
            abandon_fetch(state)
        }

        Action::CountryHighlight(index) => highlight(state, Field::Country, index),

        Action::CountryConfirm => {
            let Some(name) = state.highlighted(Field::Country) else {
                return DispatchResult::unchanged();
            };
            state.select_country(&name);
            state.focus_next();
            abandon_fetch(state)
        }

        Action::RegionSelect(name) => {
            state.select_state(&name);
            abandon_fetch(state)
        }

        Action::RegionHighlight(index) => highlight(state, Field::Region, index),

        Action::RegionConfirm => {
            let Some(name) = state.highlighted(Field::Region) else {
                return DispatchResult::unchanged();
            };
            state.select_state(&name);
            state.focus_next();
            abandon_fetch(state)
        }

        Action::CitySelect(name) => {
            state.select_city(&name);
            DispatchResult::changed()
        }

        Action::CityHighlight(index) => highlight(state, Field::City, index),

        Action::CityConfirm => {
            let Some(name) = state.highlighted(Field::City) else {
                return DispatchResult::unchanged();
            };
            state.select_city(&name);
            state.focus_next();
            DispatchResult::changed()
        }

        // ===== Weather =====
        Action::WeatherFetch => {
            if state.selected_city.is_empty() {
                state.error = Some(SELECT_CITY_MESSAGE.to_string());
                return DispatchResult::changed();
            }
            if state.loading {
                return DispatchResult::unchanged();
            }
            state.error = None;
            state.loading = true;
            state.tick_count = 0;
            state.request_seq += 1;
            state.in_flight = Some(state.request_seq);
            DispatchResult::changed_with(Effect::FetchWeather {
                request_id: state.request_seq,
                city: state.selected_city.clone(),
            })
        }

        Action::WeatherDidLoad { request_id, data } => {
            if !state.is_current_request(request_id) {
                return DispatchResult::unchanged();
            }
            state.weather = Some(data);
            state.error = None;
            state.loading = false;
            state.in_flight = None;
            DispatchResult::changed()
        }

        Action::WeatherDidError { request_id, error } => {
            if !state.is_current_request(request_id) {
                return DispatchResult::unchanged();
            }
            // Previous weather stays on screen next to the error.
            state.error = Some(format!("{FETCH_FAILED_PREFIX}: {error}"));
            state.loading = false;
            state.in_flight = None;
            DispatchResult::changed()
        }

        // ===== Focus =====
        Action::FocusNext => {
            let before = state.focus;
            state.focus_next();
            changed_if(state.focus != before)
        }

        Action::FocusPrev => {
            let before = state.focus;
            state.focus_prev();
            changed_if(state.focus != before)
        }

        // ===== Global =====
        Action::Tick => {
            if state.loading {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// An upstream change makes any pending result meaningless.
fn abandon_fetch(state: &mut AppState) -> DispatchResult<Effect> {
    if state.abandon_fetch() {
        DispatchResult::changed_with(Effect::CancelWeatherFetch)
    } else {
        DispatchResult::changed()
    }
}

fn highlight(state: &mut AppState, field: Field, index: usize) -> DispatchResult<Effect> {
    let len = state.options(field).len();
    let cursor = match field {
        Field::Country => &mut state.country_cursor,
        Field::Region => &mut state.state_cursor,
        Field::City => &mut state.city_cursor,
        Field::Fetch => return DispatchResult::unchanged(),
    };
    if index < len && index != *cursor {
        *cursor = index;
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}

fn changed_if(changed: bool) -> DispatchResult<Effect> {
    if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}
