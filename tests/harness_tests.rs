//! End-to-end flows with EffectStoreTestHarness: keys → actions → state →
//! effects → simulated async completion → render.

use cities_weather::{
    action::Action,
    components::{CitiesForm, CitiesFormProps, Component},
    effect::Effect,
    reducer::reducer,
    state::{AppState, Conditions, Field, MainReadings, WeatherResult, Wind},
};
use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;

fn paris() -> WeatherResult {
    WeatherResult {
        name: "Paris".into(),
        main: MainReadings {
            temp: 15.0,
            humidity: 60.0,
        },
        weather: vec![Conditions {
            description: "clear sky".into(),
        }],
        wind: Wind { speed: 3.2 },
    }
}

fn paris_selected() -> AppState {
    let mut state = AppState::default();
    reducer(&mut state, Action::CountrySelect("France".into()));
    reducer(&mut state, Action::RegionSelect("Ile-de-France".into()));
    reducer(&mut state, Action::CitySelect("Paris".into()));
    state
}

// ============================================================================
// Fetch flow
// ============================================================================

#[test]
fn test_fetch_flow_success() {
    let mut harness = EffectStoreTestHarness::new(paris_selected(), reducer);

    harness.dispatch_collect(Action::WeatherFetch);
    harness.assert_state(|s| s.loading);
    harness.assert_state(|s| s.error.is_none());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::FetchWeather { request_id: 1, city } if city == "Paris"),
    );

    harness.complete_action(Action::WeatherDidLoad {
        request_id: 1,
        data: paris(),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| !s.loading);
    harness.assert_state(|s| s.weather.as_ref() == Some(&paris()));
    harness.assert_state(|s| s.error.is_none());
}

#[test]
fn test_fetch_flow_not_found() {
    let mut harness = EffectStoreTestHarness::new(paris_selected(), reducer);

    harness.dispatch_collect(Action::WeatherFetch);
    harness.complete_action(Action::WeatherDidError {
        request_id: 1,
        error: "Error: 404".into(),
    });
    harness.process_emitted();

    harness.assert_state(|s| !s.loading);
    harness.assert_state(|s| s.error.as_deref().is_some_and(|e| e.contains("404")));
}

#[test]
fn test_overlapping_results_only_latest_applies() {
    let mut harness = EffectStoreTestHarness::new(paris_selected(), reducer);

    harness.dispatch_collect(Action::WeatherFetch);
    harness.complete_action(Action::WeatherDidError {
        request_id: 1,
        error: "boom".into(),
    });
    harness.process_emitted();
    harness.dispatch_collect(Action::WeatherFetch);
    harness.drain_effects();

    // Late duplicate of the first request, then the real answer.
    harness.complete_action(Action::WeatherDidError {
        request_id: 1,
        error: "late".into(),
    });
    harness.complete_action(Action::WeatherDidLoad {
        request_id: 2,
        data: paris(),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 2);
    assert_eq!(changed, 1);
    harness.assert_state(|s| s.error.is_none());
    harness.assert_state(|s| s.weather.is_some());
}

#[test]
fn test_country_change_mid_fetch_cancels() {
    let mut harness = EffectStoreTestHarness::new(paris_selected(), reducer);

    harness.dispatch_collect(Action::WeatherFetch);
    harness.drain_effects();
    harness.dispatch_collect(Action::CountrySelect("Canada".into()));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::CancelWeatherFetch));
    harness.assert_state(|s| !s.loading);
}

#[test]
fn test_state_change_mid_fetch_cancels_and_drops_late_result() {
    let mut harness = EffectStoreTestHarness::new(paris_selected(), reducer);

    harness.dispatch_collect(Action::WeatherFetch);
    harness.drain_effects();
    harness.dispatch_collect(Action::RegionSelect("Ile-de-France".into()));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::CancelWeatherFetch));
    harness.assert_state(|s| !s.loading);
    harness.assert_state(|s| s.in_flight.is_none());

    harness.complete_action(Action::WeatherDidLoad {
        request_id: 1,
        data: paris(),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 1);
    assert_eq!(changed, 0);
    harness.assert_state(|s| s.weather.is_none());
}

// ============================================================================
// Keyboard → store
// ============================================================================

/// Feed keys through the form and dispatch whatever it emits
macro_rules! press_keys {
    ($harness:expr, $keys:expr) => {{
        let mut form = CitiesForm::new();
        let actions = $harness.send_keys::<NumericComponentId, _, _>($keys, |state, event| {
            let props = CitiesFormProps {
                state,
                is_focused: true,
            };
            form.handle_event(&event.kind, props)
                .into_iter()
                .collect::<Vec<_>>()
        });
        for action in actions {
            $harness.dispatch_collect(action);
        }
    }};
}

#[test]
fn test_keyboard_navigation_highlights_without_selecting() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    press_keys!(harness, "j");
    press_keys!(harness, "j");

    harness.assert_state(|s| s.country_cursor == 2);
    harness.assert_state(|s| s.selected_country.is_empty());
}

#[test]
fn test_refresh_key_without_city_shows_validation_error() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    press_keys!(harness, "r");

    harness.assert_state(|s| s.error.as_deref() == Some("Please select a city."));
    harness.drain_effects().effects_empty();
}

#[test]
fn test_refresh_key_with_city_fetches() {
    let mut harness = EffectStoreTestHarness::new(paris_selected(), reducer);

    press_keys!(harness, "r");

    harness.assert_state(|s| s.loading);
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::FetchWeather { .. }));
}

#[test]
fn test_confirm_chain_reaches_fetch_button() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_all([
        Action::CountryConfirm,
        Action::RegionConfirm,
        Action::CityConfirm,
    ]);

    harness.assert_state(|s| !s.selected_city.is_empty());
    harness.assert_state(|s| s.focus == Field::Fetch);
    harness.assert_state(|s| s.can_fetch());
}

// ============================================================================
// Render
// ============================================================================

#[test]
fn test_render_after_load() {
    let mut harness = EffectStoreTestHarness::new(paris_selected(), reducer);
    let mut form = CitiesForm::new();

    harness.dispatch_collect(Action::WeatherFetch);
    harness.complete_action(Action::WeatherDidLoad {
        request_id: 1,
        data: paris(),
    });
    harness.process_emitted();

    let output = harness.render_plain(90, 30, |frame, area, state| {
        form.render(
            frame,
            area,
            CitiesFormProps {
                state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("Weather in Paris"), "output:\n{}", output);
    assert!(output.contains("Wind Speed: 3.2 m/s"), "output:\n{}", output);
}

#[test]
fn test_render_while_loading() {
    let mut harness = EffectStoreTestHarness::new(paris_selected(), reducer);
    let mut form = CitiesForm::new();

    harness.dispatch_collect(Action::WeatherFetch);

    let output = harness.render_plain(90, 30, |frame, area, state| {
        form.render(
            frame,
            area,
            CitiesFormProps {
                state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("Loading..."), "output:\n{}", output);
    assert!(!output.contains("Get Weather"), "output:\n{}", output);
}
