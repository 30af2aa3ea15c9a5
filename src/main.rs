//! cities-weather - pick a city, fetch its current weather

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use cities_weather::action::Action;
use cities_weather::api::WeatherClient;
use cities_weather::components::{CitiesForm, CitiesFormProps, Component};
use cities_weather::config::{init_logging, Args};
use cities_weather::effect::Effect;
use cities_weather::reducer::reducer;
use cities_weather::state::{AppState, SPINNER_TICK_MS};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

const WEATHER_TASK: &str = "weather";

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum CitiesComponentId {
    Form,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum CitiesContext {
    Main,
}

impl EventRoutingState<CitiesComponentId, CitiesContext> for AppState {
    fn focused(&self) -> Option<CitiesComponentId> {
        Some(CitiesComponentId::Form)
    }

    fn modal(&self) -> Option<CitiesComponentId> {
        None
    }

    fn binding_context(&self, _id: CitiesComponentId) -> CitiesContext {
        CitiesContext::Main
    }

    fn default_context(&self) -> CitiesContext {
        CitiesContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let locations = match args.load_locations() {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let client = WeatherClient::new(args.weather_config()).map_err(io::Error::other)?;
    let preselect = args.preselect_actions();
    tracing::info!(
        countries = locations.countries().len(),
        endpoint = %client.config().endpoint(),
        "starting"
    );

    let debug = DebugSession::new(args.debug);

    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            let mut state = AppState::new(locations);
            for action in preselect {
                reducer(&mut state, action);
            }
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, client).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct CitiesUi {
    form: CitiesForm,
}

impl CitiesUi {
    fn new() -> Self {
        Self {
            form: CitiesForm::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<CitiesComponentId>,
    ) {
        event_ctx.set_component_area(CitiesComponentId::Form, area);
        let props = CitiesFormProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.form.render(frame, area, props);
    }

    fn handle_form_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = CitiesFormProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.form.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    client: WeatherClient,
) -> io::Result<DebugRunOutput<AppState>> {
    let client = Arc::new(client);
    let ui = Rc::new(RefCell::new(CitiesUi::new()));
    let mut bus: EventBus<AppState, Action, CitiesComponentId, CitiesContext> = EventBus::new();
    let keybindings: Keybindings<CitiesContext> = Keybindings::new();

    let ui_form = Rc::clone(&ui);
    bus.register(CitiesComponentId::Form, move |event, state| {
        ui_form.borrow_mut().handle_form_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            None,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&client)),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: Arc<WeatherClient>) {
    match effect {
        Effect::FetchWeather { request_id, city } => {
            tracing::debug!(request_id, %city, "spawning weather fetch");
            ctx.tasks().spawn(TaskKey::new(WEATHER_TASK), async move {
                match client.fetch_current(&city).await {
                    Ok(data) => Action::WeatherDidLoad { request_id, data },
                    Err(e) => Action::WeatherDidError {
                        request_id,
                        error: e.to_string(),
                    },
                }
            });
        }
        Effect::CancelWeatherFetch => {
            tracing::debug!("cancelling weather fetch");
            ctx.tasks().cancel(&TaskKey::new(WEATHER_TASK));
        }
    }
}
