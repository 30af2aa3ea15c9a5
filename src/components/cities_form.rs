use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{Component, Dropdown, DropdownProps, WeatherPanel, WeatherPanelProps};
use crate::action::Action;
use crate::state::{AppState, Field};

/// Props for CitiesForm - read-only view of state
pub struct CitiesFormProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole widget: three cascading dropdowns, the fetch button and the
/// weather panel.
#[derive(Default)]
pub struct CitiesForm {
    country: Dropdown,
    region: Dropdown,
    city: Dropdown,
}

impl CitiesForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn dropdown_props<'a>(
        state: &'a AppState,
        field: Field,
        options: &'a [&'a str],
    ) -> DropdownProps<'a> {
        let (title, placeholder, on_highlight, on_confirm): (_, _, fn(usize) -> Action, _) =
            match field {
                Field::Region => (
                    "State",
                    "Select a state",
                    Action::RegionHighlight,
                    Action::RegionConfirm,
                ),
                Field::City => (
                    "City",
                    "Select a city",
                    Action::CityHighlight,
                    Action::CityConfirm,
                ),
                Field::Country | Field::Fetch => (
                    "Country",
                    "Select a country",
                    Action::CountryHighlight,
                    Action::CountryConfirm,
                ),
            };
        DropdownProps {
            title,
            placeholder,
            selected: state.selected(field),
            options,
            cursor: state.cursor(field),
            is_focused: state.focus == field,
            is_enabled: state.is_enabled(field),
            on_highlight,
            on_confirm,
        }
    }

    fn dropdown_mut(&mut self, field: Field) -> Option<&mut Dropdown> {
        match field {
            Field::Country => Some(&mut self.country),
            Field::Region => Some(&mut self.region),
            Field::City => Some(&mut self.city),
            Field::Fetch => None,
        }
    }
}

impl Component<Action> for CitiesForm {
    type Props<'a> = CitiesFormProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        let state = props.state;

        match key.code {
            KeyCode::Tab => return Some(Action::FocusNext),
            KeyCode::BackTab => return Some(Action::FocusPrev),
            KeyCode::Char('r') | KeyCode::F(5) => return Some(Action::WeatherFetch),
            KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
            KeyCode::Enter if state.focus == Field::Fetch => {
                return state.can_fetch().then_some(Action::WeatherFetch);
            }
            _ => {}
        }

        let focus = state.focus;
        let options = state.options(focus);
        let props = Self::dropdown_props(state, focus, &options);
        let Some(dropdown) = self.dropdown_mut(focus) else {
            return None;
        };
        let action = dropdown.handle_event(event, props).into_iter().next();
        action
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CitiesFormProps<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Length(1),  // Title
            Constraint::Length(10), // Dropdowns
            Constraint::Length(3),  // Button
            Constraint::Min(0),     // Error + weather
            Constraint::Length(1),  // Help bar
        ])
        .split(area);

        let title = Line::from(Span::styled(
            "City weather",
            Style::default().fg(Color::Cyan).bold(),
        ))
        .centered();
        frame.render_widget(Paragraph::new(title), chunks[0]);

        let columns = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

        let fields = [Field::Country, Field::Region, Field::City];
        for (field, column) in fields.into_iter().zip(columns.iter()) {
            let options = state.options(field);
            let dropdown_props = Self::dropdown_props(state, field, &options);
            if let Some(dropdown) = self.dropdown_mut(field) {
                dropdown.render(frame, *column, dropdown_props);
            }
        }

        render_button(frame, chunks[2], state);

        let mut panel = WeatherPanel;
        let panel_area = chunks[3].inner(ratatui::layout::Margin::new(1, 0));
        panel.render(
            frame,
            panel_area,
            WeatherPanelProps {
                weather: state.weather.as_ref(),
                error: state.error.as_deref(),
            },
        );

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[4],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("tab", "next"),
                    StatusBarHint::new("enter", "select"),
                    StatusBarHint::new("r", "weather"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn render_button(frame: &mut Frame, area: Rect, state: &AppState) {
    let enabled = state.can_fetch();
    let focused = state.focus == Field::Fetch;
    let color = match (enabled, focused) {
        (false, _) => Color::DarkGray,
        (true, true) => Color::Cyan,
        (true, false) => Color::Gray,
    };

    let label = if state.loading {
        format!("{} {}", state.spinner(), state.fetch_label())
    } else {
        state.fetch_label().to_string()
    };
    let mut style = Style::default().fg(color);
    if focused && enabled {
        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }

    let width = (label.chars().count() as u16 + 4).min(area.width);
    let [button_area] = Layout::horizontal([Constraint::Length(width)])
        .flex(ratatui::layout::Flex::Center)
        .areas(area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label, style)).centered()).block(block),
        button_area,
    );
}
