use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle,
};

use super::Component;
use crate::action::Action;

const ACCENT: Color = Color::Cyan;
const DIM: Color = Color::DarkGray;

/// One level of the cascade: a titled list with a committed value.
///
/// Moving the highlight emits `on_highlight`; `Enter` emits `on_confirm`.
#[derive(Default)]
pub struct Dropdown {
    list: SelectList,
}

pub struct DropdownProps<'a> {
    pub title: &'a str,
    pub placeholder: &'a str,
    pub selected: &'a str,
    pub options: &'a [&'a str],
    pub cursor: usize,
    pub is_focused: bool,
    pub is_enabled: bool,
    pub on_highlight: fn(usize) -> Action,
    pub on_confirm: Action,
}

impl Dropdown {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(options: &[&str], selected: &str) -> Vec<Line<'static>> {
        options
            .iter()
            .map(|name| {
                if *name == selected {
                    Line::from(Span::styled(
                        format!("{name} *"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(name.to_string())
                }
            })
            .collect()
    }
}

impl Component<Action> for Dropdown {
    type Props<'a> = DropdownProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.is_enabled || props.options.is_empty() {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        let last = props.options.len() - 1;
        let cursor = props.cursor.min(last);
        match key.code {
            KeyCode::Enter => Some(props.on_confirm),
            KeyCode::Up | KeyCode::Char('k') if cursor > 0 => Some((props.on_highlight)(cursor - 1)),
            KeyCode::Down | KeyCode::Char('j') if cursor < last => {
                Some((props.on_highlight)(cursor + 1))
            }
            KeyCode::Home => Some((props.on_highlight)(0)),
            KeyCode::End => Some((props.on_highlight)(last)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border_color = match (props.is_enabled, props.is_focused) {
            (false, _) => DIM,
            (true, true) => ACCENT,
            (true, false) => Color::Gray,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {} ", props.title));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Current value
            Constraint::Min(0),    // Options
        ])
        .split(inner);

        let value = if props.selected.is_empty() {
            Span::styled(props.placeholder.to_string(), Style::default().fg(DIM))
        } else {
            Span::styled(
                props.selected.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        };
        frame.render_widget(Paragraph::new(Line::from(value)), chunks[0]);

        if !props.is_enabled || chunks[1].height == 0 {
            return;
        }

        let items = Self::items(props.options, props.selected);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.cursor.min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: SelectListStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: None,
                    fg: None,
                },
                selection: SelectionStyle::default(),
                scrollbar: ScrollbarStyle::default(),
            },
            behavior: SelectListBehavior::default(),
            on_select: props.on_highlight,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, chunks[1], list_props);
    }
}
