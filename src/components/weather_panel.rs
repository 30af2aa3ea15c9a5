use artbox::{
    integrations::ratatui::ArtBox, fonts, Alignment as ArtAlignment, Color as ArtColor, Fill,
    LinearGradient, Renderer,
};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::state::WeatherResult;

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

/// Error line plus the weather readout; either part may be absent
pub struct WeatherPanel;

pub struct WeatherPanelProps<'a> {
    pub weather: Option<&'a WeatherResult>,
    pub error: Option<&'a str>,
}

/// Rows taken by the plain-text readout.
const READOUT_LINES: u16 = 4;
/// Minimum spare height before the big temperature is drawn.
const ART_MIN_HEIGHT: u16 = 4;

impl Component<Action> for WeatherPanel {
    type Props<'a> = WeatherPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let error_h = u16::from(props.error.is_some());
        let chunks = Layout::vertical([Constraint::Length(error_h), Constraint::Min(0)])
            .split(area);

        if let Some(error) = props.error {
            render_error(frame, chunks[0], error);
        }
        if let Some(weather) = props.weather {
            render_weather(frame, chunks[1], weather);
        }
    }
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let line = Line::from(vec![
        Span::raw(format!("{ERROR_ICON} ")),
        Span::styled(error.to_string(), Style::default().fg(Color::Red).bold()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_weather(frame: &mut Frame, area: Rect, weather: &WeatherResult) {
    // heading + blank + readout
    let text_h = READOUT_LINES + 2;
    let art_h = area.height.saturating_sub(text_h + 1).min(6);
    let art_h = if art_h >= ART_MIN_HEIGHT { art_h } else { 0 };

    let chunks = Layout::vertical([
        Constraint::Length(1),     // Heading
        Constraint::Length(1),     // Spacer
        Constraint::Length(art_h), // Big temperature
        Constraint::Length(READOUT_LINES),
    ])
    .flex(Flex::Start)
    .split(area);

    let heading = Line::from(vec![Span::styled(
        format!("Weather in {}", weather.name),
        Style::default().fg(Color::Cyan).bold(),
    )]);
    frame.render_widget(Paragraph::new(heading), chunks[0]);

    if art_h > 0 {
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(temperature_gradient(weather.main.temp));
        let text = format!("{}°C", weather.main.temp);
        frame.render_widget(ArtBox::new(&renderer, &text), chunks[2]);
    }

    let lines: Vec<Line> = readout(weather)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
                Span::raw(value),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[3]);
}

/// Label/value pairs in display order
pub fn readout(weather: &WeatherResult) -> [(&'static str, String); 4] {
    [
        ("Temperature", format!("{} °C", weather.main.temp)),
        (
            "Weather",
            weather.description().unwrap_or("unknown").to_string(),
        ),
        ("Humidity", format!("{}%", weather.main.humidity)),
        ("Wind Speed", format!("{} m/s", weather.wind.speed)),
    ]
}

fn temperature_gradient(celsius: f64) -> Fill {
    let (start, end) = match celsius {
        t if t < 0.0 => (ArtColor::rgb(150, 200, 255), ArtColor::rgb(200, 230, 255)),
        t if t < 15.0 => (ArtColor::rgb(100, 180, 255), ArtColor::rgb(150, 220, 200)),
        t if t < 25.0 => (ArtColor::rgb(100, 200, 150), ArtColor::rgb(255, 220, 100)),
        t if t < 35.0 => (ArtColor::rgb(255, 180, 80), ArtColor::rgb(255, 120, 80)),
        _ => (ArtColor::rgb(255, 100, 80), ArtColor::rgb(255, 60, 60)),
    };
    Fill::Linear(LinearGradient::horizontal(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Conditions, MainReadings, Wind};
    use pretty_assertions::assert_eq;
    use tui_dispatch::testing::*;

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

    #[test]
    fn test_readout_formatting() {
        let values: Vec<String> = readout(&paris()).into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec!["15 °C", "clear sky", "60%", "3.2 m/s"]);
    }

    #[test]
    fn test_readout_without_conditions() {
        let mut weather = paris();
        weather.weather.clear();
        assert_eq!(readout(&weather)[1].1, "unknown");
    }

    #[test]
    fn test_render_nothing_when_empty() {
        let mut render = RenderHarness::new(40, 10);
        let output = render.render_to_string_plain(|frame| {
            WeatherPanel.render(
                frame,
                frame.area(),
                WeatherPanelProps {
                    weather: None,
                    error: None,
                },
            );
        });
        assert!(output.trim().is_empty());
    }
}
