use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub header_style: Style,
    pub map_style: Style,
    pub coastline: Color,
    pub marker_style: Style,
    pub frame_src_style: Style,
    pub panel_style: Style,
    pub card_title_style: Style,
    pub card_action_style: Style,
    pub selected_style: Style,
    pub close_style: Style,
    pub input_style: Style,
    pub alert_style: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            header_style: Style::default().fg(Color::Cyan),
            map_style: Style::default().fg(Color::White),
            coastline: Color::Green,
            marker_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            frame_src_style: Style::default().fg(Color::DarkGray),
            panel_style: Style::default().fg(Color::White),
            card_title_style: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            card_action_style: Style::default().fg(Color::LightBlue),
            selected_style: Style::default().bg(Color::DarkGray).fg(Color::White),
            close_style: Style::default().fg(Color::White).bg(Color::Red),
            input_style: Style::default().fg(Color::White),
            alert_style: Style::default().fg(Color::Black).bg(Color::Yellow),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            header_style: Style::default().fg(Color::Blue),
            map_style: Style::default().fg(Color::Black),
            coastline: Color::Blue,
            marker_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            frame_src_style: Style::default().fg(Color::Gray),
            panel_style: Style::default().fg(Color::Black),
            card_title_style: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            card_action_style: Style::default().fg(Color::Blue),
            selected_style: Style::default().bg(Color::Gray).fg(Color::Black),
            close_style: Style::default().fg(Color::White).bg(Color::Red),
            input_style: Style::default().fg(Color::Black),
            alert_style: Style::default().fg(Color::White).bg(Color::Red),
        }
    }

    /// Unknown names fall back to dark.
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}
