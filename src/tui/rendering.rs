use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Map, MapResolution},
    },
};
use unicode_width::UnicodeWidthChar;

use crate::controller::PanelContainer;
use crate::store::DatasetState;
use crate::tui::state::{Focus, TuiApp};
use crate::view::{CardView, PanelView};

pub fn truncate_display(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut width = 0usize;
    let mut out = String::new();
    for ch in s.chars() {
        let ch_w = ch.width().unwrap_or(0);
        if ch_w == 0 {
            out.push(ch);
            continue;
        }
        if width + ch_w > max {
            break;
        }
        out.push(ch);
        width += ch_w;
    }
    out
}

/// Overlay area for the results panel: right side of the map pane.
pub fn panel_area(map_area: Rect) -> Rect {
    let width = (map_area.width * 9 / 20).max(30).min(map_area.width);
    Rect {
        x: map_area.x + map_area.width - width,
        y: map_area.y,
        width,
        height: map_area.height,
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn dataset_status(state: &DatasetState) -> String {
    match state {
        DatasetState::Unloaded => "loading…".to_string(),
        DatasetState::Loaded(rows) => format!("{} restaurants", rows.len()),
        DatasetState::Failed(_) => "load failed".to_string(),
    }
}

impl TuiApp {
    pub fn view(&mut self, f: &mut Frame) {
        let size = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(3),    // Map
                Constraint::Length(3), // Search input
            ])
            .split(size);

        self.render_header(f, chunks[0]);
        self.render_map(f, chunks[1]);
        if let Some(panel) = self.controller.panel().mounted() {
            self.render_panel(f, panel_area(chunks[1]), panel);
        }
        let input_style = if self.focus == Focus::Input {
            self.theme.input_style
        } else {
            self.theme.input_style.add_modifier(Modifier::DIM)
        };
        self.textarea.set_style(input_style);
        f.render_widget(&self.textarea, chunks[2]);

        if let Some(message) = self.controller.notifier().current() {
            self.render_alert(f, size, message);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let status = dataset_status(self.controller.dataset());
        let text = format!("{} | [{status}]  Enter: search  Tab: results  Esc: close", self.title);
        let header = Paragraph::new(truncate_display(&text, area.width as usize))
            .style(self.theme.header_style);
        f.render_widget(header, area);
    }

    fn render_map(&self, f: &mut Frame, area: Rect) {
        let frame = self.controller.frame();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.map.target.as_str())
            .style(self.theme.map_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let bbox = frame.request.bbox;
        let marker = frame.request.marker;
        let label = frame.request.label.clone();
        let coastline = self.theme.coastline;
        let marker_style = self.theme.marker_style;
        let canvas = Canvas::default()
            .x_bounds([bbox.min_lon, bbox.max_lon])
            .y_bounds([bbox.min_lat, bbox.max_lat])
            .paint(move |ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: coastline,
                });
                if let Some((lat, lon)) = marker {
                    ctx.layer();
                    let text = match &label {
                        Some(name) => format!("● {name}"),
                        None => "●".to_string(),
                    };
                    ctx.print(lon, lat, Span::styled(text, marker_style));
                }
            });
        f.render_widget(canvas, parts[0]);

        let attribution = self
            .map
            .base_layer()
            .map(|l| l.attribution.as_str())
            .unwrap_or_default();
        let footer = format!("{}  {}", frame.src, attribution);
        f.render_widget(
            Paragraph::new(truncate_display(&footer, parts[1].width as usize))
                .style(self.theme.frame_src_style),
            parts[1],
        );
    }

    fn card_item(&self, card: &CardView, width: usize) -> ListItem<'static> {
        let mut lines = vec![Line::from(Span::styled(
            truncate_display(&card.name, width),
            self.theme.card_title_style,
        ))];
        for detail in card.detail_lines() {
            lines.push(Line::from(truncate_display(&detail, width)));
        }
        lines.push(Line::from(Span::styled(
            "📍 View on Map",
            self.theme.card_action_style,
        )));
        lines.push(Line::from(""));
        ListItem::new(lines)
    }

    fn render_panel(&self, f: &mut Frame, area: Rect, panel: &PanelView) {
        f.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(panel.header.as_str()).bold())
            .title(Line::from(Span::styled(" ✕ ", self.theme.close_style)).right_aligned())
            .style(self.theme.panel_style);
        let width = block.inner(area).width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = panel
            .cards
            .iter()
            .map(|card| self.card_item(card, width))
            .collect();
        let highlight = if self.focus == Focus::Results {
            self.theme.selected_style
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.controller.panel().selected));
        f.render_stateful_widget(list, area, &mut state);
    }

    fn render_alert(&self, f: &mut Frame, area: Rect, message: &str) {
        let popup = centered(area, 60, 7);
        f.render_widget(Clear, popup);
        let alert = Paragraph::new(vec![
            Line::from(message.to_string()),
            Line::from(""),
            Line::from("[Enter] OK").alignment(Alignment::Right),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Notice"))
        .style(self.theme.alert_style);
        f.render_widget(alert, popup);
    }
}
