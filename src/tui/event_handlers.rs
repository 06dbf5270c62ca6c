use std::time::{Duration, Instant};

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::controller::PanelPhase;
use crate::tui::state::{Focus, TuiApp};

/// Handle one key press. Returns true if the caller should exit the event loop.
pub fn handle_key(app: &mut TuiApp, k: KeyEvent) -> bool {
    app.dirty = true;

    if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
        let now = Instant::now();
        if let Some(prev) = app.last_ctrl_c_at {
            if now.duration_since(prev) <= Duration::from_secs(3) {
                return true;
            }
        }
        app.last_ctrl_c_at = Some(now);
        app.controller.on_close();
        app.settle_focus();
        return false;
    }

    // An open alert swallows everything until dismissed.
    if !app.controller.notifier().is_empty() {
        if matches!(k.code, KeyCode::Enter | KeyCode::Esc) {
            app.controller.notifier_mut().dismiss();
        }
        return false;
    }

    let exit = match app.focus {
        Focus::Input => handle_input_key(app, k),
        Focus::Results => {
            handle_results_key(app, k);
            false
        }
    };
    app.settle_focus();
    exit
}

fn handle_input_key(app: &mut TuiApp, k: KeyEvent) -> bool {
    match k.code {
        KeyCode::Enter => {
            let line = app.input_text();
            if matches!(line.trim(), ":quit" | "/quit") {
                return true;
            }
            debug!(input = %line, "search submitted");
            app.controller.on_search(&line);
        }
        KeyCode::Tab | KeyCode::Down
            if app.controller.phase() == PanelPhase::ShowingResults =>
        {
            app.focus = Focus::Results;
        }
        KeyCode::Tab => {}
        KeyCode::Esc => app.controller.on_close(),
        _ => {
            app.textarea.input(k);
        }
    }
    false
}

fn handle_results_key(app: &mut TuiApp, k: KeyEvent) {
    match k.code {
        KeyCode::Up => app.controller.panel_mut().select_prev(),
        KeyCode::Down => app.controller.panel_mut().select_next(),
        KeyCode::Enter => {
            let index = app.controller.panel().selected;
            app.controller.on_select_index(index);
        }
        KeyCode::Esc | KeyCode::Char('x') => app.controller.on_close(),
        KeyCode::Tab => app.focus = Focus::Input,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::controller::PanelContainer;
    use crate::model::Restaurant;
    use std::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn r(name: &str, cuisine: &str, lat: f64, lon: f64) -> Restaurant {
        Restaurant {
            name: name.into(),
            kind: "Restaurant".into(),
            cuisine: cuisine.into(),
            address: "1 Main St".into(),
            lat,
            lon,
        }
    }

    fn loaded_app() -> TuiApp {
        let (tx, rx) = mpsc::channel();
        let mut app = TuiApp::new("test", &AppConfig::default()).with_inbox(rx);
        tx.send(Ok(vec![
            r("Tony's Pizza", "Italian", 40.0, -73.0),
            r("Pizza Planet", "Italian", 41.0, -74.0),
            r("Sakura", "Japanese", 35.0, 139.0),
        ]))
        .unwrap();
        app.drain_inbox();
        app
    }

    fn type_str(app: &mut TuiApp, s: &str) {
        for c in s.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_enter_searches() {
        let mut app = loaded_app();
        type_str(&mut app, "pizza");
        assert_eq!(app.input_text(), "pizza");
        assert!(!handle_key(&mut app, key(KeyCode::Enter)));
        let panel = app.controller.panel().mounted().unwrap();
        assert_eq!(panel.header, "Found 2 results");
    }

    #[test]
    fn test_alert_blocks_until_dismissed() {
        let mut app = TuiApp::new("test", &AppConfig::default());
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.controller.notifier().current().is_some());

        // typing is swallowed
        type_str(&mut app, "abc");
        assert_eq!(app.input_text(), "");

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.controller.notifier().current().is_none());
        type_str(&mut app, "abc");
        assert_eq!(app.input_text(), "abc");
    }

    #[test]
    fn test_navigate_and_select() {
        let mut app = loaded_app();
        type_str(&mut app, "pizza");
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Results);

        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.controller.panel().selected, 1);
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.controller.phase(), PanelPhase::Idle);
        assert_eq!(app.focus, Focus::Input);
        let frame = app.controller.frame();
        assert!(frame.src.contains("marker=41,-74"));
        assert_eq!(frame.request.label.as_deref(), Some("Pizza Planet"));
    }

    #[test]
    fn test_esc_closes_panel() {
        let mut app = loaded_app();
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.controller.phase(), PanelPhase::ShowingResults);
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.focus, Focus::Results);
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.controller.phase(), PanelPhase::Idle);
        assert_eq!(app.focus, Focus::Input);

        // closing again is a no-op
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.controller.phase(), PanelPhase::Idle);
    }

    #[test]
    fn test_tab_without_panel_stays_in_input() {
        let mut app = loaded_app();
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_quit_command() {
        let mut app = loaded_app();
        type_str(&mut app, "/quit");
        assert!(handle_key(&mut app, key(KeyCode::Enter)));

        let mut app = loaded_app();
        type_str(&mut app, ":quit");
        assert!(handle_key(&mut app, key(KeyCode::Enter)));
    }

    #[test]
    fn test_double_ctrl_c_exits() {
        let mut app = loaded_app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!handle_key(&mut app, ctrl_c));
        assert!(handle_key(&mut app, ctrl_c));
    }
}
