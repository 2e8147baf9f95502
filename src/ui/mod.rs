//! UI rendering module for esimstore
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. [`render`] draws the tab bar,
//! the active screen, the key hints and, on top, the help overlay.

pub mod countries;
pub mod country_detail;
pub mod help_overlay;
pub mod homepage;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, CountriesView, Tab};

pub use countries::render as render_countries;
pub use country_detail::render as render_country_detail;
pub use help_overlay::render as render_help_overlay;
pub use homepage::render as render_homepage;

/// Renders the whole UI for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(3),    // Screen
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    render_tab_bar(frame, app, chunks[0]);

    match (app.active_tab, &app.countries_view) {
        (Tab::Homepage, _) => render_homepage(frame, app, chunks[1]),
        (Tab::Countries, CountriesView::List) => render_countries(frame, app, chunks[1]),
        (Tab::Countries, CountriesView::Detail(_)) => render_country_detail(frame, app, chunks[1]),
    }

    render_hints(frame, app, chunks[2]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.title())))
        .collect();

    let prefs = app.preferences().preferences();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(false))
        .title(Span::styled(" eSIM Store ", theme::heading()))
        .title(
            Line::from(Span::styled(
                format!(" {} · {} ", prefs.language, prefs.currency.to_uppercase()),
                Style::default().fg(theme::MUTED),
            ))
            .alignment(Alignment::Right),
        );

    let tabs = Tabs::new(titles)
        .block(block)
        .select(app.active_tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(theme::selected())
        .divider("│");

    frame.render_widget(tabs, area);
}

/// Key hints for the current screen
fn hint_keys(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.search_active {
        return vec![("type", "Search"), ("Enter/Esc", "Done"), ("↑/↓", "Navigate")];
    }
    let mut keys = match (app.active_tab, &app.countries_view) {
        (Tab::Homepage, _) => vec![("←/→", "Switch list"), ("↑/↓", "Navigate"), ("Enter", "Apply")],
        (Tab::Countries, CountriesView::List) => {
            vec![("↑/↓", "Navigate"), ("Enter", "Plans"), ("/", "Search")]
        }
        (Tab::Countries, CountriesView::Detail(_)) => vec![("↑/↓", "Scroll"), ("Esc", "Back")],
    };
    keys.extend([("Tab", "Switch tab"), ("r", "Reload"), ("?", "Help"), ("q", "Quit")]);
    keys
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let spans: Vec<Span> = hint_keys(app)
        .into_iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(key, Style::default().fg(theme::KEY)),
                Span::raw(format!(" {}  ", action)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders a single centered message, e.g. a loading or error notice
pub(crate) fn render_message(frame: &mut Frame, area: Rect, block: Block, text: &str, color: Color) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(2),
            Constraint::Percentage(45),
        ])
        .split(inner);

    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, chunks[1]);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, Terminal};

    use crate::api::EsimClient;
    use crate::app::App;
    use crate::cache::CacheManager;
    use crate::catalog::Catalog;
    use crate::prefs::PreferencesStore;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    /// App with ready default preferences and an unreachable API
    pub async fn ready_app() -> App {
        let store = Arc::new(MemoryStore::new());
        let preferences = PreferencesStore::open(store.clone());
        preferences.ready().await;
        let catalog = Catalog::new(
            CacheManager::new(store),
            EsimClient::with_base_url("http://127.0.0.1:9"),
        );
        App::new(preferences, catalog)
    }

    /// Draws with `draw` and returns the buffer as one string
    pub fn render_to_string(draw: impl FnOnce(&mut ratatui::Frame)) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(draw).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }
}
