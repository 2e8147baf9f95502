//! Country list screen rendering
//!
//! Renders the searchable list of countries with their region and the lowest
//! plan price, plus the search box above it.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{render_message, theme};
use crate::api::CountryListItem;
use crate::app::{App, LoadState};

/// Renders the Countries tab list into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(3),    // Country list
        ])
        .split(area);

    render_search(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.search_active {
        Line::from(vec![
            Span::raw(app.search_query.clone()),
            Span::styled("_", Style::default().fg(theme::PRIMARY).add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else if app.search_query.is_empty() {
        Line::from(Span::styled("Press / to search", Style::default().fg(theme::MUTED)))
    } else {
        Line::from(Span::raw(app.search_query.clone()))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(app.search_active))
        .title(" Search ");

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(!app.search_active))
        .title(Span::styled(" Countries ", theme::heading()));

    match &app.countries {
        LoadState::Idle | LoadState::Loading => {
            render_message(frame, area, block, "Loading countries...", theme::PRIMARY);
            return;
        }
        LoadState::Failed(e) => {
            let text = format!("Could not load countries\n{}", e);
            render_message(frame, area, block, &text, theme::ERROR);
            return;
        }
        LoadState::Loaded(_) => {}
    }

    let countries = app.visible_countries();
    if countries.is_empty() {
        let text = format!("No countries match \"{}\"", app.search_query.trim());
        render_message(frame, area, block, &text, theme::MUTED);
        return;
    }

    let lines: Vec<Line> = countries
        .iter()
        .enumerate()
        .map(|(index, country)| country_line(country, index == app.selected_index))
        .collect();

    // Keep the selected row visible
    let visible_rows = area.height.saturating_sub(2) as usize;
    let scroll = (app.selected_index + 1).saturating_sub(visible_rows) as u16;

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

/// One list row: cursor, name, region and starting price
fn country_line(country: &CountryListItem, is_selected: bool) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸
    let name_style = if is_selected {
        theme::selected()
    } else {
        Style::default()
    };
    let region = if country.is_region {
        format!("{} (region)", country.region)
    } else {
        country.region.clone()
    };

    let mut spans = vec![
        Span::styled(cursor, theme::selected()),
        Span::styled(format!("{:<28}", country.name), name_style),
        Span::styled(format!("{:<22}", region), Style::default().fg(theme::MUTED)),
    ];
    if !country.starting_from.is_empty() {
        spans.push(Span::raw("from "));
        spans.push(Span::styled(
            country.starting_from.clone(),
            Style::default().fg(theme::SUCCESS),
        ));
    }
    if !country.warnings.is_empty() {
        spans.push(Span::styled(" \u{26A0}", Style::default().fg(theme::WARNING))); // ⚠
    }
    Line::from(spans)
}
