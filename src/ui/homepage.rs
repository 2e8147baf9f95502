//! Homepage rendering
//!
//! Shows the selectable languages and currencies side by side. The current
//! preference is marked with a dot, the highlighted row with a cursor.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::BTreeMap;

use super::{render_message, theme};
use crate::app::{App, HomeFocus, LoadState};

/// Renders the Homepage into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(false))
        .title(Span::styled(" Preferences ", theme::heading()));

    if !app.preferences().is_ready() {
        render_message(frame, area, block, "Loading preferences...", theme::PRIMARY);
        return;
    }

    let params = match &app.params {
        LoadState::Loaded(params) => params,
        LoadState::Failed(e) => {
            let text = format!("Could not load languages and currencies\n{}", e);
            render_message(frame, area, block, &text, theme::ERROR);
            return;
        }
        LoadState::Idle | LoadState::Loading => {
            render_message(frame, area, block, "Loading...", theme::PRIMARY);
            return;
        }
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let current = app.preferences().preferences();
    render_choices(
        frame,
        columns[0],
        " Language ",
        &params.languages,
        &current.language,
        app.language_index,
        app.home_focus == HomeFocus::Languages,
    );
    render_choices(
        frame,
        columns[1],
        " Currency ",
        &params.currencies,
        &current.currency,
        app.currency_index,
        app.home_focus == HomeFocus::Currencies,
    );
}

/// Renders one list of code/label choices
fn render_choices(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    choices: &BTreeMap<String, String>,
    current: &str,
    selected: usize,
    focused: bool,
) {
    let lines: Vec<Line> = choices
        .iter()
        .enumerate()
        .map(|(index, (code, label))| {
            let is_selected = focused && index == selected;
            let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸
            let marker = if code == current { "\u{25CF} " } else { "  " }; // ●
            let style = if is_selected {
                theme::selected()
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(cursor, theme::selected()),
                Span::styled(marker, Style::default().fg(theme::SUCCESS)),
                Span::styled(format!("{:<6}", code.to_uppercase()), Style::default().fg(theme::MUTED)),
                Span::styled(label.clone(), style),
            ])
        })
        .collect();

    // Keep the highlighted row visible in short terminals
    let visible_rows = area.height.saturating_sub(2) as usize;
    let scroll = (selected + 1).saturating_sub(visible_rows) as u16;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(focused))
        .title(Span::styled(title.to_string(), theme::heading()));

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}
