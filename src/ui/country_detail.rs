//! Country detail screen rendering
//!
//! Renders a country header followed by one card per plan: data allowance,
//! validity, price and feature badges. The plan list scrolls with Up/Down.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{render_message, theme};
use crate::api::{CountryDetail, CountryPlan};
use crate::app::{App, LoadState};

/// Renders the detail screen of the open country into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(false))
        .title(Span::styled(" Plans ", theme::heading()));

    let detail = match &app.detail {
        LoadState::Loaded(detail) => detail,
        LoadState::Failed(e) => {
            let text = format!("Could not load plans\n{}", e);
            render_message(frame, area, block, &text, theme::ERROR);
            return;
        }
        LoadState::Idle | LoadState::Loading => {
            render_message(frame, area, block, "Loading plans...", theme::PRIMARY);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Country header
            Constraint::Min(3),    // Plans
        ])
        .split(area);

    render_header(frame, detail, chunks[0]);

    let lines = plan_lines(&detail.plans);
    let visible_rows = chunks[1].height.saturating_sub(2);
    let max_scroll = (lines.len() as u16).saturating_sub(visible_rows);
    let scroll = app.detail_scroll_offset.min(max_scroll);

    let title = format!(" Plans ({}) ", detail.plans.len());
    let plans_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(true))
        .title(Span::styled(title, theme::heading()));

    frame.render_widget(
        Paragraph::new(lines).block(plans_block).scroll((scroll, 0)),
        chunks[1],
    );
}

fn render_header(frame: &mut Frame, detail: &CountryDetail, area: Rect) {
    let country = &detail.country;
    let mut lines = vec![Line::from(vec![
        Span::styled(
            country.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", country.region), Style::default().fg(theme::MUTED)),
    ])];
    if !country.warnings.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("\u{26A0} {}", country.warnings), // ⚠
            Style::default().fg(theme::WARNING),
        )));
    } else if !country.description.is_empty() {
        lines.push(Line::from(Span::raw(country.description.clone())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(false));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Formats an amount with its uppercased currency code, e.g. "9.99 EUR"
pub fn format_price(amount: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("{:.2}", amount)
    } else {
        format!("{:.2} {}", amount, currency.to_uppercase())
    }
}

/// "1 day" or "N days"
fn validity_label(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Builds the plan cards, separated by blank lines
fn plan_lines(plans: &[CountryPlan]) -> Vec<Line<'static>> {
    if plans.is_empty() {
        return vec![Line::from(Span::styled(
            "No plans available",
            Style::default().fg(theme::MUTED),
        ))];
    }

    let mut lines = Vec::with_capacity(plans.len() * 4);
    for (index, plan) in plans.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }

        let mut price_spans = vec![Span::styled(
            format_price(plan.effective_price(), &plan.currency),
            Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD),
        )];
        if plan.is_on_sale() {
            price_spans.push(Span::raw(" "));
            price_spans.push(Span::styled(
                format_price(plan.price, &plan.currency),
                Style::default()
                    .fg(theme::MUTED)
                    .add_modifier(Modifier::CROSSED_OUT),
            ));
        }

        let mut title = vec![
            Span::styled(
                format!("{:<10}", plan.data_label()),
                Style::default().fg(theme::PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:<10}", validity_label(plan.days))),
        ];
        title.extend(price_spans);
        lines.push(Line::from(title));

        lines.push(Line::from(Span::raw(plan.name.clone())));

        let badges = plan.badges();
        if !badges.is_empty() {
            let spans: Vec<Span> = badges
                .into_iter()
                .map(|badge| {
                    Span::styled(
                        format!("[{}] ", badge),
                        Style::default().fg(theme::PRIMARY_LIGHT),
                    )
                })
                .collect();
            lines.push(Line::from(spans));
        }
    }
    lines
}
