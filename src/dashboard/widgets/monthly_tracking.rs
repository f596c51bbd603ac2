use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::property_grid::status_style;
use super::truncate;
use crate::api::RentApi;
use crate::dashboard::app::App;
use crate::derive::due_date;
use crate::formatters::{format_currency, format_date, format_optional_date, month_label};

/// Every property's record for the viewed month.
pub fn draw_monthly_tracking<A: RentApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let key = app.tracker.current_month();

    let rows: Vec<Row> = app
        .tracker
        .properties()
        .iter()
        .map(|property| {
            let record = app.tracker.rent_history().get(key, &property.id);
            let status = app.tracker.status(&property.id, key);

            // Without a stored expected date, show the derived due date dimmed.
            let expected = match record.and_then(|r| r.expected_date) {
                Some(date) => Cell::from(format_date(date)),
                None => Cell::from(due_date(property, key).map(format_date).unwrap_or_default())
                    .style(Style::default().fg(Color::DarkGray)),
            };
            let amount = record
                .and_then(|r| r.rent_amount)
                .unwrap_or(property.rent());

            Row::new(vec![
                Cell::from(truncate(&property.name, 24)),
                Cell::from(truncate(&property.renter_name, 18)),
                Cell::from(format_currency(amount)),
                expected,
                Cell::from(format_optional_date(record.and_then(|r| r.received_date))),
                Cell::from(
                    record
                        .and_then(|r| r.payment_mode.clone())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(status.label()).style(status_style(status)),
            ])
        })
        .collect();

    let header = Row::new(vec![
        "Property", "Renter", "Amount", "Expected", "Received", "Mode", "Status",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(18),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(14),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(" Monthly Tracking - {} ", month_label(key)))
            .borders(Borders::ALL),
    )
    .highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !app.tracker.properties().is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut state);
}
