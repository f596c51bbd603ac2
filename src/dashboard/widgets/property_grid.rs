use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::truncate;
use crate::api::RentApi;
use crate::dashboard::app::App;
use crate::derive::RentStatus;
use crate::formatters::{format_currency, format_ordinal};

pub fn status_style(status: RentStatus) -> Style {
    match status {
        RentStatus::Received => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        RentStatus::Pending => Style::default().fg(Color::Yellow),
    }
}

pub fn draw_property_grid<A: RentApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let block = Block::default()
        .title(format!(" Properties ({}) ", app.tracker.properties().len()))
        .borders(Borders::ALL);

    if app.tracker.properties().is_empty() {
        let empty = Paragraph::new("No properties yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let key = app.tracker.current_month();
    let rows: Vec<Row> = app
        .tracker
        .properties()
        .iter()
        .map(|property| {
            let status = app.tracker.status(&property.id, key);
            Row::new(vec![
                Cell::from(truncate(&property.name, 24)),
                Cell::from(truncate(&property.renter_name, 18)),
                Cell::from(truncate(&property.address, 28)),
                Cell::from(format_currency(property.rent())).style(Style::default().fg(Color::Green)),
                Cell::from(format_ordinal(property.expected_rent_date)),
                Cell::from(status.label()).style(status_style(status)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Property", "Renter", "Address", "Rent", "Due", "Status"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(18),
            Constraint::Min(12),
            Constraint::Length(11),
            Constraint::Length(5),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}
