use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use super::property_grid::status_style;
use super::truncate;
use crate::derive::RecordRow;
use crate::formatters::{format_currency, format_optional_date, month_label};

pub fn draw_records_table(f: &mut Frame, area: Rect, records: &[RecordRow], scroll: usize) {
    let visible = area.height.saturating_sub(3) as usize; // Borders and header

    let rows: Vec<Row> = records
        .iter()
        .skip(scroll)
        .take(visible)
        .map(|row| {
            let late = row
                .days_late
                .map(|d| Cell::from(format!("{}d late", d)).style(Style::default().fg(Color::Red)))
                .unwrap_or_else(|| Cell::from(""));
            Row::new(vec![
                Cell::from(truncate(&row.property_name, 24)),
                Cell::from(truncate(&row.renter_name, 18)),
                Cell::from(month_label(row.month)),
                Cell::from(format_currency(row.amount)),
                Cell::from(row.status.label()).style(status_style(row.status)),
                Cell::from(format_optional_date(row.received_date)),
                Cell::from(row.payment_mode.clone().unwrap_or_else(|| "-".to_string())),
                late,
            ])
        })
        .collect();

    let header = Row::new(vec![
        "Property", "Renter", "Month", "Amount", "Status", "Received", "Mode", "",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let title = if records.is_empty() {
        " Rent Records (none) ".to_string()
    } else {
        format!(
            " Rent Records {}-{} of {} ",
            scroll + 1,
            (scroll + visible).min(records.len()),
            records.len()
        )
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(18),
            Constraint::Length(15),
            Constraint::Length(11),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(14),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL));

    f.render_widget(table, area);
}
