use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::dashboard::app::Modal;
use crate::dashboard::forms::{FieldKind, FormState};
use crate::formatters::{format_currency, format_optional_date, month_label};
use crate::tracker::{RentDetails, DELETE_CONFIRMATION};

const MODAL_WIDTH: u16 = 64;

pub fn draw_modal(f: &mut Frame, modal: &Modal) {
    let area = f.size();
    match modal {
        Modal::AddProperty(form) | Modal::EditProperty { form, .. } => {
            draw_form(f, area, form, Vec::new());
        }
        Modal::RentDetails { details, form } => {
            let info = vec![Line::from(format!(
                "{} - {}",
                month_label(details.month),
                format_currency(details.amount())
            ))];
            draw_form(f, area, form, info);
        }
        Modal::Collect { collection, form } => {
            let info = vec![
                Line::from(vec![
                    Span::raw("Rent Amount: "),
                    Span::styled(
                        format_currency(collection.amount),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(format!(
                    "Month: {}   Expected Date: {}",
                    month_label(collection.month),
                    format_optional_date(collection.due_date)
                )),
            ];
            draw_form(f, area, form, info);
        }
        Modal::ConfirmDelete { name, .. } => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Delete {}?", name),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(DELETE_CONFIRMATION),
                Line::from(""),
                Line::from(Span::styled("[y] Delete   [n] Cancel", Style::default().fg(Color::Yellow))),
            ];
            draw_box(f, area, " Confirm Delete ", Color::Red, lines);
        }
        Modal::Receipt(details) => draw_box(f, area, " Rent Payment Details ", Color::Green, receipt_lines(details)),
        Modal::Help => draw_box(f, area, " Keyboard ", Color::Cyan, help_lines()),
    }
}

fn receipt_lines(details: &RentDetails) -> Vec<Line<'static>> {
    let record = &details.record;
    let mut lines = vec![
        Line::from(Span::styled(
            "Rent Received",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Property: {}", details.property.name)),
        Line::from(format!("Renter: {}", details.property.renter_name)),
        Line::from(format!("Month: {}", month_label(details.month))),
        Line::from(format!("Amount: {}", format_currency(details.amount()))),
        Line::from(format!("Received Date: {}", format_optional_date(record.received_date))),
    ];
    if let Some(mode) = &record.payment_mode {
        lines.push(Line::from(format!("Payment Mode: {}", mode)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn help_lines() -> Vec<Line<'static>> {
    [
        ("Tab / 1 2 3", "switch view"),
        ("← → / [ ]", "previous / next month"),
        ("↑ ↓ / k j", "move selection"),
        ("a", "add property"),
        ("e", "edit selected property"),
        ("d", "delete selected property"),
        ("space / t", "toggle received for the month"),
        ("Enter / c", "record payment (details in monthly view)"),
        ("r", "reload from server"),
        ("x / X", "export JSON backup / spreadsheet"),
        ("Esc", "dismiss banner or close dialog"),
        ("q", "quit"),
    ]
    .into_iter()
    .map(|(keys, action)| {
        Line::from(vec![
            Span::styled(
                format!("{:<14}", keys),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(action),
        ])
    })
    .collect()
}

fn draw_box(f: &mut Frame, area: Rect, title: &str, color: Color, lines: Vec<Line>) {
    let height = lines.len() as u16 + 4;
    let rect = centered_rect(MODAL_WIDTH, height, area);
    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
}

fn draw_form(f: &mut Frame, area: Rect, form: &FormState, mut lines: Vec<Line>) {
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let value = match field.kind {
            FieldKind::Checkbox => (if field.checked { "[x]" } else { "[ ]" }).to_string(),
            FieldKind::Text if focused => format!("{}_", field.value),
            FieldKind::Text => field.value.clone(),
        };

        let mut spans = vec![
            Span::styled(if focused { "▶ " } else { "  " }, label_style),
            Span::styled(format!("{:<18}", field.label), label_style),
            Span::raw(value),
        ];
        if field.value.is_empty() && field.kind == FieldKind::Text {
            spans.push(Span::styled(
                format!("  ({})", field.hint),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(
        "[Enter] Save   [Tab] Next field   [Esc] Cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let title = format!(" {} ", form.title);
    draw_box(f, area, &title, Color::Cyan, lines);
}
