use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::derive::MonthSummary;
use crate::formatters::{format_currency, format_rate, month_label};

pub fn draw_summary_bar(f: &mut Frame, area: Rect, summary: &MonthSummary) {
    let rate_color = match summary.collection_rate {
        r if r >= 90.0 => Color::Green,
        r if r >= 50.0 => Color::Yellow,
        _ => Color::Red,
    };

    let spans = vec![
        Span::raw("Properties: "),
        Span::styled(
            summary.total_properties.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ Expected: "),
        Span::styled(format_currency(summary.expected), Style::default().fg(Color::Cyan)),
        Span::raw(" │ Collected: "),
        Span::styled(
            format_currency(summary.collected),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ Pending: "),
        Span::styled(format_currency(summary.pending), Style::default().fg(Color::Yellow)),
        Span::raw(" │ Rate: "),
        Span::styled(
            format_rate(summary.collection_rate),
            Style::default().fg(rate_color).add_modifier(Modifier::BOLD),
        ),
    ];

    let bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .title(format!(" {} Summary ", month_label(summary.month)))
                .borders(Borders::ALL),
        )
        .alignment(Alignment::Center);

    f.render_widget(bar, area);
}
