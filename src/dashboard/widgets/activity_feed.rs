use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use super::truncate;
use crate::derive::{Activity, ActivityKind};
use crate::formatters::format_relative_date;

pub fn draw_activity_feed(f: &mut Frame, area: Rect, activities: &[Activity], now: DateTime<Utc>) {
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = if activities.is_empty() {
        vec![ListItem::new(Span::styled(
            "No recent activity",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        activities
            .iter()
            .map(|activity| {
                let (marker, color) = match activity.kind {
                    ActivityKind::PropertyAdded => ("+ ", Color::Cyan),
                    ActivityKind::RentReceived => ("$ ", Color::Green),
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                        Span::raw(truncate(&activity.message, width.saturating_sub(2))),
                    ]),
                    Line::from(Span::styled(
                        format!("  {}", format_relative_date(activity.date, now)),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect()
    };

    let feed = List::new(items).block(
        Block::default()
            .title(" Recent Activity ")
            .borders(Borders::ALL),
    );

    f.render_widget(feed, area);
}
