use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::truncate;
use crate::notify::{NoticeKind, Notification};

/// Draws the newest banner over `area`.
pub fn draw_notification(f: &mut Frame, area: Rect, notice: &Notification) {
    let (title, color) = match notice.kind {
        NoticeKind::Success => (" Success ", Color::Green),
        NoticeKind::Error => (" Error (Esc to dismiss) ", Color::Red),
    };
    let text = truncate(&notice.message, area.width.saturating_sub(4) as usize);

    let banner = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    f.render_widget(Clear, area);
    f.render_widget(banner, area);
}
