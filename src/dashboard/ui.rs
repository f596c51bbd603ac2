use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{App, View};
use super::widgets::{
    activity_feed::draw_activity_feed, modal::draw_modal, monthly_tracking::draw_monthly_tracking,
    notification::draw_notification, property_grid::draw_property_grid,
    records_table::draw_records_table, summary_bar::draw_summary_bar,
};
use crate::api::RentApi;
use crate::formatters::month_label;

pub fn draw<A: RentApi>(f: &mut Frame, app: &App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Header
                Constraint::Length(3), // Summary
                Constraint::Min(8),    // Main content
                Constraint::Length(2), // Help
            ]
            .as_ref(),
        )
        .split(f.size());

    draw_header(f, chunks[0], app);
    draw_summary_bar(f, chunks[1], &app.tracker.summary());
    draw_main_content(f, chunks[2], app);
    draw_help(f, chunks[3], app.view);

    if let Some(notice) = app.tracker.notifications().latest() {
        draw_notification(f, chunks[0], notice);
    }
    if let Some(modal) = &app.modal {
        draw_modal(f, modal);
    }
}

fn draw_header<A: RentApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let last_update = app
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut header_text = vec![
        Span::styled(
            app.view.title(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw("◀ "),
        Span::styled(
            month_label(app.tracker.current_month()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ▶ | Server: "),
        Span::raw(app.server_url.as_str()),
        Span::raw(" | Last Update: "),
        Span::raw(last_update),
    ];
    if app.busy {
        header_text.push(Span::styled(
            " | Working...",
            Style::default().fg(Color::Magenta),
        ));
    }

    let header = Paragraph::new(Line::from(header_text))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .title(" Rent Tracker ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(header, area);
}

fn draw_main_content<A: RentApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    match app.view {
        View::Properties => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(
                    [
                        Constraint::Percentage(65), // Property grid
                        Constraint::Percentage(35), // Activity
                    ]
                    .as_ref(),
                )
                .split(area);

            let now = Utc::now();
            draw_property_grid(f, chunks[0], app);
            draw_activity_feed(f, chunks[1], &app.tracker.recent_activity(now), now);
        }
        View::Monthly => draw_monthly_tracking(f, area, app),
        View::Records => draw_records_table(f, area, &app.records, app.records_scroll),
    }
}

fn key(k: &str) -> Span<'_> {
    Span::styled(k, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
}

fn draw_help(f: &mut Frame, area: Rect, view: View) {
    let mut help_text = vec![
        Span::raw("["),
        key("q"),
        Span::raw("]uit ["),
        key("Tab"),
        Span::raw("] view ["),
        key("←→"),
        Span::raw("] month ["),
        key("↑↓"),
        Span::raw("] select ["),
        key("r"),
        Span::raw("]eload"),
    ];
    if view != View::Records {
        help_text.extend([
            Span::raw(" ["),
            key("a"),
            Span::raw("]dd ["),
            key("e"),
            Span::raw("]dit ["),
            key("d"),
            Span::raw("]elete ["),
            key("space"),
            Span::raw("] toggle ["),
            key("Enter"),
            Span::raw(if view == View::Monthly { "] details" } else { "] collect" }),
        ]);
    }
    help_text.extend([
        Span::raw(" ["),
        key("x"),
        Span::raw("/"),
        key("X"),
        Span::raw("] export ["),
        key("?"),
        Span::raw("] help"),
    ]);

    let help = Paragraph::new(Line::from(help_text))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockRentApi;
    use crate::dashboard::app::tests::app_with;
    use crate::dashboard::app::Modal;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App<MockRentApi>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App<MockRentApi> {
        app_with(MockRentApi::new())
    }

    #[test]
    fn test_properties_view_shows_grid_and_totals() {
        let screen = render(&app());
        assert!(screen.contains("March 2024"));
        assert!(screen.contains("Maple"));
        assert!(screen.contains("Oak"));
        assert!(screen.contains("$1500.00"));
        assert!(screen.contains("66.7%"));
    }

    #[test]
    fn test_modal_is_drawn_on_top() {
        let mut app = app();
        app.modal = Some(Modal::Help);
        assert!(render(&app).contains("Keyboard"));
    }

    #[test]
    fn test_error_banner_is_drawn() {
        let mut app = app();
        app.tracker
            .notifications_mut()
            .error("Failed to load data from server");
        assert!(render(&app).contains("Failed to load data from server"));
    }
}
