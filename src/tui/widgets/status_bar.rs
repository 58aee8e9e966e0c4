use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar at the bottom. A transient notice takes over the
/// whole bar while it is live.
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if let Some(notice) = &app.notice {
        let notice_line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("! {}", notice.text),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(notice_line).block(block), area);
        return;
    }

    // Scan status
    let scan_status = if app.scan_active {
        Span::styled(
            "Scan: ACTIVE",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "Scan: STOPPED",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
    };

    // Device count
    let device_status = Span::styled(
        format!("Devices: {}", app.stats.visible_devices),
        Style::default().fg(Color::Cyan),
    );

    // Wall clock
    let clock = chrono::Local::now().format("%H:%M:%S").to_string();
    let clock_status = Span::styled(clock, Style::default().fg(Color::DarkGray));

    // Uptime
    let uptime = format_duration(app.stats.scan_duration_secs);
    let uptime_status = Span::styled(
        format!("Uptime: {}", uptime),
        Style::default().fg(Color::DarkGray),
    );

    let status_line = Line::from(vec![
        Span::raw(" "),
        scan_status,
        Span::raw("  │  "),
        device_status,
        Span::raw("  │  "),
        clock_status,
        Span::raw("  │  "),
        uptime_status,
    ]);

    let paragraph = Paragraph::new(status_line).block(block);

    frame.render_widget(paragraph, area);
}

fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
