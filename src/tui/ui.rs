use crate::tui::app::{ActivePanel, App};
use crate::tui::widgets::{
    device_table::render_device_table, help_overlay::render_help, network_list::render_network_list,
    stats_panel::render_stats, status_bar::render_status_bar,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Main draw function for the TUI
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Main layout: Header, Content, Status Bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Content
            Constraint::Length(3),  // Status bar
        ])
        .split(size);

    // Draw header
    draw_header(frame, main_chunks[0]);

    // Content layout: Top section (networks + stats) and Bottom section (device table)
    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40), // Top: Networks + Stats
            Constraint::Percentage(60), // Bottom: Device table
        ])
        .split(main_chunks[1]);

    // Top section: Network list (70%) + Stats (30%)
    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // Network list
            Constraint::Percentage(30), // Stats
        ])
        .split(content_chunks[0]);

    // Draw network list
    let networks_focused = app.active_panel == ActivePanel::Networks;
    render_network_list(frame, top_chunks[0], app, networks_focused);

    // Draw stats panel
    render_stats(frame, top_chunks[1], app);

    // Draw device table
    let table_focused = app.active_panel == ActivePanel::Devices;
    render_device_table(frame, content_chunks[1], app, table_focused);

    // Draw status bar
    render_status_bar(frame, main_chunks[2], app);

    // Draw help overlay if active
    if app.show_help {
        render_help(frame, size);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let title = vec![
        Span::styled(
            " NEARSCAN ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            "Nearby Network & Bluetooth Scanner",
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            "[?] Help  [q] Quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(Line::from(title))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}
