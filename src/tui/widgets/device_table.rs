use crate::distance::{distance_category, format_distance};
use crate::tui::app::App;
use crate::vendor::company_label;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

/// Render the Bluetooth device table, nearest device first
pub fn render_device_table(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .title(" Bluetooth Devices (nearest first) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    // Table header
    let header_cells = ["Address", "Name", "Vendor", "Signal", "Ref", "Distance", "Proximity"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    // Table rows
    let rows: Vec<Row> = app
        .devices
        .iter()
        .enumerate()
        .map(|(idx, device)| {
            let name_str = device.name.clone().unwrap_or_else(|| "Unknown".to_string());

            let signal_str = format!("{}dBm", device.rssi_dbm);

            let reference_str = device
                .reference_rssi_dbm
                .map(|p| format!("{}dBm", p))
                .unwrap_or_else(|| "N/A".to_string());

            let distance_str = format_distance(device.distance_m);

            // Color code signal
            let signal_color = if device.rssi_dbm >= -50 {
                Color::Green
            } else if device.rssi_dbm >= -70 {
                Color::Yellow
            } else {
                Color::Red
            };

            // Color code distance
            let distance_color = if device.distance_m < 3.0 {
                Color::Green
            } else if device.distance_m < 10.0 {
                Color::Yellow
            } else {
                Color::Red
            };

            let vendor = company_label(device.company_id);
            let vendor_color = if device.company_id.is_some() {
                Color::Green
            } else {
                Color::DarkGray
            };

            let cells = vec![
                Cell::from(device.address.clone()),
                Cell::from(truncate_str(&name_str, 18)),
                Cell::from(vendor).style(Style::default().fg(vendor_color)),
                Cell::from(signal_str).style(Style::default().fg(signal_color)),
                Cell::from(reference_str),
                Cell::from(distance_str).style(Style::default().fg(distance_color)),
                Cell::from(distance_category(device.distance_m)).style(Style::default().fg(Color::Cyan)),
            ];

            let style = if idx == app.selected_device && focused {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(cells).style(style).height(1)
        })
        .collect();

    let widths = [
        Constraint::Length(19),  // Address
        Constraint::Length(18),  // Name
        Constraint::Length(16),  // Vendor
        Constraint::Length(8),   // Signal
        Constraint::Length(7),   // Ref
        Constraint::Length(9),   // Distance
        Constraint::Min(12),     // Proximity (flexible)
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
        );

    // Create table state for selection
    let mut state = TableState::default();
    if !app.devices.is_empty() {
        state.select(Some(app.selected_device));
    }

    frame.render_stateful_widget(table, area, &mut state);

    // Show device count
    let count_str = format!(" {} devices ", app.devices.len());
    let count_len = count_str.len() as u16;
    let count_x = area.x + area.width.saturating_sub(count_len + 2);
    let count_y = area.y;

    if count_x > area.x {
        frame.render_widget(
            ratatui::widgets::Paragraph::new(count_str)
                .style(Style::default().fg(Color::DarkGray)),
            Rect::new(count_x, count_y, count_len, 1),
        );
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", prefix)
    }
}
