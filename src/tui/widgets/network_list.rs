use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the Wi-Fi network list panel
pub fn render_network_list(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .title(" Wi-Fi Networks ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.networks.is_empty() {
        let placeholder = if app.wifi_enabled {
            "No networks seen yet"
        } else {
            "Wi-Fi scanning disabled (see config.json)"
        };
        let items = vec![ListItem::new(Line::from(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        )))];
        frame.render_widget(List::new(items).block(block), area);
        return;
    }

    let inner_height = area.height.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .networks
        .iter()
        .skip(app.network_scroll)
        .take(inner_height)
        .map(|network| {
            let ssid_display = if network.ssid.is_empty() {
                "<hidden>"
            } else {
                &network.ssid
            };

            let bssid_str = network
                .bssid
                .map(|b| b.to_string())
                .unwrap_or_else(|| "?".to_string());

            // Color code signal strength
            let signal_color = if network.signal_dbm >= -50 {
                Color::Green
            } else if network.signal_dbm >= -70 {
                Color::Yellow
            } else {
                Color::Red
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<24}", ssid_display), Style::default().fg(Color::White)),
                Span::raw(" "),
                Span::styled(format!("{:<17}", bssid_str), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(
                    format!("{:>4}dBm", network.signal_dbm),
                    Style::default().fg(signal_color),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
