pub mod device_table;
pub mod help_overlay;
pub mod network_list;
pub mod stats_panel;
pub mod status_bar;
