pub mod color;
pub mod entry_form;
pub mod entry_list;
pub mod help;
pub mod stats_cards;
pub mod status_bar;
