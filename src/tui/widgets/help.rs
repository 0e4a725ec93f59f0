use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display as display;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Help - Key Bindings")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

/// Centered rect using a percentage of the available area
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub fn build_help_text(config: &Config) -> String {
    let keys = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Journal:\n");
    text.push_str(&format!("  {}: Add today's entry (show/hide form)\n", display(&keys.new_entry)));
    text.push_str(&format!("  {} / {}: Scroll entries\n", display(&keys.list_up), display(&keys.list_down)));
    text.push('\n');

    text.push_str("Entry form:\n");
    text.push_str(&format!("  {} / {}: Next / previous field\n", display(&keys.next_field), display(&keys.previous_field)));
    text.push_str("  Left / Right or 1-4: Choose mood\n");
    text.push_str("  Enter in goal box: Add goal\n");
    text.push_str(&format!("  {}: Remove selected goal\n", display(&keys.remove_goal)));
    text.push_str(&format!("  {}: Save entry\n", display(&keys.save)));
    text.push_str(&format!("  {}: Close form (keeps what you typed)\n", display(&keys.cancel)));
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", display(&keys.quit)));
    text.push_str("  Ctrl+c: Quit from anywhere\n");
    text.push_str(&format!("  {}: Show/hide help\n", display(&keys.help)));

    text
}
