use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use crate::Config;
use crate::stats::Stats;
use crate::tui::widgets::color::parse_color;

/// Three side-by-side cards: Total Entries, Day Streak, Good Days
pub fn render_stats_cards(f: &mut Frame, area: Rect, stats: &Stats, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);

    let cards = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    let values = [
        ("Total Entries", stats.total_entries),
        ("Day Streak", stats.current_streak),
        ("Good Days", stats.good_days),
    ];

    for ((label, value), card_area) in values.into_iter().zip(cards.iter()) {
        let line = Line::from(vec![
            Span::styled(
                value.to_string(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(label, Style::default().fg(fg_color)),
        ]);
        let paragraph = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(fg_color).bg(bg_color));
        f.render_widget(paragraph, *card_area);
    }
}
