use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use crate::Config;
use crate::models::Entry;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

const EMPTY_TITLE: &str = "No entries yet";
const EMPTY_HINT: &str = "Start your recovery journey by adding your first entry!";

/// "Your Journey": committed entries, newest first
pub fn render_entry_list(
    f: &mut Frame,
    area: Rect,
    entries: &[Entry],
    list_state: &mut ListState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Your Journey")
        .style(Style::default().fg(fg_color).bg(bg_color));

    if entries.is_empty() {
        let text = vec![
            Line::from(Span::styled(EMPTY_TITLE, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(EMPTY_HINT),
        ];
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    // 2 for borders, 2 for the highlight symbol
    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(entry_lines(entry, max_width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}

/// Lines for one entry: headline and date, then notes and goals when present
pub fn entry_lines(entry: &Entry, max_width: usize) -> Vec<Line<'static>> {
    let mood_color = parse_color(entry.mood.color_name());
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} {}", entry.mood.symbol(), entry.headline()),
            Style::default().fg(mood_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(entry.long_date()),
    ])];

    for note_line in entry.notes.lines().filter(|l| !l.trim().is_empty()) {
        lines.push(Line::from(format!("  {}", truncate(note_line, max_width.saturating_sub(2)))));
    }

    if !entry.goals.is_empty() {
        let goals = entry
            .goals
            .iter()
            .map(|g| format!("[{}]", g))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(Line::from(format!("  Goals: {}", truncate(&goals, max_width.saturating_sub(9)))));
    }

    lines
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() > max_width {
        text.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;
    use chrono::NaiveDate;

    fn entry(notes: &str, goals: &[&str]) -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Mood::Okay,
            notes.to_string(),
            goals.iter().map(|g| g.to_string()).collect(),
        )
    }

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn bare_entry_is_one_line() {
        let lines = text(&entry_lines(&entry("", &[]), 80));
        assert_eq!(lines, vec![":| Okay Day  Monday, January 1, 2024".to_string()]);
    }

    #[test]
    fn notes_and_goals_follow_the_headline() {
        let lines = text(&entry_lines(&entry("first\n\nsecond", &["walk", "call mom"]), 80));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "  first");
        assert_eq!(lines[2], "  second");
        assert_eq!(lines[3], "  Goals: [walk] [call mom]");
    }

    #[test]
    fn long_notes_are_truncated() {
        let long = "x".repeat(100);
        let lines = text(&entry_lines(&entry(&long, &[]), 20));
        assert_eq!(lines[1].chars().count(), 2 + 18);
        assert!(lines[1].ends_with("..."));
    }
}
