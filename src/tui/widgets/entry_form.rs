use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use crate::Config;
use crate::draft::Draft;
use crate::models::Mood;
use crate::tui::app::FormField;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// The "How are you feeling today?" form backed by the draft
pub fn render_entry_form(
    f: &mut Frame,
    area: Rect,
    draft: &Draft,
    current_field: FormField,
    selected_goal: usize,
    config: &Config,
) {
    if area.height == 0 {
        return;
    }

    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title("How are you feeling today?")
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let [mood_area, notes_area, goal_input_area, goals_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(goals_height(draft)),
    ])
    .areas(inner);

    let field_block = |title: &'static str, field: FormField| {
        let border_style = if field == current_field {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color)
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style)
    };

    // Mood selector
    let mut mood_spans = Vec::new();
    for (i, mood) in Mood::ALL.iter().enumerate() {
        if i > 0 {
            mood_spans.push(Span::raw("  "));
        }
        let label = format!(" {} {} ", mood.symbol(), mood.label());
        let style = if *mood == draft.mood() {
            Style::default().fg(highlight_fg).bg(highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(parse_color(mood.color_name()))
        };
        mood_spans.push(Span::styled(label, style));
    }
    let moods = Paragraph::new(Line::from(mood_spans))
        .block(field_block("Select your mood", FormField::Mood));
    f.render_widget(moods, mood_area);

    // Notes
    let notes = Paragraph::new(draft.notes().to_string())
        .wrap(Wrap { trim: false })
        .block(field_block("Notes (optional)", FormField::Notes));
    f.render_widget(notes, notes_area);

    // Goal input
    let goal_input = Paragraph::new(draft.goal_input().to_string())
        .block(field_block("Add a goal for today (Enter to add)", FormField::GoalInput));
    f.render_widget(goal_input, goal_input_area);

    // Goals list
    let goals_block = field_block("Today's Goals", FormField::Goals);
    if draft.goals().is_empty() {
        let empty = Paragraph::new("No goals yet").block(goals_block);
        f.render_widget(empty, goals_area);
    } else {
        let items: Vec<ListItem> = draft
            .goals()
            .iter()
            .map(|g| ListItem::new(format!("* {}", g)))
            .collect();
        let mut state = ListState::default();
        if current_field == FormField::Goals {
            state.select(Some(selected_goal.min(draft.goals().len() - 1)));
        }
        let list = List::new(items)
            .block(goals_block)
            .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));
        f.render_stateful_widget(list, goals_area, &mut state);
    }

    if let Some(position) = cursor_position(draft, current_field, notes_area, goal_input_area) {
        f.set_cursor_position(position);
    }
}

/// Goals list height: one line per goal plus borders, between 3 and 6 lines
fn goals_height(draft: &Draft) -> u16 {
    let lines = u16::try_from(draft.goals().len()).unwrap_or(u16::MAX).max(1);
    lines.saturating_add(2).min(6)
}

/// Cursor for the text field being edited, at the end of its text
fn cursor_position(
    draft: &Draft,
    current_field: FormField,
    notes_area: Rect,
    goal_input_area: Rect,
) -> Option<Position> {
    let (area, text) = match current_field {
        FormField::Notes => (notes_area, draft.notes()),
        FormField::GoalInput => (goal_input_area, draft.goal_input()),
        _ => return None,
    };
    let content_width = area.width.saturating_sub(2).max(1) as usize;
    let content_height = area.height.saturating_sub(2) as usize;
    if content_height == 0 {
        return None;
    }

    // Approximate wrapped position: hard line breaks plus character wrapping
    let mut row = 0usize;
    let mut col = 0usize;
    for line in text.split('\n') {
        let len = line.chars().count();
        row += len / content_width;
        col = len % content_width;
        row += 1;
    }
    row = row.saturating_sub(1).min(content_height - 1);

    let x = area.x + 1 + u16::try_from(col).unwrap_or(0);
    let y = area.y + 1 + u16::try_from(row).unwrap_or(0);
    Some(Position::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 0, 12, 5)
    }

    #[test]
    fn goals_height_is_bounded() {
        let mut draft = Draft::new();
        assert_eq!(goals_height(&draft), 3);
        for i in 0..10 {
            draft.add_goal(&format!("goal {i}"));
        }
        assert_eq!(goals_height(&draft), 6);
    }

    #[test]
    fn cursor_tracks_end_of_notes() {
        let mut draft = Draft::new();
        draft.set_notes("abc");
        assert_eq!(
            cursor_position(&draft, FormField::Notes, area(), area()),
            Some(Position::new(4, 1))
        );

        draft.set_notes("abc\nde");
        assert_eq!(
            cursor_position(&draft, FormField::Notes, area(), area()),
            Some(Position::new(3, 2))
        );
    }

    #[test]
    fn no_cursor_on_selector_fields() {
        let draft = Draft::new();
        assert_eq!(cursor_position(&draft, FormField::Mood, area(), area()), None);
        assert_eq!(cursor_position(&draft, FormField::Goals, area(), area()), None);
    }
}
