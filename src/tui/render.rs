use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use crate::storage::LocalStore;
use crate::tui::app::Mode;
use crate::tui::{App, Layout};
use crate::tui::widgets::{
    color::parse_color,
    entry_form::render_entry_form,
    entry_list::render_entry_list,
    help::render_help,
    stats_cards::render_stats_cards,
    status_bar::render_status_bar,
};
use crate::utils::format_key_binding_for_display as display;

pub fn render<S: LocalStore>(f: &mut Frame, app: &mut App<S>, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Recovery Tracker")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    let stats = app.stats();
    render_stats_cards(f, layout.stats_area, &stats, &app.config);

    if app.draft.is_form_open() {
        render_entry_form(
            f,
            layout.form_area,
            &app.draft,
            app.ui.form_field,
            app.ui.selected_goal,
            &app.config,
        );
    }

    render_entry_list(f, layout.entries_area, app.store.all(), &mut app.ui.list_state, &app.config);

    // Popup overlays go after normal content
    if app.mode() == Mode::Help {
        render_help(f, f.area(), &app.config);
    }

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &app.config);
}

pub fn get_key_hints<S: LocalStore>(app: &App<S>) -> Vec<String> {
    let keys = &app.config.key_bindings;
    match app.mode() {
        Mode::Help => vec![format!("Esc or {}: Exit help", display(&keys.help))],
        Mode::Form => vec![
            format!("{}: Save", display(&keys.save)),
            format!("{}: Close", display(&keys.cancel)),
            format!("{}/{}: Next/previous field", display(&keys.next_field), display(&keys.previous_field)),
            "Left/Right: Mood".to_string(),
            "Enter: Add goal".to_string(),
            format!("{}: Remove goal", display(&keys.remove_goal)),
            format!("{}: Help", display(&keys.help)),
        ],
        Mode::View => vec![
            format!("{}: Quit", display(&keys.quit)),
            format!("{}: Add today's entry", display(&keys.new_entry)),
            format!("{}/{}: Scroll", display(&keys.list_up), display(&keys.list_down)),
            format!("{}: Help", display(&keys.help)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryStore;
    use crate::storage::MemoryStore;
    use crate::Config;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    fn app() -> App<MemoryStore> {
        App::new(Config::default(), EntryStore::load(MemoryStore::new())).unwrap()
    }

    fn draw(app: &mut App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|f| {
                let layout = Layout::calculate(Rect::new(0, 0, 80, 30), app.draft.is_form_open());
                render(f, app, &layout);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(80)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_journal_shows_stats_and_empty_state() {
        let mut app = app();
        let screen = draw(&mut app);
        assert!(screen.contains("Recovery Tracker"));
        assert!(screen.contains("0 Total Entries"));
        assert!(screen.contains("0 Day Streak"));
        assert!(screen.contains("No entries yet"));
    }

    #[test]
    fn open_form_and_saved_entry_are_drawn() {
        let mut app = app();
        app.toggle_form();
        let screen = draw(&mut app);
        assert!(screen.contains("How are you feeling today?"));
        assert!(screen.contains("Select your mood"));

        app.select_mood(crate::models::Mood::Great);
        app.save_entry();
        let screen = draw(&mut app);
        assert!(!screen.contains("How are you feeling today?"));
        assert!(screen.contains("Great Day"));
        assert!(screen.contains("1 Day Streak"));
    }

    #[test]
    fn hints_follow_mode() {
        let mut app = app();
        assert!(get_key_hints(&app)[0].contains("Quit"));
        app.toggle_form();
        assert!(get_key_hints(&app)[0].contains("Save"));
        app.toggle_help();
        assert!(get_key_hints(&app)[0].contains("Exit help"));
    }
}
