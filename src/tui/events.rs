use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::time::Duration;
use crate::models::Mood;
use crate::storage::LocalStore;
use crate::tui::app::{FormField, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;

/// Restores the terminal when dropped, including during a panic, so a crash
/// never leaves the user's shell in raw mode or the alternate screen.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Restore explicitly on normal exit; drop then does nothing
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up, errors are ignored
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop<S: LocalStore>(mut app: App<S>) -> Result<(), TuiError> {
    // Check size before entering the alternate screen so the error is readable
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::debug!(width, height, "terminal ui started");

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect, app.draft.is_form_open());
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(Duration::from_millis(100))? {
            // Only Press events; Windows also reports Release
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event) {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    tracing::debug!("terminal ui stopped");

    Ok(())
}

/// Apply one key press to the app. Returns true when the user asked to quit.
pub fn handle_key_event<S: LocalStore>(app: &mut App<S>, key_event: KeyEvent) -> bool {
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.mode() {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Form => handle_form_mode(app, key_event),
        Mode::View => return handle_view_mode(app, key_event),
    }
    false
}

fn handle_help_mode<S: LocalStore>(app: &mut App<S>, key_event: KeyEvent) {
    if key_event.code == KeyCode::Esc || app.keys.help.matches(&key_event) {
        app.toggle_help();
    }
}

fn handle_view_mode<S: LocalStore>(app: &mut App<S>, key_event: KeyEvent) -> bool {
    let keys = &app.keys;
    if keys.quit.matches(&key_event) {
        return true;
    }
    if keys.new_entry.matches(&key_event) {
        app.toggle_form();
    } else if keys.help.matches(&key_event) {
        app.toggle_help();
    } else if keys.list_up.matches(&key_event) || key_event.code == KeyCode::Up {
        app.scroll_entries_up();
    } else if keys.list_down.matches(&key_event) || key_event.code == KeyCode::Down {
        app.scroll_entries_down();
    }
    false
}

fn handle_form_mode<S: LocalStore>(app: &mut App<S>, key_event: KeyEvent) {
    let keys = &app.keys;

    // Form-wide bindings take precedence over text entry
    if keys.save.matches(&key_event) {
        app.save_entry();
        return;
    }
    if keys.cancel.matches(&key_event) {
        app.cancel_form();
        return;
    }
    if keys.help.matches(&key_event) {
        app.toggle_help();
        return;
    }
    if keys.next_field.matches(&key_event) {
        app.next_field();
        return;
    }
    if keys.previous_field.matches(&key_event) {
        app.previous_field();
        return;
    }

    match app.ui.form_field {
        FormField::Mood => match key_event.code {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') => app.previous_mood(),
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') => app.next_mood(),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                if let Some(mood) = Mood::ALL.get(index) {
                    app.select_mood(*mood);
                }
            }
            KeyCode::Enter => app.next_field(),
            _ => {}
        },
        FormField::Notes => match key_event.code {
            KeyCode::Char(c) if is_text_input(&key_event) => app.push_notes_char(c),
            KeyCode::Enter => app.push_notes_char('\n'),
            KeyCode::Backspace => app.pop_notes_char(),
            _ => {}
        },
        FormField::GoalInput => match key_event.code {
            KeyCode::Char(c) if is_text_input(&key_event) => app.push_goal_input_char(c),
            KeyCode::Backspace => app.pop_goal_input_char(),
            KeyCode::Enter => app.add_goal_from_input(),
            _ => {}
        },
        FormField::Goals => {
            if app.keys.remove_goal.matches(&key_event) || key_event.code == KeyCode::Backspace {
                app.remove_selected_goal();
            } else {
                match key_event.code {
                    KeyCode::Up => app.select_goal_up(),
                    KeyCode::Down => app.select_goal_down(),
                    _ => {}
                }
            }
        }
    }
}

/// Plain or shifted characters only; unbound Ctrl/Alt chords are not text
fn is_text_input(key_event: &KeyEvent) -> bool {
    !key_event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryStore;
    use crate::storage::MemoryStore;
    use crate::Config;

    fn app() -> App<MemoryStore> {
        App::new(Config::default(), EntryStore::load(MemoryStore::new())).unwrap()
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn quit_from_view_but_not_while_typing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.draft.notes(), "q");

        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert!(handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn full_entry_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode(), Mode::Form);

        // Mood: Good -> Okay
        press(&mut app, KeyCode::Right);
        assert_eq!(app.draft.mood(), Mood::Okay);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.draft.mood(), Mood::Great);

        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ok day");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "walk");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "  walk ");
        press(&mut app, KeyCode::Enter);
        // rejected duplicate stays in the box
        assert_eq!(app.draft.goal_input(), "  walk ");
        for _ in 0..7 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "read");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.draft.goals(), ["walk".to_string(), "read".to_string()]);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.draft.goals(), ["walk".to_string()]);

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(app.mode(), Mode::View);
        let entry = &app.store.all()[0];
        assert_eq!(entry.mood, Mood::Great);
        assert_eq!(entry.notes, "ok day");
        assert_eq!(entry.goals, vec!["walk".to_string()]);
    }

    #[test]
    fn escape_keeps_draft_for_later() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "draft");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode(), Mode::View);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.draft.notes(), "draft");
        assert!(app.store.is_empty());
    }

    #[test]
    fn modifier_chords_are_not_typed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ok");
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(app.draft.notes(), "okA");

        press(&mut app, KeyCode::Tab);
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('w'), KeyModifiers::ALT));
        type_text(&mut app, "walk");
        assert_eq!(app.draft.goal_input(), "walk");
    }

    #[test]
    fn help_opens_and_closes() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode(), Mode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode(), Mode::View);
    }
}
