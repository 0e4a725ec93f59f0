use crate::config::KeyBindings;
use crate::draft::Draft;
use crate::entries::EntryStore;
use crate::models::Mood;
use crate::stats::Stats;
use crate::storage::LocalStore;
use crate::tui::error::TuiError;
use crate::utils::{self, ParsedKeyBinding, parse_key_binding};
use crate::Config;
use ratatui::widgets::ListState;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Form,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Mood,
    Notes,
    GoalInput,
    Goals,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match self {
            FormField::Mood => FormField::Notes,
            FormField::Notes => FormField::GoalInput,
            FormField::GoalInput => FormField::Goals,
            FormField::Goals => FormField::Mood,
        }
    }

    pub fn previous(&self) -> FormField {
        match self {
            FormField::Mood => FormField::Goals,
            FormField::Notes => FormField::Mood,
            FormField::GoalInput => FormField::Notes,
            FormField::Goals => FormField::GoalInput,
        }
    }
}

/// Key bindings from config, parsed once at startup
#[derive(Debug, Clone)]
pub struct Keys {
    pub quit: ParsedKeyBinding,
    pub new_entry: ParsedKeyBinding,
    pub save: ParsedKeyBinding,
    pub cancel: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
    pub next_field: ParsedKeyBinding,
    pub previous_field: ParsedKeyBinding,
    pub list_up: ParsedKeyBinding,
    pub list_down: ParsedKeyBinding,
    pub remove_goal: ParsedKeyBinding,
}

impl Keys {
    pub fn from_config(bindings: &KeyBindings) -> Result<Self, TuiError> {
        let parse = |name: &str, value: &str| {
            parse_key_binding(value)
                .map_err(|e| TuiError::KeyBindingError(format!("{}: {}", name, e)))
        };
        Ok(Self {
            quit: parse("quit", &bindings.quit)?,
            new_entry: parse("new_entry", &bindings.new_entry)?,
            save: parse("save", &bindings.save)?,
            cancel: parse("cancel", &bindings.cancel)?,
            help: parse("help", &bindings.help)?,
            next_field: parse("next_field", &bindings.next_field)?,
            previous_field: parse("previous_field", &bindings.previous_field)?,
            list_up: parse("list_up", &bindings.list_up)?,
            list_down: parse("list_down", &bindings.list_down)?,
            remove_goal: parse("remove_goal", &bindings.remove_goal)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub show_help: bool,
    pub form_field: FormField,
    pub selected_goal: usize,
    pub list_state: ListState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_help: false,
            form_field: FormField::Mood,
            selected_goal: 0,
            list_state: ListState::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

/// Everything the terminal UI shows, plus the two pieces of state it mutates:
/// the entry store and the draft behind the entry form.
pub struct App<S: LocalStore> {
    pub config: Config,
    pub keys: Keys,
    pub store: EntryStore<S>,
    pub draft: Draft,
    pub ui: UiState,
    pub status: StatusState,
}

impl<S: LocalStore> App<S> {
    pub fn new(config: Config, store: EntryStore<S>) -> Result<Self, TuiError> {
        let keys = Keys::from_config(&config.key_bindings)?;
        let mut app = Self {
            config,
            keys,
            store,
            draft: Draft::new(),
            ui: UiState::default(),
            status: StatusState::default(),
        };
        if !app.store.is_empty() {
            app.ui.list_state.select(Some(0));
        }
        Ok(app)
    }

    pub fn mode(&self) -> Mode {
        if self.ui.show_help {
            Mode::Help
        } else if self.draft.is_form_open() {
            Mode::Form
        } else {
            Mode::View
        }
    }

    pub fn stats(&self) -> Stats {
        Stats::compute(self.store.all(), utils::today())
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.ui.show_help = !self.ui.show_help;
    }

    /// Show or hide the entry form, starting at the mood selector
    pub fn toggle_form(&mut self) {
        self.draft.toggle_form();
        if self.draft.is_form_open() {
            self.ui.form_field = FormField::Mood;
        }
    }

    pub fn cancel_form(&mut self) {
        self.draft.cancel();
    }

    pub fn next_field(&mut self) {
        self.ui.form_field = self.ui.form_field.next();
    }

    pub fn previous_field(&mut self) {
        self.ui.form_field = self.ui.form_field.previous();
    }

    pub fn next_mood(&mut self) {
        self.draft.set_mood(self.draft.mood().next());
    }

    pub fn previous_mood(&mut self) {
        self.draft.set_mood(self.draft.mood().previous());
    }

    pub fn select_mood(&mut self, mood: Mood) {
        self.draft.set_mood(mood);
    }

    pub fn push_notes_char(&mut self, ch: char) {
        let mut notes = self.draft.notes().to_string();
        notes.push(ch);
        self.draft.set_notes(notes);
    }

    pub fn pop_notes_char(&mut self) {
        let mut notes = self.draft.notes().to_string();
        notes.pop();
        self.draft.set_notes(notes);
    }

    pub fn push_goal_input_char(&mut self, ch: char) {
        let mut input = self.draft.goal_input().to_string();
        input.push(ch);
        self.draft.set_goal_input(input);
    }

    pub fn pop_goal_input_char(&mut self) {
        let mut input = self.draft.goal_input().to_string();
        input.pop();
        self.draft.set_goal_input(input);
    }

    pub fn add_goal_from_input(&mut self) {
        if self.draft.add_goal_from_input() {
            self.ui.selected_goal = self.draft.goals().len().saturating_sub(1);
        } else if !self.draft.goal_input().trim().is_empty() {
            self.set_status_message("Goal already added".to_string());
        }
    }

    pub fn select_goal_up(&mut self) {
        self.ui.selected_goal = self.ui.selected_goal.saturating_sub(1);
    }

    pub fn select_goal_down(&mut self) {
        let last = self.draft.goals().len().saturating_sub(1);
        self.ui.selected_goal = (self.ui.selected_goal + 1).min(last);
    }

    pub fn remove_selected_goal(&mut self) {
        let Some(goal) = self.draft.goals().get(self.ui.selected_goal).cloned() else {
            return;
        };
        self.draft.remove_goal(&goal);
        let last = self.draft.goals().len().saturating_sub(1);
        self.ui.selected_goal = self.ui.selected_goal.min(last);
    }

    /// Commit the draft as today's entry and jump the list to it
    pub fn save_entry(&mut self) {
        match self.draft.commit(&mut self.store) {
            Ok(_) => self.set_status_message("Entry saved".to_string()),
            Err(e) => {
                tracing::error!(error = %e, "failed to persist entry");
                self.set_status_message(format!("Entry kept for this session but not saved: {}", e));
            }
        }
        self.ui.selected_goal = 0;
        self.ui.list_state.select(Some(0));
    }

    pub fn scroll_entries_up(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let current = self.ui.list_state.selected().unwrap_or(0);
        self.ui.list_state.select(Some(current.saturating_sub(1)));
    }

    pub fn scroll_entries_down(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let last = self.store.len() - 1;
        let current = self.ui.list_state.selected().unwrap_or(0);
        self.ui.list_state.select(Some((current + 1).min(last)));
    }
}
