use chrono::NaiveDate;
use tracing::debug;

use crate::entries::{EntryStore, StoreError};
use crate::models::{Entry, Mood};
use crate::storage::LocalStore;
use crate::utils;

/// The in-progress entry behind the "add today's entry" form.
///
/// Goals keep the same invariants as committed entries: no empty strings and
/// no duplicates (exact, case-sensitive match).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    mood: Mood,
    notes: String,
    goal_input: String,
    goals: Vec<String>,
    form_open: bool,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn goal_input(&self) -> &str {
        &self.goal_input
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn set_notes(&mut self, text: impl Into<String>) {
        self.notes = text.into();
    }

    pub fn set_goal_input(&mut self, text: impl Into<String>) {
        self.goal_input = text.into();
    }

    /// Add a trimmed goal. Empty or already present goals are ignored.
    ///
    /// Returns true when the goal list changed; the goal input is cleared
    /// only in that case.
    pub fn add_goal(&mut self, text: &str) -> bool {
        let goal = text.trim();
        if goal.is_empty() || self.goals.iter().any(|g| g == goal) {
            return false;
        }
        debug!(goal, "goal added to draft");
        self.goals.push(goal.to_string());
        self.goal_input.clear();
        true
    }

    /// Add whatever is currently typed in the goal input
    pub fn add_goal_from_input(&mut self) -> bool {
        let text = self.goal_input.clone();
        self.add_goal(&text)
    }

    pub fn remove_goal(&mut self, text: &str) {
        if let Some(pos) = self.goals.iter().position(|g| g == text) {
            self.goals.remove(pos);
            debug!(goal = text, "goal removed from draft");
        }
    }

    /// Show or hide the form without touching its contents
    pub fn toggle_form(&mut self) {
        self.form_open = !self.form_open;
    }

    /// Hide the form. Notes and goals are kept for the next time it opens.
    pub fn cancel(&mut self) {
        self.form_open = false;
    }

    /// Commit the draft as today's entry (local calendar day)
    pub fn commit<S: LocalStore>(&mut self, store: &mut EntryStore<S>) -> Result<Entry, StoreError> {
        self.commit_on(store, utils::today())
    }

    /// Commit the draft as an entry dated `date`.
    ///
    /// Notes and goals are cleared and the form closes; the mood carries over
    /// to the next draft. The draft is reset even when persisting fails since
    /// the entry is already held by the store.
    pub fn commit_on<S: LocalStore>(
        &mut self,
        store: &mut EntryStore<S>,
        date: NaiveDate,
    ) -> Result<Entry, StoreError> {
        let entry = Entry::new(date, self.mood, self.notes.clone(), self.goals.clone());
        let result = store.append(entry.clone());

        self.notes.clear();
        self.goals.clear();
        self.goal_input.clear();
        self.form_open = false;

        result?;
        debug!(id = %entry.id, "draft committed");
        Ok(entry)
    }
}
