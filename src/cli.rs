use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::draft::Draft;
use crate::entries::{EntryStore, StoreError};
use crate::models::{Mood, ParseMoodError};
use crate::stats::Stats;
use crate::storage::LocalStore;
use crate::utils;

#[derive(Parser)]
#[command(name = "rtrack")]
#[command(about = "Recovery tracker - daily mood, notes and goals with streaks")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/storage)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Record today's entry without opening the TUI
    Add {
        /// great, good, okay or difficult
        #[arg(long, short, default_value = "good")]
        mood: String,
        /// Free-form notes
        #[arg(long, short)]
        notes: Option<String>,
        /// A goal for today (repeatable)
        #[arg(long = "goal", short = 'g')]
        goals: Vec<String>,
    },
    /// Print entries, newest first
    List {
        /// Show at most this many entries
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Print total entries, current streak and good days
    Stats,
    /// List available themes, or switch to one and save it to the config
    Theme {
        /// Theme to make active
        name: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("{0}")]
    MoodError(#[from] ParseMoodError),
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),
}

/// Handle the add command: fill a draft the same way the form does and commit it
pub fn handle_add<S: LocalStore>(
    mood: &str,
    notes: Option<String>,
    goals: Vec<String>,
    store: &mut EntryStore<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mood: Mood = mood.parse()?;

    let mut draft = Draft::new();
    draft.set_mood(mood);
    if let Some(notes) = notes {
        draft.set_notes(notes);
    }
    for goal in &goals {
        draft.add_goal(goal);
    }

    let entry = draft.commit(store)?;
    writeln!(out, "Entry recorded for {} ({})", entry.date, entry.headline())?;

    Ok(())
}

/// Handle the list command
pub fn handle_list<S: LocalStore>(
    limit: Option<usize>,
    store: &EntryStore<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if store.is_empty() {
        writeln!(out, "No entries yet. Start your recovery journey by adding your first entry!")?;
        return Ok(());
    }

    let limit = limit.unwrap_or(usize::MAX);
    for entry in store.all().iter().take(limit) {
        writeln!(out, "{} {}  {}", entry.mood.symbol(), entry.headline(), entry.long_date())?;
        if !entry.notes.is_empty() {
            for line in entry.notes.lines() {
                writeln!(out, "    {}", line)?;
            }
        }
        if !entry.goals.is_empty() {
            writeln!(out, "    Goals: {}", entry.goals.join(", "))?;
        }
    }

    Ok(())
}

/// Handle the stats command
pub fn handle_stats<S: LocalStore>(store: &EntryStore<S>, out: &mut impl Write) -> Result<(), CliError> {
    let stats = Stats::compute(store.all(), utils::today());
    writeln!(out, "Total Entries: {}", stats.total_entries)?;
    writeln!(out, "Day Streak:    {}", stats.current_streak)?;
    writeln!(out, "Good Days:     {}", stats.good_days)?;
    Ok(())
}

/// Handle the theme command
pub fn handle_theme(
    name: Option<String>,
    config: &mut Config,
    config_path: &Path,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match name {
        Some(name) => {
            config.set_theme(&name)?;
            config.save_to_path(config_path)?;
            writeln!(out, "Theme set to {}", name)?;
        }
        None => {
            for theme in config.get_available_themes() {
                let marker = if theme == config.current_theme { "*" } else { " " };
                writeln!(out, "{} {}", marker, theme)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use tempfile::tempdir;

    #[test]
    fn add_commits_through_a_draft() {
        let mut store = EntryStore::load(MemoryStore::new());
        let mut out = Vec::new();
        handle_add(
            "Great",
            Some("slept well".to_string()),
            vec!["walk".to_string(), " walk ".to_string(), "  ".to_string(), "read".to_string()],
            &mut store,
            &mut out,
        )
        .unwrap();

        let entry = &store.all()[0];
        assert_eq!(entry.mood, Mood::Great);
        assert_eq!(entry.notes, "slept well");
        assert_eq!(entry.goals, vec!["walk".to_string(), "read".to_string()]);
        assert_eq!(entry.date, utils::today());
        assert!(String::from_utf8(out).unwrap().starts_with("Entry recorded for"));
    }

    #[test]
    fn add_rejects_unknown_mood() {
        let mut store = EntryStore::load(MemoryStore::new());
        let result = handle_add("fantastic", None, Vec::new(), &mut store, &mut Vec::new());
        assert!(matches!(result, Err(CliError::MoodError(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn list_prints_empty_state() {
        let store = EntryStore::load(MemoryStore::new());
        let mut out = Vec::new();
        handle_list(None, &store, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No entries yet"));
    }

    #[test]
    fn list_respects_limit_and_order() {
        let mut store = EntryStore::load(MemoryStore::new());
        for mood in ["okay", "difficult", "great"] {
            handle_add(mood, None, Vec::new(), &mut store, &mut Vec::new()).unwrap();
        }
        let mut out = Vec::new();
        handle_list(Some(2), &store, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Great Day"));
        assert!(lines[1].contains("Difficult Day"));
    }

    #[test]
    fn stats_reports_streak_for_today() {
        let mut store = EntryStore::load(MemoryStore::new());
        handle_add("good", None, Vec::new(), &mut store, &mut Vec::new()).unwrap();
        let mut out = Vec::new();
        handle_stats(&store, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total Entries: 1"));
        assert!(text.contains("Day Streak:    1"));
        assert!(text.contains("Good Days:     1"));
    }

    #[test]
    fn theme_lists_available_with_current_marked() {
        let mut config = Config::default();
        let dir = tempdir().unwrap();
        let mut out = Vec::new();
        handle_theme(None, &mut config, &dir.path().join("config.toml"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().any(|l| l == "* default"));
        assert!(text.lines().any(|l| l == "  dark"));
        assert!(!dir.path().join("config.toml").exists());
    }

    #[test]
    fn theme_switch_is_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::load_from_path(&path, utils::Profile::Dev).unwrap();

        handle_theme(Some("green".to_string()), &mut config, &path, &mut Vec::new()).unwrap();

        let reloaded = Config::load_from_path(&path, utils::Profile::Dev).unwrap();
        assert_eq!(reloaded.current_theme, "green");
        assert_eq!(reloaded.get_active_theme().fg, "green");
    }

    #[test]
    fn unknown_theme_is_rejected_and_not_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::load_from_path(&path, utils::Profile::Dev).unwrap();

        let result = handle_theme(Some("neon".to_string()), &mut config, &path, &mut Vec::new());
        assert!(matches!(result, Err(CliError::ConfigError(ConfigError::ThemeNotFound(_)))));
        assert_eq!(Config::load_from_path(&path, utils::Profile::Dev).unwrap().current_theme, "default");
    }
}
