use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use rtrack::{Config, EntryStore, Profile, SqliteStore, cli::{Cli, Commands}, logging};
use std::path::PathBuf;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev selects the separate dev config and storage, otherwise prod
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    let config_path = match cli.config {
        Some(ref path) => PathBuf::from(path),
        None => Config::get_config_path(profile)?,
    };
    let mut config = Config::load_from_path(&config_path, profile)?;

    // Logging problems should never keep the journal from opening
    match logging::log_path(profile) {
        Ok(path) => {
            if let Err(e) = logging::init(&path, &config.log_level) {
                eprintln!("warning: logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!("warning: logging disabled: {}", e),
    }

    let mut stdout = std::io::stdout();
    let command = cli.command.unwrap_or(Commands::Tui);
    if let Commands::Theme { name } = command {
        rtrack::cli::handle_theme(name, &mut config, &config_path, &mut stdout)?;
        return Ok(());
    }

    let storage_path = config.get_storage_path();
    let (backend, moved) = SqliteStore::open_or_recover(
        storage_path.to_str()
            .ok_or_else(|| eyre!("Storage path contains invalid UTF-8"))?
    ).wrap_err_with(|| format!("Failed to open journal storage at {}", storage_path.display()))?;
    let mut store = EntryStore::load(backend);
    let recovery_notice = moved.map(|path| {
        format!("Journal file was unreadable, moved to {}", path.display())
    });

    tracing::info!(profile = ?profile, entries = store.len(), "rtrack started");

    if let Some(notice) = &recovery_notice {
        if !matches!(command, Commands::Tui) {
            eprintln!("warning: {}", notice);
        }
    }

    match command {
        Commands::Tui => {
            let mut app = rtrack::tui::App::new(config, store)?;
            if let Some(notice) = recovery_notice {
                app.set_status_message(notice);
            }
            rtrack::tui::run_event_loop(app)?;
        }
        Commands::Add { mood, notes, goals } => {
            rtrack::cli::handle_add(&mood, notes, goals, &mut store, &mut stdout)?;
        }
        Commands::List { limit } => {
            rtrack::cli::handle_list(limit, &store, &mut stdout)?;
        }
        Commands::Stats => {
            rtrack::cli::handle_stats(&store, &mut stdout)?;
        }
        // Handled before the store is opened
        Commands::Theme { .. } => {}
    }

    Ok(())
}
