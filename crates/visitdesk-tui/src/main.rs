//! `visitdesk`: terminal UI for submitting and reviewing visit requests.
//!
//! # Usage
//!
//! ```
//! visitdesk --store ~/.local/share/visitdesk/requests.db
//! visitdesk --config ~/.config/visitdesk/config.toml
//! ```

mod app;
mod settings;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use visitdesk_core::session::StubAuthenticator;
use visitdesk_store_sqlite::SqliteStore;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "visitdesk", about = "Terminal UI for visit requests")]
struct Args {
  /// Path to a TOML settings file.
  #[arg(short, long, value_name = "FILE", env = "VISITDESK_CONFIG")]
  config: Option<PathBuf>,

  /// SQLite file holding the requests (overrides the settings file).
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Storage slot to read and write.
  #[arg(long)]
  slot: Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // CLI flags override the environment, which overrides the settings file.
  let mut settings = Settings::load(args.config.as_deref())?;
  settings.apply_args(&args);

  // The terminal belongs to the UI, so logs go to a file.
  let log_file = File::create(&settings.log_file)
    .with_context(|| format!("creating log file {}", settings.log_file.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(log_file))
    .with_ansi(false)
    .init();

  let store = SqliteStore::open_slot(&settings.store_path, &settings.slot)
    .await
    .with_context(|| format!("opening store {}", settings.store_path.display()))?;
  tracing::info!(
    path = %settings.store_path.display(),
    slot = %settings.slot,
    "store opened"
  );

  let mut app = App::new(store, StubAuthenticator::new(settings.login_delay()));

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // A queued sign-in runs after the "Signing in…" frame is on screen.
    if app.busy {
      app.finish_sign_in().await?;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key).await? {
          break;
        }
      }
      // Resize and the rest redraw on the next iteration.
      _ => {}
    }
  }

  Ok(())
}
