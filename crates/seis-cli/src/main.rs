//! `seis` — terminal client for the seismic reading store.
//!
//! # Usage
//!
//! ```
//! seis preview readings.txt --monthly
//! seis upload readings.txt
//! seis stats --search 2023-01
//! seis --url http://localhost:9797 stats --page 2
//! seis browse
//! seis browse readings.txt
//! ```

mod app;
mod client;
mod render;
mod source;
mod ui;

use std::{
  io,
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use client::ApiClient;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use render::{Row, local_rows, render_table};
use seis_core::{
  date::Period,
  page::PageRequest,
  parse::{ParseOutcome, parse_readings},
};
use serde::Deserialize;
use source::{LocalData, Source};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:9797";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "seis", about = "Terminal client for the seismic reading store")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the seis server (default: http://localhost:9797).
  #[arg(long, env = "SEIS_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Parse a file locally and print its statistics.
  Preview {
    file:    PathBuf,
    /// Group by month instead of by day.
    #[arg(long)]
    monthly: bool,
    /// Keep only days whose YYYY-MM-DD text contains this term.
    #[arg(long)]
    search:  Option<String>,
  },
  /// Upload a file; falls back to local statistics if the server fails.
  Upload {
    file:    PathBuf,
    #[arg(long)]
    monthly: bool,
  },
  /// Query stored statistics. YYYY-MM-DD or YYYY-MM searches look up a
  /// single day or month.
  Stats {
    #[arg(long)]
    search:  Option<String>,
    #[arg(long, default_value_t = 1)]
    page:    u32,
    #[arg(long, default_value_t = seis_core::page::DEFAULT_PAGE_LIMIT)]
    limit:   u32,
    #[arg(long)]
    monthly: bool,
  },
  /// Interactive dashboard over the server, or over FILE parsed locally.
  Browse {
    file:  Option<PathBuf>,
    #[arg(long, default_value_t = seis_core::page::DEFAULT_PAGE_LIMIT)]
    limit: u32,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| Some(file_cfg.url).filter(|u| !u.is_empty()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());

  match args.command {
    Command::Preview { file, monthly, search } => {
      let outcome = parse_file(&file)?;
      print_warnings(&outcome);
      print!("{}", render_table(&local_rows(&outcome, monthly, search.as_deref())));
    }
    Command::Upload { file, monthly } => {
      let client = ApiClient::new(base_url)?;
      upload(&client, &file, monthly).await?;
    }
    Command::Stats { search, page, limit, monthly } => {
      let client = ApiClient::new(base_url)?;
      stats(&client, search.as_deref(), PageRequest::new(page, limit), monthly).await?;
    }
    Command::Browse { file, limit } => {
      let source = match file {
        Some(path) => Source::Local(LocalData::new(parse_file(&path)?)),
        None => Source::Remote(ApiClient::new(base_url)?),
      };
      browse(App::new(source, PageRequest::new(1, limit))).await?;
    }
  }

  Ok(())
}

// ─── Commands ─────────────────────────────────────────────────────────────────

/// Read a file as text, replacing invalid UTF-8 the same way the server does.
fn read_text(path: &Path) -> Result<String> {
  let bytes =
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_file(path: &Path) -> Result<ParseOutcome> {
  Ok(parse_readings(&read_text(path)?))
}

fn print_warnings(outcome: &ParseOutcome) {
  for w in &outcome.warnings {
    eprintln!("warning: {w}");
  }
}

async fn upload(client: &ApiClient, path: &Path, monthly: bool) -> Result<()> {
  let text = read_text(path)?;
  let outcome = parse_readings(&text);
  print_warnings(&outcome);

  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "upload.txt".to_owned());

  match client.upload(&file_name, text.into_bytes()).await {
    Ok(resp) => {
      println!("{} ({} readings stored)", resp.message, resp.count);
    }
    Err(e) => {
      tracing::warn!(error = %e, "upload failed");
      eprintln!("server unavailable, showing locally parsed data");
      print!("{}", render_table(&local_rows(&outcome, monthly, None)));
    }
  }
  Ok(())
}

async fn stats(
  client: &ApiClient,
  search: Option<&str>,
  req: PageRequest,
  monthly: bool,
) -> Result<()> {
  if let Some(period) = search.map(Period::parse_search).transpose()?.flatten() {
    let stat = client.period(period).await?;
    print!("{}", render_table(&[Row::from(&stat)]));
    return Ok(());
  }

  let (rows, meta) = if monthly {
    let page = client.monthly(req).await?;
    (page.data.iter().map(Row::from).collect::<Vec<_>>(), page.meta)
  } else {
    let page = client.daily(req).await?;
    (page.data.iter().map(Row::from).collect::<Vec<_>>(), page.meta)
  };

  print!("{}", render_table(&rows));
  println!("page {} of {} ({} total)", meta.page, meta.total_pages, meta.total);
  Ok(())
}

// ─── Browse ───────────────────────────────────────────────────────────────────

async fn browse(mut app: App) -> Result<()> {
  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.reload().await;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await
    {
      break;
    }
  }

  Ok(())
}
