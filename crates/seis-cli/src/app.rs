//! Browse screen state and key handling.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use seis_core::{
  date::Period,
  page::{PageMeta, PageRequest},
};

use crate::{render::Row, source::Source};

// ─── View ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Daily,
  Monthly,
}

impl View {
  pub fn title(self) -> &'static str {
    match self {
      Self::Daily => "Daily",
      Self::Monthly => "Monthly",
    }
  }

  fn toggled(self) -> Self {
    match self {
      Self::Daily => Self::Monthly,
      Self::Monthly => Self::Daily,
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level browse state.
pub struct App {
  pub source: Source,

  /// Day or month grouping for the paged list.
  pub view: View,

  pub req: PageRequest,

  /// Rows of the current page, or the single row of a period lookup.
  pub rows: Vec<Row>,

  /// Pager counts; `None` while a period lookup is shown.
  pub meta: Option<PageMeta>,

  /// Search text, being typed when `search_active`.
  pub search: String,

  pub search_active: bool,

  /// Text filter applied to the current page.
  pub filter: Option<String>,

  /// Cursor position within the visible rows.
  pub cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(source: Source, req: PageRequest) -> Self {
    Self {
      source,
      view: View::Daily,
      req,
      rows: Vec::new(),
      meta: None,
      search: String::new(),
      search_active: false,
      filter: None,
      cursor: 0,
      status_msg: String::new(),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the current page for the current view. Failures go to the
  /// status bar and leave the previous rows on screen.
  pub async fn reload(&mut self) {
    self.status_msg = "Loading…".into();
    match self.fetch_page().await {
      Ok((rows, meta)) => {
        self.rows = rows;
        self.meta = Some(meta);
        self.cursor = 0;
        self.status_msg.clear();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn fetch_page(&self) -> Result<(Vec<Row>, PageMeta)> {
    Ok(match self.view {
      View::Daily => {
        let page = self.source.daily(self.req).await?;
        (page.data.iter().map(Row::from).collect(), page.meta)
      }
      View::Monthly => {
        let page = self.source.monthly(self.req).await?;
        (page.data.iter().map(Row::from).collect(), page.meta)
      }
    })
  }

  async fn look_up(&mut self, period: Period) {
    match self.source.period(period).await {
      Ok(stat) => {
        self.rows = vec![Row::from(&stat)];
        self.meta = None;
        self.cursor = 0;
        self.status_msg.clear();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  // ── Visible rows ──────────────────────────────────────────────────────────

  /// Rows on screen after the text filter.
  pub fn visible_rows(&self) -> Vec<&Row> {
    match &self.filter {
      Some(term) => self.rows.iter().filter(|r| r.label.contains(term.as_str())).collect(),
      None => self.rows.iter().collect(),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.search_active {
      self.handle_search_key(key).await;
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Char('m') => {
        self.view = self.view.toggled();
        self.req.page = 1;
        self.clear_search();
        self.reload().await;
      }

      KeyCode::Char('n') | KeyCode::Right => {
        if let Some(meta) = &self.meta
          && u64::from(self.req.page) < meta.total_pages
        {
          self.req.page += 1;
          self.reload().await;
        }
      }
      KeyCode::Char('p') | KeyCode::Left => {
        if self.meta.is_some() && self.req.page > 1 {
          self.req.page -= 1;
          self.reload().await;
        }
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.visible_rows().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      KeyCode::Char('/') => {
        self.search_active = true;
        self.search.clear();
      }
      KeyCode::Esc => {
        let was_lookup = self.meta.is_none();
        self.clear_search();
        if was_lookup {
          self.reload().await;
        }
      }

      _ => {}
    }
    true
  }

  async fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        self.search.clear();
      }
      KeyCode::Enter => {
        self.search_active = false;
        self.apply_search().await;
      }
      KeyCode::Backspace => {
        self.search.pop();
      }
      KeyCode::Char(c) => self.search.push(c),
      _ => {}
    }
  }

  /// `YYYY-MM-DD` / `YYYY-MM` look up one period; other text filters the
  /// current page by label.
  async fn apply_search(&mut self) {
    let term = self.search.trim().to_owned();
    self.cursor = 0;
    if term.is_empty() {
      self.filter = None;
      if self.meta.is_none() {
        self.reload().await;
      }
      return;
    }
    match Period::parse_search(&term) {
      Ok(Some(period)) => {
        self.filter = None;
        self.look_up(period).await;
      }
      Ok(None) => {
        if self.meta.is_none() {
          self.reload().await;
        }
        self.filter = Some(term);
      }
      Err(e) => self.status_msg = e.to_string(),
    }
  }

  fn clear_search(&mut self) {
    self.search.clear();
    self.search_active = false;
    self.filter = None;
    self.cursor = 0;
  }
}
