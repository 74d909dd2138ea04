//! TUI rendering for `seis browse`.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table, TableState},
};

use crate::{
  app::App,
  render::{cell, has_data},
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // table
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_table(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let line = Line::from(vec![
    Span::styled(
      " seis  [m] day/month  [n/p] page  [/] search  [q] quit",
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      format!("  ({})", app.source.label()),
      Style::default().fg(Color::Gray),
    ),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Table ────────────────────────────────────────────────────────────────────

fn draw_table(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_rows();

  let title = match &app.meta {
    Some(meta) => format!(
      " {} (page {} of {}, {} total) ",
      app.view.title(),
      meta.page,
      meta.total_pages,
      meta.total
    ),
    None => " Lookup ".to_string(),
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Search bar on the last inner line while typing or filtering.
  if (app.search_active || app.filter.is_some()) && inner.height > 2 {
    let bar = Rect { y: inner.y + inner.height - 1, height: 1, ..inner };
    inner.height -= 1;
    let text = if app.search_active {
      format!("/{}_", app.search)
    } else {
      format!("/{}", app.search)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      bar,
    );
  }

  if !has_data(visible.iter().copied()) {
    f.render_widget(
      Paragraph::new(Span::styled("No data", Style::default().fg(Color::DarkGray))),
      inner,
    );
    return;
  }

  let header = TableRow::new(["PERIOD", "MIN", "MAX", "COUNT"])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
  let body = visible.iter().map(|r| {
    TableRow::new([
      Cell::from(r.label.clone()),
      Cell::from(cell(r.min)),
      Cell::from(cell(r.max)),
      Cell::from(r.count.to_string()),
    ])
  });
  let widths = [
    Constraint::Length(12),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(8),
  ];

  let mut state = TableState::default();
  state.select(Some(app.cursor.min(visible.len() - 1)));

  f.render_stateful_widget(
    Table::new(body, widths).header(header).row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = if app.search_active {
    ("SEARCH", "YYYY-MM-DD / YYYY-MM look up a period  Enter apply  Esc cancel")
  } else {
    ("NORMAL", "↑↓/jk move  ←→/np page  m day/month  / search  Esc clear  q quit")
  };
  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
