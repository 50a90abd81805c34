//! TUI rendering. Orchestrates the login screen and the dashboard panes.

pub mod login;
pub mod request_detail;
pub mod request_form;
pub mod request_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph, Tabs},
};

use crate::app::{App, Screen, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, tabs, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // tabs
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Login => login::draw(f, rows[1].union(rows[2]), app),
    Screen::Dashboard => {
      draw_tabs(f, rows[1], app);
      draw_body(f, rows[2], app);
    }
  }
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let who = match app.identity() {
    Some(identity) => {
      let stats = app.stats();
      format!(
        " visitdesk  {} ({})  {} pending  {} approved  {} rejected",
        identity.name, identity.role, stats.pending, stats.approved, stats.rejected,
      )
    }
    None => " visitdesk".to_string(),
  };

  let left = Span::styled(
    who,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Tabs ─────────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let titles: Vec<String> = app.tabs.iter().map(|t| t.title()).collect();
  let tabs = Tabs::new(titles)
    .select(app.tab_index)
    .style(Style::default().fg(Color::DarkGray))
    .highlight_style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(tabs, area);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match app.current_tab() {
    Some(Tab::NewRequest) => request_form::draw(f, area, app),
    Some(Tab::Requests(view)) => {
      // List on the left (40%), detail of the cursor row on the right.
      let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
      request_list::draw(f, cols[0], app, view);
      request_detail::draw(f, cols[1], app);
    }
    None => {}
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (app.screen, app.current_tab()) {
    _ if app.busy => ("WAIT", ""),
    (Screen::Login, _) => (
      "LOGIN",
      "Tab next field  ←→ role  F2 sign in/register  Enter submit  Esc quit",
    ),
    _ if app.filter_active => (
      "SEARCH",
      "Type to filter  Esc cancel  Enter keep",
    ),
    (Screen::Dashboard, Some(Tab::NewRequest)) => (
      "FORM",
      "↑↓ field  ←→ change  Space toggle  Enter submit  Tab next tab  ^L logout",
    ),
    (Screen::Dashboard, _) if app.cursor_decidable() => (
      "REVIEW",
      "↑↓/jk navigate  a approve  r reject  / search  R reload  ^L logout  q quit",
    ),
    (Screen::Dashboard, _) => (
      "NORMAL",
      "↑↓/jk navigate  / search  R reload  Tab next tab  ^L logout  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
