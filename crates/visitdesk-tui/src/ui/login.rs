//! Login / register screen.

use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use visitdesk_core::{identity::Role, session::AuthAction};

use crate::app::{App, LoginField};

/// Render the centred login box into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let [column] = Layout::horizontal([Constraint::Length(54)])
    .flex(Flex::Center)
    .areas(area);
  let [boxed] = Layout::vertical([Constraint::Length(10)])
    .flex(Flex::Center)
    .areas(column);

  let form = &app.login;
  let block = Block::default()
    .title(format!(" {} ", form.action))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(boxed);
  f.render_widget(block, boxed);

  let masked = "•".repeat(form.credentials.password.chars().count());
  let name_label = match form.action {
    AuthAction::Login => "Name (optional)",
    AuthAction::Register => "Name",
  };

  let mut lines = vec![
    input_line("Email", &form.credentials.email, form.focus == LoginField::Email),
    input_line("Password", &masked, form.focus == LoginField::Password),
    input_line(name_label, &form.credentials.name, form.focus == LoginField::Name),
    Line::from(""),
    role_line(form.credentials.role),
  ];

  if app.busy {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      "Signing in…",
      Style::default().fg(Color::Yellow),
    )));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn input_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
  let label_style = if focused {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Cyan)
  };
  let cursor = if focused { "_" } else { "" };

  Line::from(vec![
    Span::styled(format!("{label:<16}"), label_style),
    Span::raw(format!("{value}{cursor}")),
  ])
}

fn role_line(role: Role) -> Line<'static> {
  let choice = |r: Role| {
    let style = if r == role {
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!(" {r} "), style)
  };

  Line::from(vec![
    Span::styled(format!("{:<16}", "Role"), Style::default().fg(Color::Cyan)),
    choice(Role::Requester),
    Span::raw(" "),
    choice(Role::Approver),
  ])
}
