//! Detail pane for the request under the list cursor.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use visitdesk_core::request::VisitRequest;

use super::request_list::status_color;
use crate::app::App;

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(request) = app.cursor_request() else {
    let block = Block::default()
      .title(" Detail ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("Nothing selected.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", request.requester_name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = detail_lines(request);

  if app.cursor_decidable() {
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
      Span::styled("[a] approve", Style::default().fg(Color::Green)),
      Span::raw("  "),
      Span::styled("[r] reject", Style::default().fg(Color::Red)),
    ]));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn row(label: &'static str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<18}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

fn detail_lines(r: &VisitRequest) -> Vec<Line<'static>> {
  let mut lines = vec![
    Line::from(vec![
      Span::styled(
        format!("{:<18}", "status"),
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ),
      Span::styled(
        r.status.to_string(),
        Style::default()
          .fg(status_color(r.status))
          .add_modifier(Modifier::BOLD),
      ),
    ]),
    row("visitors", r.number_of_people.to_string()),
    row("date", r.visit_date.format("%A %Y-%m-%d").to_string()),
    row("time", format!("{} to {}", r.start_time, r.end_time)),
    row("location", r.location.to_string()),
  ];

  if r.is_client {
    lines.push(row("client number", r.client_number.clone()));
  }
  if r.needs_catering {
    let delivery = r
      .delivery_time
      .map(|t| format!("delivered at {t}"))
      .unwrap_or_else(|| "no delivery time".to_string());
    lines.push(row("catering", delivery));
  }

  for (label, text) in [
    ("allergies", &r.allergies),
    ("client reference", &r.client_reference),
    ("comments", &r.comments),
  ] {
    if !text.is_empty() {
      lines.push(row(label, text.clone()));
    }
  }

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!(
      "submitted {}",
      r.created_at
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
    ),
    Style::default().fg(Color::DarkGray),
  )));

  lines
}
