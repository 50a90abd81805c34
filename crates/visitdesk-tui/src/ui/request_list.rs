//! Request list pane for the dashboard views.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use visitdesk_core::{request::RequestStatus, view::View};

use crate::app::App;

/// Colour used for a status badge.
pub fn status_color(status: RequestStatus) -> Color {
  match status {
    RequestStatus::Pending => Color::Yellow,
    RequestStatus::Approved => Color::Green,
    RequestStatus::Rejected => Color::Red,
  }
}

/// Render the list for `view` into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, view: View) {
  let visible = app.visible_requests();
  let in_view = app
    .identity()
    .map(|identity| view.select(&app.requests, identity).len())
    .unwrap_or(0);

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" {view} ({}/{in_view}) ", visible.len())
  } else {
    format!(" {view} ({in_view}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = visible
    .iter()
    .map(|request| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{:<9}", request.status.to_string()),
          Style::default().fg(status_color(request.status)),
        ),
        Span::raw(format!(
          "{} {}  ",
          request.visit_date.format("%Y-%m-%d"),
          request.start_time,
        )),
        Span::raw(request.requester_name.clone()),
        Span::styled(
          format!("  {}", request.location),
          Style::default().fg(Color::DarkGray),
        ),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if visible.is_empty() {
    let empty = match view {
      View::Mine => "You have not submitted any requests.",
      View::Pending => "No requests are waiting for a decision.",
      View::All => "No requests yet.",
    };
    f.render_widget(
      Paragraph::new(empty).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}
