//! New-request tab: one line per visible form field.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use visitdesk_core::form::{Draft, Field};

use crate::app::App;

/// Render the request form into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" New visit request ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let draft = app.form.draft();
  let focused = app.focused_field();

  let lines: Vec<Line> = app
    .form
    .visible_fields()
    .into_iter()
    .map(|field| {
      let is_cursor = Some(field) == focused;
      let marker = if field.is_required() { "*" } else { " " };

      let label_style = if is_cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD)
      };

      let mut value = field_value(draft, field);
      if is_cursor && field.is_text() {
        value.push('_');
      }
      let value_style = if value.is_empty() || value == "—" {
        Style::default().fg(Color::DarkGray)
      } else {
        Style::default()
      };

      Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(format!("{:<18}", field.to_string()), label_style),
        Span::raw(" "),
        Span::styled(value, value_style),
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines), inner);
}

/// Display form of `field`'s current value.
fn field_value(draft: &Draft, field: Field) -> String {
  let or_dash = |v: Option<String>| v.unwrap_or_else(|| "—".to_string());
  let yes_no = |b: bool| if b { "[x]" } else { "[ ]" }.to_string();

  match field {
    Field::RequesterName => draft.requester_name.clone(),
    Field::NumberOfPeople => draft.number_of_people.to_string(),
    Field::VisitDate => or_dash(draft.visit_date.map(|d| d.format("%a %Y-%m-%d").to_string())),
    Field::StartTime => or_dash(draft.start_time.map(|s| s.to_string())),
    Field::EndTime => or_dash(draft.end_time.map(|s| s.to_string())),
    Field::IsClient => yes_no(draft.is_client),
    Field::ClientNumber => draft.client_number.clone(),
    Field::NeedsCatering => yes_no(draft.needs_catering),
    Field::Location => or_dash(draft.location.map(|l| l.to_string())),
    Field::DeliveryTime => or_dash(draft.delivery_time.map(|s| s.to_string())),
    Field::Allergies => draft.allergies.clone(),
    Field::ClientReference => draft.client_reference.clone(),
    Field::Comments => draft.comments.clone(),
  }
}
