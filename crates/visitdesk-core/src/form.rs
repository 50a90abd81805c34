//! The request form controller.
//!
//! [`RequestForm`] accumulates edits into a [`Draft`], validates it on submit
//! and hands the result to a [`VisitStore`]. A rejected submission leaves both
//! the draft and the store untouched.

use chrono::{Local, NaiveDate};
use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  request::{Location, MAX_PEOPLE, NewVisitRequest, TimeSlot, VisitRequest},
  store::VisitStore,
};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// Every input of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Field {
  #[strum(to_string = "requester name")]
  RequesterName,
  #[strum(to_string = "number of people")]
  NumberOfPeople,
  #[strum(to_string = "visit date")]
  VisitDate,
  #[strum(to_string = "start time")]
  StartTime,
  #[strum(to_string = "end time")]
  EndTime,
  #[strum(to_string = "client visit")]
  IsClient,
  #[strum(to_string = "client number")]
  ClientNumber,
  #[strum(to_string = "catering")]
  NeedsCatering,
  #[strum(to_string = "location")]
  Location,
  #[strum(to_string = "delivery time")]
  DeliveryTime,
  #[strum(to_string = "allergies")]
  Allergies,
  #[strum(to_string = "client reference")]
  ClientReference,
  #[strum(to_string = "comments")]
  Comments,
}

impl Field {
  /// Fields that must be set before a draft can be submitted.
  pub fn is_required(self) -> bool {
    matches!(
      self,
      Self::NumberOfPeople | Self::VisitDate | Self::StartTime | Self::EndTime | Self::Location
    )
  }

  /// Free-text fields, edited character by character.
  pub fn is_text(self) -> bool {
    matches!(
      self,
      Self::RequesterName
        | Self::ClientNumber
        | Self::Allergies
        | Self::ClientReference
        | Self::Comments
    )
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// An unsaved request as the user is editing it. Required values start unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
  pub requester_name:   String,
  pub number_of_people: u32,
  pub visit_date:       Option<NaiveDate>,
  pub start_time:       Option<TimeSlot>,
  pub end_time:         Option<TimeSlot>,
  pub is_client:        bool,
  pub client_number:    String,
  pub needs_catering:   bool,
  pub location:         Option<Location>,
  pub delivery_time:    Option<TimeSlot>,
  pub allergies:        String,
  pub client_reference: String,
  pub comments:         String,
}

impl Draft {
  /// An empty draft pre-filled with the requester's display name.
  pub fn new(requester_name: impl Into<String>) -> Self {
    Self {
      requester_name:   requester_name.into(),
      number_of_people: 1,
      visit_date:       None,
      start_time:       None,
      end_time:         None,
      is_client:        false,
      client_number:    String::new(),
      needs_catering:   false,
      location:         None,
      delivery_time:    None,
      allergies:        String::new(),
      client_reference: String::new(),
      comments:         String::new(),
    }
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// The draft is missing required values, or holds values out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.fields, .out_of_range))]
pub struct ValidationError {
  /// Required fields left unset, in display order.
  pub fields:       Vec<Field>,
  /// Fields that are set but not acceptable, in display order.
  pub out_of_range: Vec<Field>,
}

fn describe(missing: &[Field], out_of_range: &[Field]) -> String {
  let mut parts = Vec::new();
  if !missing.is_empty() {
    let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
    parts.push(format!("please fill in the required fields: {}", names.join(", ")));
  }
  for field in out_of_range {
    parts.push(match field {
      Field::VisitDate => "the visit date must be after today".to_string(),
      Field::NumberOfPeople => {
        format!("the number of people must be between 1 and {MAX_PEOPLE}")
      }
      other => format!("{other} is not valid"),
    });
  }
  parts.join("; ")
}

/// Why a submission did not produce a request.
#[derive(Debug, Error)]
pub enum SubmitError<E: std::error::Error + 'static> {
  #[error(transparent)]
  Invalid(#[from] ValidationError),

  #[error("store error: {0}")]
  Store(#[source] E),
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// Form state for one requester.
#[derive(Debug, Clone)]
pub struct RequestForm {
  draft:        Draft,
  /// Restored into `requester_name` on every reset.
  default_name: String,
}

impl RequestForm {
  pub fn new(requester_name: impl Into<String>) -> Self {
    let default_name = requester_name.into();
    Self { draft: Draft::new(default_name.clone()), default_name }
  }

  pub fn draft(&self) -> &Draft { &self.draft }

  /// Fields currently collected. Conditional fields only appear while their
  /// gate is on.
  pub fn visible_fields(&self) -> Vec<Field> {
    Field::iter()
      .filter(|f| match f {
        Field::ClientNumber => self.draft.is_client,
        Field::DeliveryTime => self.draft.needs_catering,
        _ => true,
      })
      .collect()
  }

  // ── Edits ─────────────────────────────────────────────────────────────────

  /// Mutable access to a free-text field; `None` for non-text fields.
  pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
    match field {
      Field::RequesterName => Some(&mut self.draft.requester_name),
      Field::ClientNumber => Some(&mut self.draft.client_number),
      Field::Allergies => Some(&mut self.draft.allergies),
      Field::ClientReference => Some(&mut self.draft.client_reference),
      Field::Comments => Some(&mut self.draft.comments),
      _ => None,
    }
  }

  /// Set the headcount, clamped to `1..=MAX_PEOPLE`.
  pub fn set_number_of_people(&mut self, n: u32) {
    self.draft.number_of_people = n.clamp(1, MAX_PEOPLE);
  }

  pub fn set_visit_date(&mut self, date: Option<NaiveDate>) { self.draft.visit_date = date; }

  pub fn set_start_time(&mut self, slot: Option<TimeSlot>) { self.draft.start_time = slot; }

  pub fn set_end_time(&mut self, slot: Option<TimeSlot>) { self.draft.end_time = slot; }

  pub fn set_is_client(&mut self, is_client: bool) { self.draft.is_client = is_client; }

  pub fn set_needs_catering(&mut self, needs: bool) { self.draft.needs_catering = needs; }

  pub fn set_location(&mut self, location: Option<Location>) { self.draft.location = location; }

  pub fn set_delivery_time(&mut self, slot: Option<TimeSlot>) { self.draft.delivery_time = slot; }

  /// Restore every field to its default, keeping the requester's name.
  pub fn reset(&mut self) { self.draft = Draft::new(self.default_name.clone()); }

  // ── Validation & submit ───────────────────────────────────────────────────

  /// Check the draft as of `today` and build the store input.
  ///
  /// The visit date must fall after `today`. Conditional values whose gate
  /// is off are dropped; when the gate is on they may still be empty.
  pub fn validate(&self, today: NaiveDate) -> Result<NewVisitRequest, ValidationError> {
    let d = &self.draft;
    let visit_date = d.visit_date.filter(|date| *date > today);

    let fields: Vec<Field> = Field::iter()
      .filter(|f| match f {
        Field::VisitDate => d.visit_date.is_none(),
        Field::StartTime => d.start_time.is_none(),
        Field::EndTime => d.end_time.is_none(),
        Field::Location => d.location.is_none(),
        _ => false,
      })
      .collect();
    let out_of_range: Vec<Field> = Field::iter()
      .filter(|f| match f {
        Field::NumberOfPeople => !(1..=MAX_PEOPLE).contains(&d.number_of_people),
        Field::VisitDate => d.visit_date.is_some() && visit_date.is_none(),
        _ => false,
      })
      .collect();

    match (visit_date, d.start_time, d.end_time, d.location) {
      (Some(visit_date), Some(start_time), Some(end_time), Some(location))
        if fields.is_empty() && out_of_range.is_empty() =>
      {
        Ok(NewVisitRequest {
          requester_name: d.requester_name.clone(),
          number_of_people: d.number_of_people,
          visit_date,
          start_time,
          end_time,
          is_client: d.is_client,
          client_number: if d.is_client { d.client_number.clone() } else { String::new() },
          needs_catering: d.needs_catering,
          location,
          delivery_time: d.delivery_time.filter(|_| d.needs_catering),
          allergies: d.allergies.clone(),
          client_reference: d.client_reference.clone(),
          comments: d.comments.clone(),
        })
      }
      _ => Err(ValidationError { fields, out_of_range }),
    }
  }

  /// Validate against the local date and submit.
  pub async fn submit<S: VisitStore>(
    &mut self,
    store: &S,
    requester_id: Uuid,
  ) -> Result<VisitRequest, SubmitError<S::Error>> {
    self.submit_on(store, requester_id, Local::now().date_naive()).await
  }

  /// Validate as of `today`, create the request, then reset the form.
  ///
  /// On any failure the draft is kept as-is so the user can correct it.
  pub async fn submit_on<S: VisitStore>(
    &mut self,
    store: &S,
    requester_id: Uuid,
    today: NaiveDate,
  ) -> Result<VisitRequest, SubmitError<S::Error>> {
    let input = self.validate(today)?;
    let request = store
      .create(requester_id, input)
      .await
      .map_err(SubmitError::Store)?;
    self.reset();
    Ok(request)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::{Days, Utc};

  use super::*;
  use crate::{
    Error,
    request::{Decision, RequestStatus},
  };

  /// Records every `create` so tests can assert it was (not) reached.
  #[derive(Default)]
  struct RecordingStore {
    requests: Mutex<Vec<VisitRequest>>,
  }

  impl RecordingStore {
    fn created(&self) -> usize { self.requests.lock().unwrap().len() }
  }

  impl VisitStore for RecordingStore {
    type Error = Error;

    async fn load(&self) -> Result<Vec<VisitRequest>, Error> { self.list().await }

    async fn list(&self) -> Result<Vec<VisitRequest>, Error> {
      Ok(self.requests.lock().unwrap().clone())
    }

    async fn create(
      &self,
      requester_id: Uuid,
      input: NewVisitRequest,
    ) -> Result<VisitRequest, Error> {
      input.check_headcount()?;
      let request = input.into_request(Uuid::new_v4(), requester_id, Utc::now());
      self.requests.lock().unwrap().push(request.clone());
      Ok(request)
    }

    async fn update_status(&self, id: Uuid, decision: Decision) -> Result<VisitRequest, Error> {
      let mut requests = self.requests.lock().unwrap();
      let request = requests
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(Error::RequestNotFound(id))?;
      request.decide(decision)?;
      Ok(request.clone())
    }
  }

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2030, 1, 10).unwrap() }

  fn slot(s: &str) -> Option<TimeSlot> { Some(s.parse().unwrap()) }

  fn filled_form() -> RequestForm {
    let mut form = RequestForm::new("Alice");
    form.set_number_of_people(2);
    form.set_visit_date(today().checked_add_days(Days::new(3)));
    form.set_start_time(slot("10h00"));
    form.set_end_time(slot("11h00"));
    form.set_location(Some(Location::SiteA));
    form
  }

  #[tokio::test]
  async fn missing_required_fields_never_reach_the_store() {
    let store = RecordingStore::default();
    let requester = Uuid::new_v4();

    let clears: [fn(&mut RequestForm); 4] = [
      |f| f.set_visit_date(None),
      |f| f.set_start_time(None),
      |f| f.set_end_time(None),
      |f| f.set_location(None),
    ];
    let expected = [Field::VisitDate, Field::StartTime, Field::EndTime, Field::Location];

    for (clear, field) in clears.into_iter().zip(expected) {
      let mut form = filled_form();
      clear(&mut form);
      let before = form.draft().clone();

      let err = form.submit_on(&store, requester, today()).await.unwrap_err();
      match err {
        SubmitError::Invalid(v) => assert_eq!(v.fields, vec![field]),
        other => panic!("expected validation failure, got {other}"),
      }
      assert_eq!(form.draft(), &before, "draft must be left untouched");
    }

    assert_eq!(store.created(), 0);
  }

  #[test]
  fn empty_draft_reports_every_required_field() {
    let form = RequestForm::new("Alice");
    let err = form.validate(today()).unwrap_err();
    assert_eq!(
      err.fields,
      vec![Field::VisitDate, Field::StartTime, Field::EndTime, Field::Location]
    );
    assert!(err.to_string().contains("visit date, start time, end time, location"));
  }

  #[test]
  fn visit_date_must_be_after_today() {
    let mut form = filled_form();
    form.set_visit_date(Some(today()));
    let err = form.validate(today()).unwrap_err();
    assert!(err.fields.is_empty());
    assert_eq!(err.out_of_range, vec![Field::VisitDate]);
    assert_eq!(err.to_string(), "the visit date must be after today");

    form.set_visit_date(today().checked_sub_days(Days::new(3)));
    assert_eq!(form.validate(today()).unwrap_err().out_of_range, vec![Field::VisitDate]);

    form.set_visit_date(today().checked_add_days(Days::new(1)));
    assert!(form.validate(today()).is_ok());
  }

  #[test]
  fn headcount_is_clamped() {
    let mut form = RequestForm::new("Alice");
    form.set_number_of_people(0);
    assert_eq!(form.draft().number_of_people, 1);
    form.set_number_of_people(500);
    assert_eq!(form.draft().number_of_people, MAX_PEOPLE);
  }

  #[test]
  fn conditional_fields_follow_their_gate() {
    let mut form = filled_form();
    assert!(!form.visible_fields().contains(&Field::ClientNumber));
    assert!(!form.visible_fields().contains(&Field::DeliveryTime));

    form.set_is_client(true);
    form.set_needs_catering(true);
    assert!(form.visible_fields().contains(&Field::ClientNumber));
    assert!(form.visible_fields().contains(&Field::DeliveryTime));

    // Gated fields may be submitted empty.
    let input = form.validate(today()).unwrap();
    assert!(input.client_number.is_empty());
    assert_eq!(input.delivery_time, None);

    // Values typed before the gate was switched off are dropped.
    if let Some(number) = form.text_mut(Field::ClientNumber) {
      number.push_str("C-042");
    }
    form.set_delivery_time(slot("9h30"));
    form.set_is_client(false);
    form.set_needs_catering(false);
    let input = form.validate(today()).unwrap();
    assert!(input.client_number.is_empty());
    assert_eq!(input.delivery_time, None);
  }

  #[tokio::test]
  async fn successful_submit_creates_pending_and_resets() {
    let store = RecordingStore::default();
    let requester = Uuid::new_v4();
    let mut form = filled_form();
    if let Some(name) = form.text_mut(Field::RequesterName) {
      name.push_str(" M.");
    }
    if let Some(comments) = form.text_mut(Field::Comments) {
      comments.push_str("Badge needed");
    }

    let before = Utc::now();
    let request = form.submit_on(&store, requester, today()).await.unwrap();

    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.requester_id, requester);
    assert_eq!(request.requester_name, "Alice M.");
    assert_eq!(request.comments, "Badge needed");
    assert!(request.created_at >= before);
    assert_eq!(store.created(), 1);

    assert_eq!(form.draft(), &Draft::new("Alice"));
  }

  #[test]
  fn text_mut_only_for_text_fields() {
    let mut form = RequestForm::new("Alice");
    for field in Field::iter() {
      assert_eq!(form.text_mut(field).is_some(), field.is_text(), "{field}");
    }
  }
}
