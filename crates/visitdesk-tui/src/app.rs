//! Application state machine and event dispatcher.

use chrono::{Days, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use visitdesk_core::{
  form::{Field, RequestForm, SubmitError},
  identity::{Identity, Role},
  request::{Decision, Location, TimeSlot, VisitRequest},
  session::{AuthAction, Credentials, Session, StubAuthenticator},
  store::VisitStore,
  view::{Stats, View, can_decide},
};
use visitdesk_store_sqlite::SqliteStore;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Anonymous: the sign-in / register form.
  Login,
  /// Authenticated: role-specific tabs.
  Dashboard,
}

/// One dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  NewRequest,
  Requests(View),
}

impl Tab {
  /// Tabs for `role`, the landing tab first.
  pub fn for_role(role: Role) -> Vec<Tab> {
    let mut tabs = Vec::new();
    if role == Role::Requester {
      tabs.push(Tab::NewRequest);
    }
    tabs.extend(View::for_role(role).iter().copied().map(Tab::Requests));
    tabs
  }

  pub fn title(self) -> String {
    match self {
      Tab::NewRequest => "New request".to_string(),
      Tab::Requests(view) => view.to_string(),
    }
  }
}

// ─── Login form ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
  Email,
  Password,
  Name,
}

impl LoginField {
  fn next(self) -> Self {
    match self {
      Self::Email => Self::Password,
      Self::Password => Self::Name,
      Self::Name => Self::Email,
    }
  }

  fn prev(self) -> Self {
    match self {
      Self::Email => Self::Name,
      Self::Password => Self::Email,
      Self::Name => Self::Password,
    }
  }
}

/// What is typed on the login screen.
#[derive(Debug, Clone)]
pub struct LoginForm {
  pub credentials: Credentials,
  pub focus:       LoginField,
  pub action:      AuthAction,
}

impl Default for LoginForm {
  fn default() -> Self {
    Self {
      credentials: Credentials::default(),
      focus:       LoginField::Email,
      action:      AuthAction::Login,
    }
  }
}

impl LoginForm {
  fn focused_mut(&mut self) -> &mut String {
    match self.focus {
      LoginField::Email => &mut self.credentials.email,
      LoginField::Password => &mut self.credentials.password,
      LoginField::Name => &mut self.credentials.name,
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen.
  pub screen: Screen,

  pub session: Session,

  pub login: LoginForm,

  /// Snapshot of the store's collection, refreshed after every mutation.
  pub requests: Vec<VisitRequest>,

  /// Tabs for the signed-in role.
  pub tabs: Vec<Tab>,

  pub tab_index: usize,

  /// The requester's draft.
  pub form: RequestForm,

  /// Index into `form.visible_fields()`.
  pub form_cursor: usize,

  /// Cursor position within the *filtered* request list.
  pub list_cursor: usize,

  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// A sign-in is waiting to run after the next frame is drawn.
  pub busy: bool,

  store: SqliteStore,
  auth:  StubAuthenticator,
}

impl App {
  pub fn new(store: SqliteStore, auth: StubAuthenticator) -> Self {
    Self {
      screen: Screen::Login,
      session: Session::default(),
      login: LoginForm::default(),
      requests: Vec::new(),
      tabs: Vec::new(),
      tab_index: 0,
      form: RequestForm::new(""),
      form_cursor: 0,
      list_cursor: 0,
      filter: String::new(),
      filter_active: false,
      status_msg: String::new(),
      busy: false,
      store,
      auth,
    }
  }

  pub fn identity(&self) -> Option<&Identity> { self.session.identity() }

  pub fn current_tab(&self) -> Option<Tab> { self.tabs.get(self.tab_index).copied() }

  pub fn stats(&self) -> Stats { Stats::tally(&self.requests) }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Re-read the in-memory collection from the store.
  async fn refresh(&mut self) -> anyhow::Result<()> {
    self.requests = self.store.list().await?;
    self.clamp_list_cursor();
    Ok(())
  }

  /// Rehydrate from the persisted snapshot. A failed read keeps the current
  /// list on screen.
  async fn reload(&mut self) {
    match self.store.load().await {
      Ok(requests) => {
        self.requests = requests;
        self.clamp_list_cursor();
        self.status_msg = format!("Reloaded {} requests", self.requests.len());
      }
      Err(e) => {
        tracing::warn!(error = %e, "reload failed");
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Requests in the current tab's view that match the filter query.
  pub fn visible_requests(&self) -> Vec<&VisitRequest> {
    let (Some(identity), Some(Tab::Requests(view))) = (self.identity(), self.current_tab())
    else {
      return Vec::new();
    };

    let selected = view.select(&self.requests, identity);
    if self.filter.is_empty() {
      return selected;
    }
    let matcher = SkimMatcherV2::default();
    selected
      .into_iter()
      .filter(|r| {
        matcher.fuzzy_match(&r.requester_name, &self.filter).is_some()
          || matcher
            .fuzzy_match(&r.location.to_string(), &self.filter)
            .is_some()
      })
      .collect()
  }

  /// The request under the list cursor, if any.
  pub fn cursor_request(&self) -> Option<&VisitRequest> {
    self.visible_requests().get(self.list_cursor).copied()
  }

  /// Whether approve/reject applies to the request under the cursor.
  pub fn cursor_decidable(&self) -> bool {
    match (self.identity(), self.current_tab(), self.cursor_request()) {
      (Some(identity), Some(Tab::Requests(view)), Some(request)) => {
        can_decide(identity, view, request)
      }
      _ => false,
    }
  }

  fn clamp_list_cursor(&mut self) {
    let len = self.visible_requests().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global: Ctrl-C quits from anywhere.
    if ctrl && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // Input is ignored while a sign-in is in flight.
    if self.busy {
      return Ok(true);
    }

    match self.screen {
      Screen::Login => Ok(self.handle_login_key(key)),
      Screen::Dashboard => {
        if self.filter_active {
          self.handle_filter_key(key);
          return Ok(true);
        }
        if ctrl && key.code == KeyCode::Char('l') {
          self.logout();
          return Ok(true);
        }
        match key.code {
          KeyCode::Tab => self.switch_tab(true),
          KeyCode::BackTab => self.switch_tab(false),
          _ => match self.current_tab() {
            Some(Tab::NewRequest) => self.handle_form_key(key).await?,
            Some(Tab::Requests(_)) => return self.handle_list_key(key).await,
            None => {}
          },
        }
        Ok(true)
      }
    }
  }

  fn handle_login_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => return false,

      KeyCode::Tab | KeyCode::Down => self.login.focus = self.login.focus.next(),
      KeyCode::BackTab | KeyCode::Up => self.login.focus = self.login.focus.prev(),

      KeyCode::Left | KeyCode::Right => {
        self.login.credentials.role = match self.login.credentials.role {
          Role::Requester => Role::Approver,
          Role::Approver => Role::Requester,
        };
      }
      KeyCode::F(2) => {
        self.login.action = match self.login.action {
          AuthAction::Login => AuthAction::Register,
          AuthAction::Register => AuthAction::Login,
        };
      }

      KeyCode::Enter => match self.login.credentials.check(self.login.action) {
        Ok(()) => {
          self.busy = true;
          self.status_msg = "Signing in…".into();
        }
        Err(e) => self.status_msg = format!("Error: {e}"),
      },

      KeyCode::Backspace => {
        self.login.focused_mut().pop();
      }
      KeyCode::Char(c) => self.login.focused_mut().push(c),

      _ => {}
    }
    true
  }

  /// Run the sign-in queued by the login form, then open the dashboard.
  pub async fn finish_sign_in(&mut self) -> anyhow::Result<()> {
    self.busy = false;
    let signed_in = self
      .session
      .sign_in(&self.auth, self.login.action, &self.login.credentials)
      .await;

    match signed_in {
      Ok(identity) => self.enter_dashboard(identity).await,
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Ok(())
      }
    }
  }

  async fn enter_dashboard(&mut self, identity: Identity) -> anyhow::Result<()> {
    tracing::info!(id = %identity.id, role = %identity.role, "signed in");

    self.tabs = Tab::for_role(identity.role);
    self.tab_index = 0;
    self.form = RequestForm::new(identity.name.clone());
    self.form_cursor = 0;
    self.list_cursor = 0;
    self.filter.clear();
    self.login.credentials.password.clear();
    self.screen = Screen::Dashboard;
    self.status_msg = format!("Welcome {}", identity.name);
    self.refresh().await
  }

  fn logout(&mut self) {
    if let Some(identity) = self.session.logout() {
      tracing::info!(id = %identity.id, "signed out");
    }
    self.screen = Screen::Login;
    self.tabs.clear();
    self.requests.clear();
    self.status_msg.clear();
  }

  fn switch_tab(&mut self, forward: bool) {
    let len = self.tabs.len();
    if len == 0 {
      return;
    }
    self.tab_index = if forward {
      (self.tab_index + 1) % len
    } else {
      (self.tab_index + len - 1) % len
    };
    self.list_cursor = 0;
    self.filter.clear();
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.filter.pop();
      }
      KeyCode::Char(c) => self.filter.push(c),
      _ => {}
    }
    self.list_cursor = 0;
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_requests().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      // Approver actions
      KeyCode::Char('a') => self.decide(Decision::Approve).await?,
      KeyCode::Char('r') => self.decide(Decision::Reject).await?,

      KeyCode::Char('R') | KeyCode::F(5) => self.reload().await,

      _ => {}
    }
    Ok(true)
  }

  async fn decide(&mut self, decision: Decision) -> anyhow::Result<()> {
    let target = self
      .cursor_request()
      .filter(|_| self.cursor_decidable())
      .map(|r| r.id);
    let Some(id) = target else {
      self.status_msg = "Nothing to approve or reject here".into();
      return Ok(());
    };

    match self.store.update_status(id, decision).await {
      Ok(updated) => {
        self.status_msg = format!("Request from {} {}", updated.requester_name, updated.status);
      }
      Err(e) => {
        tracing::warn!(%id, error = %e, "status update refused");
        self.status_msg = format!("Error: {e}");
      }
    }
    self.refresh().await
  }

  // ── Request form ──────────────────────────────────────────────────────────

  /// The field under the form cursor.
  pub fn focused_field(&self) -> Option<Field> {
    self.form.visible_fields().get(self.form_cursor).copied()
  }

  async fn handle_form_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    let field = self.focused_field();
    match (key.code, field) {
      (KeyCode::Up, _) => self.form_cursor = self.form_cursor.saturating_sub(1),
      (KeyCode::Down, _) => self.form_cursor += 1,

      (KeyCode::Enter, _) => self.submit_form().await?,

      (KeyCode::Left, Some(f)) => self.adjust(f, false),
      (KeyCode::Right, Some(f)) => self.adjust(f, true),
      (KeyCode::Char(' '), Some(f @ (Field::IsClient | Field::NeedsCatering))) => {
        self.adjust(f, true);
      }

      (KeyCode::Char(c), Some(f)) => {
        if let Some(text) = self.form.text_mut(f) {
          text.push(c);
        }
      }
      (KeyCode::Backspace, Some(f)) => {
        if let Some(text) = self.form.text_mut(f) {
          text.pop();
        }
      }

      _ => {}
    }

    // Gated fields may have disappeared under the cursor.
    let len = self.form.visible_fields().len();
    self.form_cursor = self.form_cursor.min(len.saturating_sub(1));
    Ok(())
  }

  /// Step a choice field forwards or backwards.
  fn adjust(&mut self, field: Field, forward: bool) {
    let draft = self.form.draft().clone();
    match field {
      Field::NumberOfPeople => {
        let n = draft.number_of_people;
        self.form.set_number_of_people(if forward { n + 1 } else { n.saturating_sub(1) });
      }
      Field::VisitDate => {
        let earliest = tomorrow();
        self.form.set_visit_date(Some(step_date(draft.visit_date, forward, earliest)));
      }
      Field::StartTime => self.form.set_start_time(Some(step_slot(draft.start_time, forward))),
      Field::EndTime => self.form.set_end_time(Some(step_slot(draft.end_time, forward))),
      Field::DeliveryTime => {
        self.form.set_delivery_time(Some(step_slot(draft.delivery_time, forward)));
      }
      Field::IsClient => self.form.set_is_client(!draft.is_client),
      Field::NeedsCatering => self.form.set_needs_catering(!draft.needs_catering),
      Field::Location => self.form.set_location(Some(step_location(draft.location, forward))),
      Field::RequesterName
      | Field::ClientNumber
      | Field::Allergies
      | Field::ClientReference
      | Field::Comments => {}
    }
  }

  async fn submit_form(&mut self) -> anyhow::Result<()> {
    let Some(requester_id) = self.identity().map(|i| i.id) else {
      return Ok(());
    };

    match self.form.submit(&self.store, requester_id).await {
      Ok(request) => {
        tracing::debug!(id = %request.id, "draft submitted");
        self.status_msg = "Request sent to the approvers".into();
        self.form_cursor = 0;
        self.refresh().await?;
      }
      Err(SubmitError::Invalid(e)) => self.status_msg = format!("Error: {e}"),
      Err(SubmitError::Store(e)) => {
        tracing::warn!(error = %e, "could not save visit request");
        self.status_msg = format!("Error: {e}");
      }
    }
    Ok(())
  }
}

// ─── Value stepping ───────────────────────────────────────────────────────────

/// The first day a visit may be booked for.
fn tomorrow() -> NaiveDate {
  let today = Local::now().date_naive();
  today.checked_add_days(Days::new(1)).unwrap_or(today)
}

fn step_date(current: Option<NaiveDate>, forward: bool, earliest: NaiveDate) -> NaiveDate {
  let Some(date) = current else {
    return earliest;
  };
  let stepped = if forward {
    date.checked_add_days(Days::new(1))
  } else {
    date.checked_sub_days(Days::new(1))
  };
  stepped.filter(|d| *d >= earliest).unwrap_or(date)
}

fn step_slot(current: Option<TimeSlot>, forward: bool) -> TimeSlot {
  match (current, forward) {
    (None, true) => TimeSlot::first(),
    (None, false) => TimeSlot::all().last().unwrap_or_else(TimeSlot::first),
    (Some(slot), true) => slot.next().unwrap_or(slot),
    (Some(slot), false) => slot.prev().unwrap_or(slot),
  }
}

fn step_location(current: Option<Location>, forward: bool) -> Location {
  match (current, forward) {
    (None | Some(Location::SiteB), true) => Location::SiteA,
    (Some(Location::SiteA), true) => Location::SiteB,
    (None | Some(Location::SiteA), false) => Location::SiteB,
    (Some(Location::SiteB), false) => Location::SiteA,
  }
}
