use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use tracing::debug;

use crate::action::{
  self,
  Action,
  Context,
  Effect
};
use crate::client::TaskApi;
use crate::session::{
  BinderSettings,
  ErrorBanner,
  Session
};
use crate::view::{
  View,
  render
};

/// Drives a [`Session`] against a [`TaskApi`]: runs each action through the
/// dispatch table, performs the requested effect, and feeds the result back.
pub struct Binder<A> {
  session:  Session,
  api:      A,
  settings: BinderSettings
}

impl<A: TaskApi> Binder<A> {
  pub fn new(
    api: A,
    settings: BinderSettings
  ) -> Self {
    Self {
      session: Session::new(),
      api,
      settings
    }
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn settings(
    &self
  ) -> &BinderSettings {
    &self.settings
  }

  pub fn api(&self) -> &A {
    &self.api
  }

  #[tracing::instrument(skip(self, action), fields(action = action.kind().name()))]
  pub async fn dispatch(
    &mut self,
    action: Action
  ) {
    let mut pending = Some(action);
    while let Some(action) = pending.take()
    {
      let ctx = Context::at(Utc::now());
      let session =
        std::mem::take(&mut self.session);
      let step = action::dispatch(
        session, action, &ctx
      );
      self.session = step.session;

      if let Some(effect) = step.effect {
        pending =
          Some(self.perform(effect).await);
      }
    }
  }

  /// Executes one effect and reports its outcome as an action.
  pub async fn perform(
    &self,
    effect: Effect
  ) -> Action {
    debug!(?effect, "performing effect");
    perform_effect(&self.api, effect)
      .await
  }

  pub async fn init(&mut self) {
    self.dispatch(Action::Load).await;
  }

  pub async fn set_search(
    &mut self,
    text: impl Into<String>
  ) {
    self
      .dispatch(Action::EditSearch(
        text.into()
      ))
      .await;
  }

  pub async fn set_from(
    &mut self,
    date: Option<NaiveDate>
  ) {
    self
      .dispatch(Action::EditFrom(date))
      .await;
  }

  pub async fn set_to(
    &mut self,
    date: Option<NaiveDate>
  ) {
    self
      .dispatch(Action::EditTo(date))
      .await;
  }

  pub async fn apply_filter(&mut self) {
    self
      .dispatch(Action::ApplyFilter)
      .await;
  }

  pub async fn go_to_page(
    &mut self,
    page: usize
  ) {
    self
      .dispatch(Action::GoToPage(page))
      .await;
  }

  /// Types `title` into the add field and submits it.
  pub async fn add_task(
    &mut self,
    title: impl Into<String>
  ) {
    self
      .dispatch(Action::EditNewTitle(
        title.into()
      ))
      .await;
    self.dispatch(Action::AddTask).await;
  }

  pub fn view(&self) -> View {
    self.view_at(Utc::now())
  }

  pub fn view_at(
    &self,
    now: DateTime<Utc>
  ) -> View {
    render(
      &self.session,
      &self.settings,
      now
    )
  }

  pub fn error(
    &self
  ) -> Option<&ErrorBanner> {
    self.session.banner.as_ref()
  }
}

/// Shared by the binder and by surfaces that run effects on their own
/// executor.
pub async fn perform_effect<A: TaskApi>(
  api: &A,
  effect: Effect
) -> Action {
  match effect {
    | Effect::FetchAll => {
      match api.fetch_all().await {
        | Ok(tasks) => {
          Action::Loaded(tasks)
        }
        | Err(err) => {
          Action::LoadFailed(err)
        }
      }
    }
    | Effect::Append(title) => {
      match api.append(&title).await {
        | Ok(task) => Action::Added(task),
        | Err(err) => {
          Action::AddFailed(err)
        }
      }
    }
  }
}
