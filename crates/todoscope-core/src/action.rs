use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use tracing::{
  debug,
  info,
  warn
};

use crate::error::ClientError;
use crate::session::Session;
use crate::task::Task;

/// Something the user did, or the result of a request the session asked
/// for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  Load,
  Loaded(Vec<Task>),
  LoadFailed(ClientError),
  EditSearch(String),
  EditFrom(Option<NaiveDate>),
  EditTo(Option<NaiveDate>),
  ApplyFilter,
  GoToPage(usize),
  EditNewTitle(String),
  AddTask,
  Added(Task),
  AddFailed(ClientError),
  DismissError(u64)
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ActionKind {
  Load,
  Loaded,
  LoadFailed,
  EditSearch,
  EditFrom,
  EditTo,
  ApplyFilter,
  GoToPage,
  EditNewTitle,
  AddTask,
  Added,
  AddFailed,
  DismissError
}

impl ActionKind {
  pub const ALL: [ActionKind; 13] = [
    ActionKind::Load,
    ActionKind::Loaded,
    ActionKind::LoadFailed,
    ActionKind::EditSearch,
    ActionKind::EditFrom,
    ActionKind::EditTo,
    ActionKind::ApplyFilter,
    ActionKind::GoToPage,
    ActionKind::EditNewTitle,
    ActionKind::AddTask,
    ActionKind::Added,
    ActionKind::AddFailed,
    ActionKind::DismissError
  ];

  pub fn name(self) -> &'static str {
    match self {
      | ActionKind::Load => "load",
      | ActionKind::Loaded => "loaded",
      | ActionKind::LoadFailed => {
        "load-failed"
      }
      | ActionKind::EditSearch => {
        "edit-search"
      }
      | ActionKind::EditFrom => {
        "edit-from"
      }
      | ActionKind::EditTo => "edit-to",
      | ActionKind::ApplyFilter => {
        "apply-filter"
      }
      | ActionKind::GoToPage => {
        "go-to-page"
      }
      | ActionKind::EditNewTitle => {
        "edit-new-title"
      }
      | ActionKind::AddTask => "add-task",
      | ActionKind::Added => "added",
      | ActionKind::AddFailed => {
        "add-failed"
      }
      | ActionKind::DismissError => {
        "dismiss-error"
      }
    }
  }
}

impl Action {
  pub fn kind(&self) -> ActionKind {
    match self {
      | Action::Load => ActionKind::Load,
      | Action::Loaded(_) => {
        ActionKind::Loaded
      }
      | Action::LoadFailed(_) => {
        ActionKind::LoadFailed
      }
      | Action::EditSearch(_) => {
        ActionKind::EditSearch
      }
      | Action::EditFrom(_) => {
        ActionKind::EditFrom
      }
      | Action::EditTo(_) => {
        ActionKind::EditTo
      }
      | Action::ApplyFilter => {
        ActionKind::ApplyFilter
      }
      | Action::GoToPage(_) => {
        ActionKind::GoToPage
      }
      | Action::EditNewTitle(_) => {
        ActionKind::EditNewTitle
      }
      | Action::AddTask => {
        ActionKind::AddTask
      }
      | Action::Added(_) => {
        ActionKind::Added
      }
      | Action::AddFailed(_) => {
        ActionKind::AddFailed
      }
      | Action::DismissError(_) => {
        ActionKind::DismissError
      }
    }
  }
}

/// Network work a handler wants done. The runtime performs it and feeds the
/// outcome back as another action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
  FetchAll,
  Append(String)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
  pub session: Session,
  pub effect:  Option<Effect>
}

impl Step {
  fn idle(session: Session) -> Self {
    Self {
      session,
      effect: None
    }
  }

  fn with_effect(
    session: Session,
    effect: Effect
  ) -> Self {
    Self {
      session,
      effect: Some(effect)
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Context {
  pub now: DateTime<Utc>
}

impl Context {
  pub fn at(now: DateTime<Utc>) -> Self {
    Self {
      now
    }
  }
}

pub type Handler =
  fn(Session, Action, &Context) -> Step;

pub static HANDLERS: &[(
  ActionKind,
  Handler
)] = &[
  (ActionKind::Load, on_load as Handler),
  (
    ActionKind::Loaded,
    on_loaded as Handler
  ),
  (
    ActionKind::LoadFailed,
    on_load_failed as Handler
  ),
  (
    ActionKind::EditSearch,
    on_edit_search as Handler
  ),
  (
    ActionKind::EditFrom,
    on_edit_from as Handler
  ),
  (
    ActionKind::EditTo,
    on_edit_to as Handler
  ),
  (
    ActionKind::ApplyFilter,
    on_apply_filter as Handler
  ),
  (
    ActionKind::GoToPage,
    on_go_to_page as Handler
  ),
  (
    ActionKind::EditNewTitle,
    on_edit_new_title as Handler
  ),
  (
    ActionKind::AddTask,
    on_add_task as Handler
  ),
  (ActionKind::Added, on_added as Handler),
  (
    ActionKind::AddFailed,
    on_add_failed as Handler
  ),
  (
    ActionKind::DismissError,
    on_dismiss_error as Handler
  )
];

pub fn handler_for(
  kind: ActionKind
) -> Option<Handler> {
  HANDLERS
    .iter()
    .find(|(k, _)| *k == kind)
    .map(|(_, handler)| *handler)
}

/// Runs the handler registered for `action`.
#[tracing::instrument(skip_all, fields(action = action.kind().name()))]
pub fn dispatch(
  session: Session,
  action: Action,
  ctx: &Context
) -> Step {
  let kind = action.kind();
  match handler_for(kind) {
    | Some(handler) => {
      handler(session, action, ctx)
    }
    | None => {
      warn!(
        action = kind.name(),
        "no handler registered"
      );
      Step::idle(session)
    }
  }
}

fn on_load(
  session: Session,
  _action: Action,
  _ctx: &Context
) -> Step {
  info!("requesting task list");
  Step::with_effect(
    session,
    Effect::FetchAll
  )
}

fn on_loaded(
  mut session: Session,
  action: Action,
  _ctx: &Context
) -> Step {
  let Action::Loaded(tasks) = action
  else {
    return Step::idle(session);
  };
  session.tasks.replace_all(tasks);
  session.current_page = 1;
  Step::idle(session)
}

fn on_load_failed(
  mut session: Session,
  action: Action,
  ctx: &Context
) -> Step {
  if let Action::LoadFailed(err) = action
  {
    warn!(error = %err, "task list load failed");
    session
      .raise_error(err.message(), ctx.now);
  }
  Step::idle(session)
}

fn on_edit_search(
  mut session: Session,
  action: Action,
  _ctx: &Context
) -> Step {
  if let Action::EditSearch(text) = action
  {
    session.inputs.search = text;
    session.current_page = 1;
  }
  Step::idle(session)
}

fn on_edit_from(
  mut session: Session,
  action: Action,
  _ctx: &Context
) -> Step {
  if let Action::EditFrom(date) = action
    && session.inputs.from != date
  {
    session.inputs.from = date;
    session.current_page = 1;
  }
  Step::idle(session)
}

fn on_edit_to(
  mut session: Session,
  action: Action,
  _ctx: &Context
) -> Step {
  if let Action::EditTo(date) = action
    && session.inputs.to != date
  {
    session.inputs.to = date;
    session.current_page = 1;
  }
  Step::idle(session)
}

fn on_apply_filter(
  mut session: Session,
  _action: Action,
  _ctx: &Context
) -> Step {
  session.current_page = 1;
  Step::idle(session)
}

fn on_go_to_page(
  mut session: Session,
  action: Action,
  _ctx: &Context
) -> Step {
  if let Action::GoToPage(page) = action {
    debug!(page, "switching page");
    session.current_page = page;
  }
  Step::idle(session)
}

fn on_edit_new_title(
  mut session: Session,
  action: Action,
  _ctx: &Context
) -> Step {
  if let Action::EditNewTitle(text) =
    action
  {
    session.inputs.new_title = text;
  }
  Step::idle(session)
}

fn on_add_task(
  session: Session,
  _action: Action,
  _ctx: &Context
) -> Step {
  let title = session
    .inputs
    .new_title
    .trim()
    .to_string();
  if title.is_empty() {
    debug!("ignoring blank title");
    return Step::idle(session);
  }

  Step::with_effect(
    session,
    Effect::Append(title)
  )
}

fn on_added(
  mut session: Session,
  action: Action,
  _ctx: &Context
) -> Step {
  if let Action::Added(task) = action {
    info!(id = task.id, "task added");
    session.tasks.prepend(task);
    session.inputs.new_title.clear();
    session.current_page = 1;
  }
  Step::idle(session)
}

fn on_add_failed(
  mut session: Session,
  action: Action,
  ctx: &Context
) -> Step {
  if let Action::AddFailed(err) = action {
    warn!(error = %err, "task add failed");
    session
      .raise_error(err.message(), ctx.now);
  }
  Step::idle(session)
}

fn on_dismiss_error(
  mut session: Session,
  action: Action,
  _ctx: &Context
) -> Step {
  if let Action::DismissError(seq) = action
  {
    session.dismiss_error(seq);
  }
  Step::idle(session)
}
