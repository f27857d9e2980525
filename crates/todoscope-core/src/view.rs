use chrono::{
  DateTime,
  Utc
};

use crate::filter::filter_tasks;
use crate::paginate::{
  page_count,
  paginate
};
use crate::session::{
  BinderSettings,
  Session
};

pub const EMPTY_PLACEHOLDER: &str =
  "No tasks found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
  pub id:        u64,
  pub line:      String,
  pub completed: bool
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct PageControl {
  pub number: usize,
  pub active: bool
}

/// What a display surface should show for one session at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
  pub rows:          Vec<Row>,
  pub placeholder:   Option<&'static str>,
  pub pages:         Vec<PageControl>,
  pub current_page:  usize,
  pub total_matches: usize,
  pub banner:        Option<String>
}

impl View {
  /// Text lines of the list region, placeholder included.
  pub fn lines(&self) -> Vec<String> {
    match self.placeholder {
      | Some(text) => {
        vec![text.to_string()]
      }
      | None => self
        .rows
        .iter()
        .map(|row| row.line.clone())
        .collect()
    }
  }
}

#[tracing::instrument(skip_all, fields(page = session.current_page))]
pub fn render(
  session: &Session,
  settings: &BinderSettings,
  now: DateTime<Utc>
) -> View {
  let filtered = filter_tasks(
    session.tasks.as_slice(),
    &session.inputs.criteria()
  );
  let visible = paginate(
    &filtered,
    session.current_page,
    settings.page_size
  );

  let rows: Vec<Row> = visible
    .iter()
    .map(|task| {
      Row {
        id:        task.id,
        line:      task.display_line(),
        completed: task.completed
      }
    })
    .collect();
  let placeholder = if rows.is_empty() {
    Some(EMPTY_PLACEHOLDER)
  } else {
    None
  };

  let pages = (1..=page_count(
    filtered.len(),
    settings.page_size
  ))
    .map(|number| {
      PageControl {
        number,
        active: number
          == session.current_page
      }
    })
    .collect();

  let banner = session
    .banner
    .as_ref()
    .filter(|banner| {
      banner.visible_at(
        now,
        settings.banner_timeout
      )
    })
    .map(|banner| banner.message.clone());

  View {
    rows,
    placeholder,
    pages,
    current_page: session.current_page,
    total_matches: filtered.len(),
    banner
  }
}
