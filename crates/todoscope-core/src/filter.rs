use chrono::NaiveDate;
use tracing::trace;

use crate::task::{
  DATE_FORMAT,
  Task
};

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct FilterCriteria {
  pub search: String,
  pub from:   Option<NaiveDate>,
  pub to:     Option<NaiveDate>
}

#[derive(Debug, thiserror::Error)]
#[error(
  "invalid date '{input}', expected \
   YYYY-MM-DD"
)]
pub struct DateBoundError {
  pub input: String
}

impl FilterCriteria {
  pub fn new(
    search: impl Into<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>
  ) -> Self {
    Self {
      search: search.into(),
      from,
      to
    }
  }

  pub fn is_empty(&self) -> bool {
    self.search.is_empty()
      && self.from.is_none()
      && self.to.is_none()
  }

  pub fn matches(
    &self,
    task: &Task
  ) -> bool {
    let needle =
      self.search.to_lowercase();
    matches_with_needle(
      self, &needle, task
    )
  }
}

/// Keeps the tasks whose title contains the search text (case-insensitive)
/// and whose date lies inside the optional bounds. Input order is kept.
#[tracing::instrument(skip_all, fields(
  total = tasks.len(),
  search = %criteria.search
))]
pub fn filter_tasks(
  tasks: &[Task],
  criteria: &FilterCriteria
) -> Vec<Task> {
  let needle =
    criteria.search.to_lowercase();

  let kept: Vec<Task> = tasks
    .iter()
    .filter(|task| {
      matches_with_needle(
        criteria, &needle, task
      )
    })
    .cloned()
    .collect();

  trace!(
    kept = kept.len(),
    "filtered tasks"
  );
  kept
}

fn matches_with_needle(
  criteria: &FilterCriteria,
  needle: &str,
  task: &Task
) -> bool {
  if !needle.is_empty()
    && !task
      .title
      .to_lowercase()
      .contains(needle)
  {
    return false;
  }

  if let Some(from) = criteria.from
    && task.date < from
  {
    return false;
  }

  if let Some(to) = criteria.to
    && task.date > to
  {
    return false;
  }

  true
}

/// Turns the text of a date field into a bound. Blank means unbounded.
pub fn parse_date_bound(
  raw: &str
) -> Result<Option<NaiveDate>, DateBoundError>
{
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }

  NaiveDate::parse_from_str(
    trimmed,
    DATE_FORMAT
  )
  .map(Some)
  .map_err(|_| {
    DateBoundError {
      input: trimmed.to_string()
    }
  })
}
