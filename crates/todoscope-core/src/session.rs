use chrono::{
  DateTime,
  Duration,
  NaiveDate,
  Utc
};

use crate::filter::FilterCriteria;
use crate::paginate::DEFAULT_PAGE_SIZE;
use crate::store::TaskStore;

pub const DEFAULT_BANNER_TIMEOUT_MS: u64 =
  3_000;

/// Values currently held by the display surface's input fields.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct Inputs {
  pub search:    String,
  pub from:      Option<NaiveDate>,
  pub to:        Option<NaiveDate>,
  pub new_title: String
}

impl Inputs {
  pub fn criteria(&self) -> FilterCriteria {
    FilterCriteria::new(
      self.search.clone(),
      self.from,
      self.to
    )
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct ErrorBanner {
  pub message:   String,
  pub seq:       u64,
  pub raised_at: DateTime<Utc>
}

impl ErrorBanner {
  pub fn visible_at(
    &self,
    now: DateTime<Utc>,
    timeout: Duration
  ) -> bool {
    now - self.raised_at < timeout
  }
}

/// Everything one viewer session owns. Handlers take it by value and hand
/// back the next one.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Session {
  pub tasks:        TaskStore,
  pub current_page: usize,
  pub inputs:       Inputs,
  pub banner:       Option<ErrorBanner>,
  banner_seq:       u64
}

impl Default for Session {
  fn default() -> Self {
    Self {
      tasks:        TaskStore::default(),
      current_page: 1,
      inputs:       Inputs::default(),
      banner:       None,
      banner_seq:   0
    }
  }
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces any visible error and restarts its timer. Returns the new
  /// banner's sequence number for the matching dismiss action.
  pub fn raise_error(
    &mut self,
    message: impl Into<String>,
    now: DateTime<Utc>
  ) -> u64 {
    self.banner_seq += 1;
    self.banner = Some(ErrorBanner {
      message: message.into(),
      seq: self.banner_seq,
      raised_at: now
    });
    self.banner_seq
  }

  /// Clears the banner only if `seq` still names it.
  pub fn dismiss_error(
    &mut self,
    seq: u64
  ) -> bool {
    if self
      .banner
      .as_ref()
      .is_some_and(|b| b.seq == seq)
    {
      self.banner = None;
      true
    } else {
      false
    }
  }
}

/// Knobs the binder needs from configuration.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct BinderSettings {
  pub page_size:      usize,
  pub banner_timeout: Duration
}

impl Default for BinderSettings {
  fn default() -> Self {
    Self {
      page_size:      DEFAULT_PAGE_SIZE,
      banner_timeout:
        Duration::milliseconds(
          DEFAULT_BANNER_TIMEOUT_MS
            as i64
        )
    }
  }
}
