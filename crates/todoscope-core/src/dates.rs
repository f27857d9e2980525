use std::str::FromStr;

use chrono::{
  Duration,
  NaiveDate,
  Utc
};
use rand::Rng;
use tracing::trace;

/// Default spread for synthesized dates: 1e10 ms, a little under 116 days.
pub const DEFAULT_RANDOM_WINDOW_MS: i64 =
  10_000_000_000;

/// Where task dates come from. The endpoint carries no date, so fetched
/// records get a synthesized one and appended records get today.
pub trait DateSource {
  fn today(&self) -> NaiveDate;

  fn synthesize(&self) -> NaiveDate;
}

/// Uniformly random date within `window` before now (UTC).
#[derive(Debug, Clone, Copy)]
pub struct RandomRecentDates {
  window_ms: i64
}

impl RandomRecentDates {
  pub fn new(window_ms: i64) -> Self {
    Self {
      window_ms: window_ms.max(0)
    }
  }
}

impl Default for RandomRecentDates {
  fn default() -> Self {
    Self::new(DEFAULT_RANDOM_WINDOW_MS)
  }
}

impl DateSource for RandomRecentDates {
  fn today(&self) -> NaiveDate {
    Utc::now().date_naive()
  }

  fn synthesize(&self) -> NaiveDate {
    let offset = if self.window_ms == 0 {
      0
    } else {
      rand::thread_rng()
        .gen_range(0..self.window_ms)
    };
    trace!(
      offset_ms = offset,
      "synthesized task date"
    );
    (Utc::now()
      - Duration::milliseconds(offset))
    .date_naive()
  }
}

/// Every fetched task is dated on the day it was fetched.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodayDates;

impl DateSource for TodayDates {
  fn today(&self) -> NaiveDate {
    Utc::now().date_naive()
  }

  fn synthesize(&self) -> NaiveDate {
    self.today()
  }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDates {
  pub today:       NaiveDate,
  pub synthesized: NaiveDate
}

impl DateSource for FixedDates {
  fn today(&self) -> NaiveDate {
    self.today
  }

  fn synthesize(&self) -> NaiveDate {
    self.synthesized
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum DateMode {
  Random,
  Today
}

impl FromStr for DateMode {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "random" => Ok(Self::Random),
      | "today" | "fetch" => {
        Ok(Self::Today)
      }
      | other => Err(format!(
        "unknown date mode: {other} \
         (expected random or today)"
      ))
    }
  }
}

/// Runtime-selected date source.
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredDates {
  Random(RandomRecentDates),
  Today(TodayDates)
}

impl ConfiguredDates {
  pub fn new(
    mode: DateMode,
    window_ms: i64
  ) -> Self {
    match mode {
      | DateMode::Random => Self::Random(
        RandomRecentDates::new(window_ms)
      ),
      | DateMode::Today => {
        Self::Today(TodayDates)
      }
    }
  }
}

impl DateSource for ConfiguredDates {
  fn today(&self) -> NaiveDate {
    match self {
      | Self::Random(inner) => {
        inner.today()
      }
      | Self::Today(inner) => {
        inner.today()
      }
    }
  }

  fn synthesize(&self) -> NaiveDate {
    match self {
      | Self::Random(inner) => {
        inner.synthesize()
      }
      | Self::Today(inner) => {
        inner.synthesize()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn random_dates_stay_inside_window() {
    let source =
      RandomRecentDates::default();
    let today = Utc::now().date_naive();
    let earliest = (Utc::now()
      - Duration::milliseconds(
        DEFAULT_RANDOM_WINDOW_MS
      ))
    .date_naive();

    for _ in 0..200 {
      let date = source.synthesize();
      assert!(
        date <= today,
        "{date} after {today}"
      );
      assert!(
        date >= earliest,
        "{date} before {earliest}"
      );
    }
  }

  #[test]
  fn zero_window_is_today() {
    let source = RandomRecentDates::new(0);
    assert_eq!(
      source.synthesize(),
      Utc::now().date_naive()
    );
  }

  #[test]
  fn today_mode_is_deterministic() {
    let source = ConfiguredDates::new(
      DateMode::Today,
      DEFAULT_RANDOM_WINDOW_MS
    );
    assert_eq!(
      source.synthesize(),
      source.today()
    );
  }

  #[test]
  fn date_mode_parses_known_names() {
    assert_eq!(
      "random".parse::<DateMode>(),
      Ok(DateMode::Random)
    );
    assert_eq!(
      " Today ".parse::<DateMode>(),
      Ok(DateMode::Today)
    );
    assert!(
      "weekly".parse::<DateMode>().is_err()
    );
  }
}
