use chrono::Duration;
use todoscope_core::dates::{
  DEFAULT_RANDOM_WINDOW_MS,
  DateMode
};
use todoscope_core::session::BinderSettings;
use todoscope_core::DEFAULT_ENDPOINT;

/// Frontend settings, read from `<meta name="todoscope-*">` tags in the
/// host page. Missing or unparsable tags fall back to the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct UiSettings {
  pub endpoint:       String,
  pub binder:         BinderSettings,
  pub date_mode:      DateMode,
  pub date_window_ms: i64
}

impl Default for UiSettings {
  fn default() -> Self {
    Self {
      endpoint:       DEFAULT_ENDPOINT
        .to_string(),
      binder:         BinderSettings::default(),
      date_mode:      DateMode::Random,
      date_window_ms: DEFAULT_RANDOM_WINDOW_MS
    }
  }
}

impl UiSettings {
  pub fn from_document() -> Self {
    Self::from_lookup(meta_content)
  }

  fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>
  {
    let mut settings = Self::default();

    if let Some(url) =
      lookup("todoscope-endpoint")
      && !url.trim().is_empty()
    {
      settings.endpoint =
        url.trim().to_string();
    }

    if let Some(size) =
      lookup("todoscope-page-size")
        .and_then(|raw| {
          raw.trim().parse::<usize>().ok()
        })
        .filter(|size| *size > 0)
    {
      settings.binder.page_size = size;
    }

    if let Some(ms) =
      lookup("todoscope-banner-timeout")
        .and_then(|raw| {
          raw.trim().parse::<i64>().ok()
        })
        .filter(|ms| *ms >= 0)
    {
      settings.binder.banner_timeout =
        Duration::milliseconds(ms);
    }

    if let Some(mode) =
      lookup("todoscope-dates")
        .and_then(|raw| {
          raw.parse::<DateMode>().ok()
        })
    {
      settings.date_mode = mode;
    }

    if let Some(window) =
      lookup("todoscope-date-window")
        .and_then(|raw| {
          raw.trim().parse::<i64>().ok()
        })
        .filter(|ms| *ms >= 0)
    {
      settings.date_window_ms = window;
    }

    tracing::debug!(
      endpoint = %settings.endpoint,
      page_size = settings.binder.page_size,
      "resolved frontend settings"
    );
    settings
  }

  pub fn banner_timeout_ms(&self) -> u32 {
    u32::try_from(
      self
        .binder
        .banner_timeout
        .num_milliseconds()
        .max(0)
    )
    .unwrap_or(u32::MAX)
  }
}

fn meta_content(
  name: &str
) -> Option<String> {
  web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| {
      document
        .query_selector(&format!(
          "meta[name=\"{name}\"]"
        ))
        .ok()
        .flatten()
    })
    .and_then(|meta| {
      meta.get_attribute("content")
    })
}
