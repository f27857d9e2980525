use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono::Duration;
use todoscope_core::dates::{
  DEFAULT_RANDOM_WINDOW_MS,
  DateMode
};
use todoscope_core::paginate::DEFAULT_PAGE_SIZE;
use todoscope_core::session::{
  BinderSettings,
  DEFAULT_BANNER_TIMEOUT_MS
};
use todoscope_core::DEFAULT_ENDPOINT;
use tracing::{
  debug,
  info,
  trace,
  warn
};

pub const RC_ENV: &str = "TODOSCOPERC";
pub const RC_FILE_NAME: &str =
  ".todoscoperc";

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

/// Typed view of the keys the viewer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub endpoint:       String,
  pub binder:         BinderSettings,
  pub date_mode:      DateMode,
  pub date_window_ms: i64,
  pub color:          bool
}

impl Default for Config {
  fn default() -> Self {
    Self::defaults()
  }
}

impl Config {
  pub fn defaults() -> Self {
    let mut cfg = Config {
      map:          HashMap::new(),
      loaded_files: vec![]
    };

    cfg.set("api.url", DEFAULT_ENDPOINT);
    cfg.set(
      "page.size",
      DEFAULT_PAGE_SIZE.to_string()
    );
    cfg.set(
      "banner.timeout",
      DEFAULT_BANNER_TIMEOUT_MS.to_string()
    );
    cfg.set("dates.synthesize", "random");
    cfg.set(
      "dates.window",
      DEFAULT_RANDOM_WINDOW_MS.to_string()
    );
    cfg.set("color", "on");
    cfg
  }

  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::defaults();

    let rc =
      resolve_rc_path(rc_override)?;
    if let Some(path) = rc {
      info!(rc = %path.display(), "loading rc file");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no rc file found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn set(
    &mut self,
    key: &str,
    value: impl Into<String>
  ) {
    self
      .map
      .insert(key.to_string(), value.into());
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .map(|v| parse_bool(v))
  }

  pub fn settings(
    &self
  ) -> anyhow::Result<Settings> {
    let endpoint = self
      .get("api.url")
      .map(|url| url.trim().to_string())
      .filter(|url| !url.is_empty())
      .ok_or_else(|| {
        anyhow!("api.url cannot be empty")
      })?;

    let page_size: usize =
      self.parse_key("page.size")?;
    if page_size == 0 {
      return Err(anyhow!(
        "page.size must be at least 1"
      ));
    }

    let banner_ms: u64 =
      self.parse_key("banner.timeout")?;
    let date_window_ms: i64 =
      self.parse_key("dates.window")?;
    if date_window_ms < 0 {
      return Err(anyhow!(
        "dates.window cannot be \
         negative"
      ));
    }

    let date_mode = self
      .get("dates.synthesize")
      .unwrap_or_else(|| {
        "random".to_string()
      })
      .parse::<DateMode>()
      .map_err(|e| anyhow!(e))?;

    Ok(Settings {
      endpoint,
      binder: BinderSettings {
        page_size,
        banner_timeout:
          Duration::milliseconds(
            i64::try_from(banner_ms)
              .context(
                "banner.timeout is too \
                 large"
              )?
          )
      },
      date_mode,
      date_window_ms,
      color: self
        .get_bool("color")
        .unwrap_or(true)
    })
  }

  fn parse_key<T>(
    &self,
    key: &str
  ) -> anyhow::Result<T>
  where
    T: std::str::FromStr,
    T::Err: std::fmt::Display
  {
    let raw =
      self.get(key).ok_or_else(|| {
        anyhow!("missing config key {key}")
      })?;
    raw.trim().parse::<T>().map_err(|e| {
      anyhow!(
        "invalid value for {key}: \
         {raw} ({e})"
      )
    })
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) = std::env::var(RC_ENV)
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir() else {
    warn!(
      "cannot determine home \
       directory; skipping rc file"
    );
    return Ok(None);
  };
  let candidate = home.join(RC_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}
