pub mod cli;
pub mod config;
pub mod render;
pub mod shell;

use std::ffi::OsString;
use std::io::{
  self,
  BufRead,
  IsTerminal,
  Write
};

use anyhow::Context;
use clap::Parser;
use todoscope_core::dates::ConfiguredDates;
use todoscope_core::{
  Binder,
  HttpTaskApi,
  TaskApi
};
use tracing::{
  debug,
  info
};

use crate::cli::Command;
use crate::config::Settings;
use crate::render::Renderer;

/// How the triggering action ended. Failed actions are not fatal to the
/// process, but one-shot commands report them through the exit code.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Outcome {
  Done,
  ActionFailed
}

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<Outcome> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting todoscope"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.rcfile.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );
  if let Some(url) = cli.url {
    cfg.set("api.url", url);
  }

  let mut settings = cfg
    .settings()
    .context("invalid configuration")?;
  settings.color = settings.color
    && io::stdout().is_terminal();

  let runtime =
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .context(
        "failed to start async runtime"
      )?;

  let command =
    cli.command.unwrap_or(Command::Shell);
  let stdin = io::stdin();
  let mut stdout = io::stdout().lock();
  let outcome =
    runtime.block_on(execute(
      &settings,
      command,
      stdin.lock(),
      &mut stdout
    ))?;

  info!(?outcome, "done");
  Ok(outcome)
}

/// Runs one command against the configured endpoint.
#[tracing::instrument(skip(
  settings, input, out
))]
pub async fn execute<R, W>(
  settings: &Settings,
  command: Command,
  input: R,
  out: &mut W
) -> anyhow::Result<Outcome>
where
  R: BufRead,
  W: Write
{
  let dates = ConfiguredDates::new(
    settings.date_mode,
    settings.date_window_ms
  );
  let api = HttpTaskApi::new(
    settings.endpoint.clone(),
    dates
  );
  let binder =
    Binder::new(api, settings.binder);
  let renderer =
    Renderer::new(settings.color);

  drive(binder, &renderer, command, input, out)
    .await
}

/// Same as [`execute`] but over any [`TaskApi`].
pub async fn drive<A, R, W>(
  mut binder: Binder<A>,
  renderer: &Renderer,
  command: Command,
  input: R,
  out: &mut W
) -> anyhow::Result<Outcome>
where
  A: TaskApi,
  R: BufRead,
  W: Write
{
  match command {
    | Command::List {
      search,
      from,
      to,
      page
    } => {
      binder.init().await;
      binder.set_search(search).await;
      binder.set_from(from).await;
      binder.set_to(to).await;
      binder.apply_filter().await;
      binder.go_to_page(page).await;
      renderer
        .print_view(out, &binder.view())?;
      Ok(outcome_of(&binder))
    }
    | Command::Add {
      title
    } => {
      binder.init().await;
      binder
        .add_task(title.join(" "))
        .await;
      renderer
        .print_view(out, &binder.view())?;
      Ok(outcome_of(&binder))
    }
    | Command::Shell => {
      shell::run(
        &mut binder,
        renderer,
        input,
        out
      )
      .await?;
      Ok(Outcome::Done)
    }
  }
}

fn outcome_of<A: TaskApi>(
  binder: &Binder<A>
) -> Outcome {
  if binder.error().is_some() {
    Outcome::ActionFailed
  } else {
    Outcome::Done
  }
}
