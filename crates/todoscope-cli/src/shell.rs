use std::io::{BufRead, Write};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use todoscope_core::filter::parse_date_bound;
use todoscope_core::{Action, Binder, TaskApi};
use tracing::{debug, info, instrument};

use crate::cli::parse_page_arg;
use crate::render::Renderer;

pub const PROMPT: &str = "todoscope> ";

const HELP: &str = "\
commands:
  search [TEXT]    filter titles live (blank clears)
  from [DATE]      lower date bound, YYYY-MM-DD (blank clears)
  to [DATE]        upper date bound, YYYY-MM-DD (blank clears)
  filter           apply the date bounds and return to page 1
  page N           show page N
  add TITLE        add a task
  reload           fetch the collection again
  show             print the current page
  help             this text
  quit             leave
commands may be abbreviated to any unique prefix";

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "search", "from", "to", "filter", "page", "add", "reload", "show", "help", "quit", "exit",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Search(String),
    From(Option<NaiveDate>),
    To(Option<NaiveDate>),
    Filter,
    Page(usize),
    Add(String),
    Reload,
    Show,
    Help,
    Quit,
}

/// Parses one line of shell input. Blank lines yield `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ShellCommand>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    let lowered = word.to_ascii_lowercase();
    let known = known_command_names();
    let command = expand_command_abbrev(&lowered, &known)
        .ok_or_else(|| anyhow!("unknown or ambiguous command: {word} (try help)"))?;
    debug!(token = %word, command, "resolved shell command");

    let parsed = match command {
        "search" => ShellCommand::Search(rest.to_string()),
        "from" => ShellCommand::From(parse_date_bound(rest)?),
        "to" => ShellCommand::To(parse_date_bound(rest)?),
        "filter" => ShellCommand::Filter,
        "page" => ShellCommand::Page(parse_page_arg(rest).map_err(|e| anyhow!(e))?),
        "add" => ShellCommand::Add(rest.to_string()),
        "reload" => ShellCommand::Reload,
        "show" => ShellCommand::Show,
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(anyhow!("unhandled command: {other}")),
    };

    Ok(Some(parsed))
}

impl ShellCommand {
    /// The session action this command stands for, if it is a plain one.
    pub fn action(&self) -> Option<Action> {
        match self {
            ShellCommand::Search(text) => Some(Action::EditSearch(text.clone())),
            ShellCommand::From(date) => Some(Action::EditFrom(*date)),
            ShellCommand::To(date) => Some(Action::EditTo(*date)),
            ShellCommand::Filter => Some(Action::ApplyFilter),
            ShellCommand::Page(page) => Some(Action::GoToPage(*page)),
            ShellCommand::Reload => Some(Action::Load),
            ShellCommand::Add(_) | ShellCommand::Show | ShellCommand::Help | ShellCommand::Quit => {
                None
            }
        }
    }
}

/// Loads the collection, then reads commands from `input` until `quit` or
/// end of input, re-rendering after each one.
#[instrument(skip_all)]
pub async fn run<A, R, W>(
    binder: &mut Binder<A>,
    renderer: &Renderer,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: TaskApi,
    R: BufRead,
    W: Write,
{
    info!("starting interactive session");
    binder.init().await;
    renderer.print_view(out, &binder.view())?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("failed to read command")?;

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                renderer.print_error(out, &err.to_string())?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Show => renderer.print_view(out, &binder.view())?,
            ShellCommand::Add(title) => {
                binder.add_task(title).await;
                renderer.print_view(out, &binder.view())?;
            }
            other => {
                if let Some(action) = other.action() {
                    binder.dispatch(action).await;
                }
                renderer.print_view(out, &binder.view())?;
            }
        }
    }

    info!("interactive session finished");
    Ok(())
}
