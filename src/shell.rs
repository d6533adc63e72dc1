//! Line-oriented terminal driver for [`App`].
//!
//! DESIGN
//! ======
//! One task multiplexes four event sources: input lines, session changes,
//! notification changes, and settled form submissions. The screen is
//! redrawn after every event, so toasts appear and expire without input.
//! Submissions run as separate tasks so a slow request never blocks typing;
//! at end of input any still in flight are awaited before exiting.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;

use crate::app::{AfterSubmit, App, Screen};

pub const HELP: &str = "\
commands:
  go <path>             open a route (/dashboard, /jobs/new, /jobs/<id>, ...)
  set <field> <value>   edit a field of the current form
  submit                submit the current form
  delete                delete the job being viewed
  dismiss <id>          close a notification
  refresh               reload the current screen
  logout                sign out
  help                  show this list
  quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Set { field: String, value: String },
    Submit,
    Dismiss(u64),
    Delete,
    Logout,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument { command: &'static str, argument: &'static str },
    #[error("`{0}` is not a notification id")]
    InvalidId(String),
}

/// Parse one input line.
///
/// # Errors
///
/// Returns a [`CommandError`] describing why the line is not a command.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "go" | "open" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument { command: "go", argument: "a path" });
            }
            let path = if rest.starts_with('/') { rest.to_owned() } else { format!("/{rest}") };
            Ok(Command::Go(path))
        }
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(CommandError::MissingArgument { command: "set", argument: "a field name" });
            }
            Ok(Command::Set { field: field.to_owned(), value: value.trim_start().to_owned() })
        }
        "dismiss" => rest
            .parse::<u64>()
            .map(Command::Dismiss)
            .map_err(|_| CommandError::InvalidId(rest.to_owned())),
        "submit" => Ok(Command::Submit),
        "delete" => Ok(Command::Delete),
        "logout" => Ok(Command::Logout),
        "refresh" | "reload" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}

/// Drive `app` from `input` until `quit` or end of input, drawing to `output`.
///
/// # Errors
///
/// Returns any I/O error from reading input or writing output.
pub async fn run<R, W>(app: &mut App, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut session_rx = app.context().session.subscribe();
    let mut notifications_rx = app.context().notifications.subscribe();
    let mut pending: JoinSet<AfterSubmit> = JoinSet::new();

    draw(app, None, &mut output).await?;
    loop {
        let mut reply = None;
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    while let Some(done) = pending.join_next().await {
                        settle(app, done).await;
                    }
                    draw(app, None, &mut output).await?;
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => reply = execute(app, command, &mut pending).await,
                    Err(CommandError::Empty) => {}
                    Err(e) => reply = Some(e.to_string()),
                }
            }
            Ok(()) = session_rx.changed() => {
                app.refresh_route().await;
            }
            Ok(()) = notifications_rx.changed() => {}
            Some(done) = pending.join_next(), if !pending.is_empty() => {
                settle(app, done).await;
            }
        }
        draw(app, reply.as_deref(), &mut output).await?;
    }

    app.shutdown();
    Ok(())
}

async fn execute(app: &mut App, command: Command, pending: &mut JoinSet<AfterSubmit>) -> Option<String> {
    match command {
        Command::Go(path) => {
            app.navigate(&path).await;
            None
        }
        Command::Set { field, value } => app.set_field(&field, value).err().map(|e| e.to_string()),
        Command::Submit => match app.submit() {
            Some(submission) => {
                pending.spawn(submission);
                None
            }
            None => Some("nothing to submit on this screen".to_owned()),
        },
        Command::Dismiss(id) => (!app.dismiss(id)).then(|| format!("no notification #{id}")),
        Command::Delete => {
            if !matches!(app.screen(), Screen::JobDetails(_)) {
                return Some("open a job first (`go /jobs/<id>`)".to_owned());
            }
            app.delete_current_job().await;
            None
        }
        Command::Logout => {
            app.logout().await;
            None
        }
        Command::Refresh => {
            app.reload().await;
            None
        }
        Command::Help => Some(HELP.to_owned()),
        Command::Quit => None,
    }
}

async fn settle(app: &mut App, done: Result<AfterSubmit, tokio::task::JoinError>) {
    match done {
        Ok(after) => app.apply(after).await,
        Err(e) => tracing::warn!(error = %e, "submission task failed"),
    }
}

async fn draw<W: AsyncWrite + Unpin>(app: &App, reply: Option<&str>, output: &mut W) -> io::Result<()> {
    let mut frame = String::from("\n");
    frame.push_str(&app.render());
    frame.push('\n');
    if let Some(reply) = reply {
        frame.push_str(reply);
        frame.push('\n');
    }
    frame.push_str(app.path());
    frame.push_str("> ");
    output.write_all(frame.as_bytes()).await?;
    output.flush().await
}
