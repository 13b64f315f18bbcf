//! Interactive session: a line-oriented front end over the controller.
//!
//! Each command dispatches to [`Controller`] and redraws the screen. The
//! add/edit form and the delete confirmation are prompted inline.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use roster::controller::Controller;
use roster::form::Field;
use roster::models::UserId;
use roster::output::terminal;

const HELP: &str = "\
  list              redraw the current page
  search <text>     filter by name (no text clears the filter)
  page <n>          jump to page n
  next / prev       move one page
  add               add a user
  edit <id>         edit a user
  delete <id>       delete a user
  reload            fetch the collection again
  help              show this help
  quit              leave";

/// Typed at any form prompt to close the form without submitting.
const CANCEL: &str = ".";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Page(usize),
    Next,
    Prev,
    Add,
    Edit(UserId),
    Delete(UserId),
    Reload,
    Help,
    Quit,
}

/// Parse one input line. Blank lines redraw the list.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" | "list" | "ls" => Ok(ShellCommand::List),
        "search" | "find" | "/" => Ok(ShellCommand::Search(rest.to_string())),
        "page" | "p" => parse_number(rest, "page").map(ShellCommand::Page),
        "next" | "n" => Ok(ShellCommand::Next),
        "prev" | "previous" => Ok(ShellCommand::Prev),
        "add" | "new" => Ok(ShellCommand::Add),
        "edit" | "e" => parse_number(rest, "edit").map(ShellCommand::Edit),
        "delete" | "del" | "rm" => parse_number(rest, "delete").map(ShellCommand::Delete),
        "reload" => Ok(ShellCommand::Reload),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{other}' (type 'help')")),
    }
}

fn parse_number<T: std::str::FromStr>(arg: &str, command: &str) -> Result<T, String> {
    if arg.is_empty() {
        return Err(format!("usage: {command} <number>"));
    }
    arg.parse()
        .map_err(|_| format!("'{arg}' is not a valid number (usage: {command} <number>)"))
}

/// The interactive session.
pub struct Shell<R, W> {
    controller: Controller,
    lines: Lines<R>,
    out: W,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(controller: Controller, input: R, out: W) -> Self {
        Self {
            controller,
            lines: input.lines(),
            out,
        }
    }

    /// End the session, handing back the controller.
    pub fn into_controller(self) -> Controller {
        self.controller
    }

    /// Load the collection, then read commands until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        self.controller.load().await;
        self.redraw()?;

        loop {
            let Some(line) = self.prompt("roster> ").await? else {
                break;
            };
            self.controller.drain_events();

            match parse_command(&line) {
                Ok(ShellCommand::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(msg) => writeln!(self.out, "  {}", msg.yellow())?,
            }
        }

        writeln!(self.out)?;
        Ok(())
    }

    async fn execute(&mut self, command: ShellCommand) -> Result<()> {
        match command {
            ShellCommand::List => {}
            ShellCommand::Search(text) => self.controller.set_search(text),
            ShellCommand::Page(page) => self.controller.go_to_page(page),
            ShellCommand::Next => self.controller.next_page(),
            ShellCommand::Prev => self.controller.prev_page(),
            ShellCommand::Reload => self.controller.load().await,
            ShellCommand::Add => {
                self.controller.open_create_form();
                self.fill_form().await?;
            }
            ShellCommand::Edit(id) => {
                if self.controller.open_edit_form(id) {
                    self.fill_form().await?;
                }
            }
            ShellCommand::Delete(id) => self.delete(id).await?,
            ShellCommand::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(());
            }
            ShellCommand::Quit => return Ok(()),
        }
        self.redraw()
    }

    /// Prompt for every field, submit, and offer a retry on failure.
    async fn fill_form(&mut self) -> Result<()> {
        while let Some(form) = self.controller.state().form.clone() {
            write!(self.out, "{}", terminal::render_form_header(&form))?;
            writeln!(
                self.out,
                "   {}",
                format!("Enter keeps the current value, '{CANCEL}' cancels").dimmed()
            )?;

            for field in Field::ALL {
                let prompt = self
                    .controller
                    .state()
                    .form
                    .as_ref()
                    .map(|f| terminal::field_prompt(f, field))
                    .unwrap_or_default();
                let Some(value) = self.prompt(&prompt).await? else {
                    self.controller.close_form();
                    return Ok(());
                };
                if value.trim() == CANCEL {
                    self.controller.close_form();
                    writeln!(self.out, "  {}", "Cancelled.".dimmed())?;
                    return Ok(());
                }
                // Empty input keeps what is already there.
                if !value.trim().is_empty() {
                    self.controller.set_field(field, value);
                }
            }

            if self.controller.submit_form().await.is_ok() {
                return Ok(());
            }

            if let Some(form) = self.controller.state().form.as_ref() {
                write!(self.out, "{}", terminal::render_form_header(form))?;
            }
            let retry = self.prompt("   Try again? [Y/n] ").await?;
            let retry = retry
                .is_some_and(|a| !matches!(a.trim().to_lowercase().as_str(), "n" | "no"));
            if !retry {
                self.controller.close_form();
            }
        }
        Ok(())
    }

    async fn delete(&mut self, id: UserId) -> Result<()> {
        if !self.controller.request_delete(id) {
            return Ok(());
        }
        let name = self
            .controller
            .state()
            .user(id)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        let answer = self
            .prompt(&format!("  Delete {} (#{id})? [y/N] ", name.bold()))
            .await?;
        let accepted =
            answer.is_some_and(|a| matches!(a.trim().to_lowercase().as_str(), "y" | "yes"));
        self.controller.confirm_delete(accepted).await;
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        self.controller.drain_events();
        write!(self.out, "\n{}", terminal::render_screen(self.controller.state()))?;
        self.out.flush()?;
        Ok(())
    }

    /// Print `prompt` and read one line; `None` at end of input.
    async fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?)
    }
}
