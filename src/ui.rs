// UI layer: the interactive prompt loop.
// `Shell` reads lines from any `BufRead`, writes to any `Write`, and talks
// to the API only through the injected `Connector`, so the whole loop can
// be driven from tests with in-memory buffers and a fake client.

use crate::api::{ApiError, ChatRequest, Connector};
use crate::command::Command;
use crate::session::{mask_token, Session};
use anyhow::{Context, Result};
use crossterm::style::{style, Color, Stylize};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

const PROMPT: &str = "perp> ";
const TOKEN_PROMPT: &str = "Enter your Perplexity API token: ";

/// Knobs that do not change during a run.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    /// Model identifier put on every request.
    pub model: String,
    /// Attached to a terminal: enables colors and the wait spinner.
    pub interactive: bool,
}

enum Flow {
    Continue,
    Exit,
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    session: Session,
    connector: Connector,
    options: ShellOptions,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, connector: Connector, options: ShellOptions) -> Self {
        Shell {
            input,
            output,
            session: Session::new(),
            connector,
            options,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Apply a credential given at startup, before the loop runs.
    pub fn preauthenticate(&mut self, token: &str) -> Result<()> {
        match self.set_credential(token) {
            Ok(()) => writeln!(self.output, "Authentication token set via command line.")?,
            Err(e) => {
                let line = self.paint(&format!("Failed to set authentication token: {}", e), Color::Red);
                writeln!(self.output, "{}", line)?;
            }
        }
        Ok(())
    }

    /// Run until `exit`/`quit` or end of input. Only output failures are
    /// returned as errors; everything else is reported and the loop goes on.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to Perplexity CLI!")?;
        writeln!(self.output, "Type 'help' for available commands or 'exit' to quit.")?;

        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush().context("Failed to flush prompt")?;

            let Some(line) = self.read_line()? else {
                debug!("end of input");
                break;
            };
            let Some(cmd) = Command::parse(&line) else {
                continue;
            };
            if let Flow::Exit = self.dispatch(cmd)? {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Flow> {
        debug!(command = ?CommandKind(&cmd), "dispatching");
        match cmd {
            Command::Exit => {
                writeln!(self.output, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Help => self.show_help()?,
            Command::SetAuth(token) => self.handle_auth(token)?,
            Command::Status => self.show_status()?,
            Command::Ask(question) => {
                if question.is_empty() {
                    writeln!(self.output, "Please provide a question. Usage: ask <your question>")?;
                } else {
                    self.ask(&question)?;
                }
            }
            Command::FreeText(question) => self.ask(&question)?,
        }
        Ok(Flow::Continue)
    }

    fn show_help(&mut self) -> Result<()> {
        let out = &mut self.output;
        writeln!(out, "Available commands:")?;
        writeln!(out, "  auth <token>  - Set the Perplexity API authentication token")?;
        writeln!(out, "  status        - Show current authentication status")?;
        writeln!(out, "  ask <query>   - Ask a question to Perplexity AI")?;
        writeln!(out, "  help          - Show this help message")?;
        writeln!(out, "  exit/quit     - Exit the CLI")?;
        writeln!(out)?;
        writeln!(out, "You can also type any question directly without using 'ask'")?;
        Ok(())
    }

    fn handle_auth(&mut self, token: Option<String>) -> Result<()> {
        let token = match token {
            Some(t) => t,
            None => {
                write!(self.output, "{}", TOKEN_PROMPT)?;
                self.output.flush()?;
                // End of input here counts as an empty answer.
                let answer = self.read_line()?.unwrap_or_default();
                let answer = answer.trim();
                if answer.is_empty() {
                    writeln!(self.output, "No token provided.")?;
                    return Ok(());
                }
                answer.to_string()
            }
        };

        match self.set_credential(&token) {
            Ok(()) => writeln!(self.output, "Authentication token set successfully.")?,
            Err(e) => {
                let line = self.paint(&format!("Failed to set authentication token: {}", e), Color::Red);
                writeln!(self.output, "{}", line)?;
            }
        }
        Ok(())
    }

    /// Build a client for `token` and store both. The session is left
    /// untouched if the client cannot be built.
    fn set_credential(&mut self, token: &str) -> Result<(), ApiError> {
        let client = (self.connector)(token)?;
        self.session.authenticate(token.to_string(), client);
        let masked = mask_token(token);
        info!(token = %masked, "authentication token set");
        Ok(())
    }

    fn show_status(&mut self) -> Result<()> {
        match self.session.masked_credential() {
            Some(masked) => writeln!(self.output, "Authentication: Configured ({})", masked)?,
            None => writeln!(self.output, "Authentication: Not configured")?,
        }
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<()> {
        let Some(client) = self.session.client() else {
            writeln!(
                self.output,
                "Please set your authentication token first using the 'auth' command."
            )?;
            return Ok(());
        };

        writeln!(self.output, "Asking Perplexity AI...")?;
        self.output.flush()?;

        let request = ChatRequest::single(&self.options.model, question);
        let spinner = wait_spinner(self.options.interactive)?;
        let result = client.create_chat_completion(&request);
        spinner.finish_and_clear();

        match result {
            Ok(resp) => match resp.answer() {
                Some(answer) => {
                    let header = self.paint("--- Response ---", Color::Cyan);
                    writeln!(self.output, "\n{}", header)?;
                    writeln!(self.output, "{}", answer)?;
                    if let Some(total) = resp.total_tokens() {
                        writeln!(self.output, "\n--- Usage: {} tokens ---", total)?;
                    }
                }
                None => writeln!(self.output, "No response received from Perplexity AI")?,
            },
            Err(e) => {
                warn!(error = %e, "chat completion failed");
                let line = self.paint(&format!("Error making request: {}", e), Color::Red);
                writeln!(self.output, "{}", line)?;
            }
        }
        Ok(())
    }

    /// One line without its terminator, or `None` at end of input.
    /// Bytes that are not UTF-8 are replaced, never rejected.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self
            .input
            .read_until(b'\n', &mut buf)
            .context("Failed to read from input")?;
        if n == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.options.interactive {
            style(text).with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Spinner on stderr while a request is outstanding; hidden otherwise.
fn wait_spinner(interactive: bool) -> Result<ProgressBar> {
    if !interactive {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Waiting for response...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Logs the command variant without the question text or token.
struct CommandKind<'a>(&'a Command);

impl std::fmt::Debug for CommandKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            Command::Exit => "exit",
            Command::Help => "help",
            Command::SetAuth(_) => "auth",
            Command::Status => "status",
            Command::Ask(_) => "ask",
            Command::FreeText(_) => "free-text",
        };
        f.write_str(name)
    }
}
