//! Line-oriented settings console.
//!
//! Reads commands from a text stream (stdin in the binary) and drives a
//! [`SettingsEditor`].  It is the terminal counterpart of a settings window:
//!
//! ```text
//! add <title> | <url>   append a page to the draft
//! remove <n>            remove draft page n (1-based, as shown by `list`)
//! list                  show the draft pages and pending values
//! mode                  switch single/multi now (saved on next `save`)
//! interval <ms>         set the refresh interval (applied on `save`)
//! slots <n>             set slots per screen (applied on `save`)
//! save                  validate, apply, and write the config file
//! help                  show this text
//! q | quit              close every window and exit
//! ```
//!
//! `save` applies before it persists.  If writing the file fails, the new
//! settings stay on screen and the failure is logged.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::Sender;
use tracing::{error, info, warn};

use crate::application::display_loop::DisplayCommand;
use crate::application::settings::{ConfigStore, SettingsEditor};

pub const HELP: &str = "\
commands:
  add <title> | <url>   append a page
  remove <n>            remove page n (see `list`)
  list                  show pages and pending settings
  mode                  switch between single and multi mode now
  interval <ms>         set the refresh interval
  slots <n>             set slots per screen
  save                  apply and save all settings
  help                  show this text
  q, quit               exit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Add { title: String, url: String },
    /// Zero-based index into the draft page list.
    Remove(usize),
    List,
    ToggleMode,
    Interval(String),
    Slots(String),
    Save,
    Help,
    Quit,
}

/// Errors from parsing a console line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty line")]
    Empty,

    #[error("unknown command '{0}' (type `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parses one line of input.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "add" => {
            let (title, url) = rest
                .split_once('|')
                .ok_or(ParseError::Usage("add <title> | <url>"))?;
            Ok(ConsoleCommand::Add {
                title: title.trim().to_string(),
                url: url.trim().to_string(),
            })
        }
        "remove" | "rm" => rest
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(ConsoleCommand::Remove)
            .ok_or(ParseError::Usage("remove <n>  (n starts at 1)")),
        "list" | "ls" => Ok(ConsoleCommand::List),
        "mode" => Ok(ConsoleCommand::ToggleMode),
        "interval" if !rest.is_empty() => Ok(ConsoleCommand::Interval(rest.to_string())),
        "interval" => Err(ParseError::Usage("interval <ms>")),
        "slots" if !rest.is_empty() => Ok(ConsoleCommand::Slots(rest.to_string())),
        "slots" => Err(ParseError::Usage("slots <n>")),
        "save" => Ok(ConsoleCommand::Save),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "q" | "quit" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

/// What the reader loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this reply and keep reading.
    Continue(String),
    Quit,
}

/// Executes console commands against the editor, the display loop, and the store.
pub struct Console {
    editor: SettingsEditor,
    store: Arc<dyn ConfigStore>,
    display: Sender<DisplayCommand>,
}

impl Console {
    pub fn new(
        editor: SettingsEditor,
        store: Arc<dyn ConfigStore>,
        display: Sender<DisplayCommand>,
    ) -> Self {
        Self {
            editor,
            store,
            display,
        }
    }

    pub fn editor(&self) -> &SettingsEditor {
        &self.editor
    }

    pub async fn execute(&mut self, command: ConsoleCommand) -> Outcome {
        match command {
            ConsoleCommand::Add { title, url } => match self.editor.add_page(&title, &url) {
                Ok(()) => Outcome::Continue(format!(
                    "added page {} (not applied until `save`)",
                    self.editor.pages().len()
                )),
                Err(e) => Outcome::Continue(e.to_string()),
            },
            ConsoleCommand::Remove(index) => match self.editor.remove_page(index) {
                Ok(page) => Outcome::Continue(format!("removed {} | {}", page.title, page.url)),
                Err(e) => Outcome::Continue(e.to_string()),
            },
            ConsoleCommand::List => Outcome::Continue(self.listing()),
            ConsoleCommand::ToggleMode => {
                let config = self.editor.toggle_mode();
                let mode = config.mode;
                if !self.send(DisplayCommand::Apply(config)).await {
                    return Outcome::Quit;
                }
                Outcome::Continue(format!("mode: {mode}"))
            }
            ConsoleCommand::Interval(text) => {
                self.editor.set_refresh_input(text);
                Outcome::Continue(format!(
                    "refresh interval: {} ms (applied on `save`)",
                    self.editor.refresh_input()
                ))
            }
            ConsoleCommand::Slots(text) => {
                self.editor.set_slots_input(text);
                Outcome::Continue(format!(
                    "slots per screen: {} (applied on `save`)",
                    self.editor.slots_input()
                ))
            }
            ConsoleCommand::Save => self.save().await,
            ConsoleCommand::Help => Outcome::Continue(HELP.to_string()),
            ConsoleCommand::Quit => {
                self.send(DisplayCommand::Shutdown).await;
                Outcome::Quit
            }
        }
    }

    async fn save(&mut self) -> Outcome {
        let config = match self.editor.submit() {
            Ok(config) => config,
            Err(e) => return Outcome::Continue(e.to_string()),
        };
        if !self.send(DisplayCommand::Apply(config.clone())).await {
            return Outcome::Quit;
        }
        match self.store.save(&config) {
            Ok(()) => Outcome::Continue("settings applied and saved".to_string()),
            Err(e) => {
                error!("{e}");
                Outcome::Continue(format!("settings applied, but {e}"))
            }
        }
    }

    /// Returns `false` when the display loop has gone away.
    async fn send(&self, command: DisplayCommand) -> bool {
        if self.display.send(command).await.is_err() {
            warn!("display loop is no longer running");
            return false;
        }
        true
    }

    fn listing(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.editor.pages().iter().enumerate() {
            out.push_str(&format!("{:>3}. {} | {}\n", i + 1, page.title, page.url));
        }
        if self.editor.pages().is_empty() {
            out.push_str("  (no pages)\n");
        }
        out.push_str(&format!(
            "mode: {}  interval: {} ms  slots: {}",
            self.editor.mode(),
            self.editor.refresh_input(),
            self.editor.slots_input()
        ));
        out
    }
}

/// Reads commands line by line until `quit` or end of input.
///
/// End of input leaves the display running; only `quit` shuts it down.
///
/// # Errors
///
/// Returns an I/O error if reading or writing the streams fails.
pub async fn run_console<R, W>(
    mut console: Console,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let reply = match parse_command(&line) {
            Ok(command) => match console.execute(command).await {
                Outcome::Continue(reply) => reply,
                Outcome::Quit => {
                    info!("console quit");
                    return Ok(());
                }
            },
            Err(ParseError::Empty) => continue,
            Err(e) => e.to_string(),
        };
        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    info!("console input closed");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::mock::MemoryConfigStore;
    use signwall_core::{Config, DisplayMode, Page};
    use tokio::sync::mpsc::{self, Receiver};

    fn console(store: Arc<MemoryConfigStore>) -> (Console, Receiver<DisplayCommand>) {
        let (tx, rx) = mpsc::channel(8);
        let console = Console::new(SettingsEditor::new(Config::default()), store, tx);
        (console, rx)
    }

    // ── parse_command ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_add_splits_on_pipe() {
        assert_eq!(
            parse_command("add Ops Board | ops.example/board"),
            Ok(ConsoleCommand::Add {
                title: "Ops Board".to_string(),
                url: "ops.example/board".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_add_without_pipe_is_usage_error() {
        assert!(matches!(parse_command("add ops.example"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn test_parse_remove_is_one_based() {
        assert_eq!(parse_command("remove 2"), Ok(ConsoleCommand::Remove(1)));
        assert!(matches!(parse_command("remove 0"), Err(ParseError::Usage(_))));
        assert!(matches!(parse_command("rm x"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!(parse_command("  LIST "), Ok(ConsoleCommand::List));
        assert_eq!(parse_command("mode"), Ok(ConsoleCommand::ToggleMode));
        assert_eq!(parse_command("save"), Ok(ConsoleCommand::Save));
        assert_eq!(parse_command("Q"), Ok(ConsoleCommand::Quit));
        assert_eq!(parse_command("interval 2500"), Ok(ConsoleCommand::Interval("2500".into())));
        assert_eq!(parse_command("slots 4"), Ok(ConsoleCommand::Slots("4".into())));
    }

    #[test]
    fn test_parse_rejects_unknown_and_empty() {
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert_eq!(parse_command("reboot"), Err(ParseError::Unknown("reboot".into())));
        assert!(matches!(parse_command("slots"), Err(ParseError::Usage(_))));
    }

    // ── Console ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_save_applies_then_persists() {
        // Arrange
        let store = Arc::new(MemoryConfigStore::new());
        let (mut console, mut rx) = console(store.clone());
        console
            .execute(ConsoleCommand::Add {
                title: "News".into(),
                url: "news.example".into(),
            })
            .await;
        console.execute(ConsoleCommand::Slots("2".into())).await;

        // Act
        let outcome = console.execute(ConsoleCommand::Save).await;

        // Assert
        assert_eq!(outcome, Outcome::Continue("settings applied and saved".into()));
        let Some(DisplayCommand::Apply(applied)) = rx.recv().await else {
            panic!("expected an Apply command");
        };
        assert_eq!(applied.pages.len(), 4);
        assert_eq!(applied.slots_per_surface.get(), 2);
        assert_eq!(store.stored(), Some(applied));
    }

    #[tokio::test]
    async fn test_invalid_save_sends_nothing() {
        let store = Arc::new(MemoryConfigStore::new());
        let (mut console, mut rx) = console(store.clone());
        console.execute(ConsoleCommand::Interval("fast".into())).await;

        let outcome = console.execute(ConsoleCommand::Save).await;

        assert!(matches!(outcome, Outcome::Continue(msg) if msg.contains("refresh interval")));
        assert!(rx.try_recv().is_err());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_applied_settings() {
        // Arrange
        let store = Arc::new(MemoryConfigStore::failing());
        let (mut console, mut rx) = console(store.clone());
        console.execute(ConsoleCommand::Remove(0)).await;

        // Act
        let outcome = console.execute(ConsoleCommand::Save).await;

        // Assert: applied to the display, not written, editor keeps the new state
        assert!(matches!(rx.recv().await, Some(DisplayCommand::Apply(_))));
        assert!(matches!(outcome, Outcome::Continue(msg) if msg.contains("could not persist")));
        assert_eq!(store.save_count(), 1);
        assert_eq!(console.editor().applied().pages.len(), 2);
    }

    #[tokio::test]
    async fn test_mode_applies_immediately_without_saving() {
        let store = Arc::new(MemoryConfigStore::new());
        let (mut console, mut rx) = console(store.clone());

        let outcome = console.execute(ConsoleCommand::ToggleMode).await;

        assert_eq!(outcome, Outcome::Continue("mode: multi".into()));
        let Some(DisplayCommand::Apply(applied)) = rx.recv().await else {
            panic!("expected an Apply command");
        };
        assert_eq!(applied.mode, DisplayMode::Multi);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_quit_shuts_display_down() {
        let (mut console, mut rx) = console(Arc::new(MemoryConfigStore::new()));

        let outcome = console.execute(ConsoleCommand::Quit).await;

        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(rx.recv().await, Some(DisplayCommand::Shutdown));
    }

    #[tokio::test]
    async fn test_list_shows_one_based_pages() {
        let (mut console, _rx) = console(Arc::new(MemoryConfigStore::new()));

        let Outcome::Continue(listing) = console.execute(ConsoleCommand::List).await else {
            panic!("list must not quit");
        };

        assert!(listing.contains("  1. Example 1 | https://example.com"));
        assert!(listing.contains("mode: single  interval: 5000 ms  slots: 1"));
    }

    #[tokio::test]
    async fn test_run_console_processes_lines_until_quit() {
        // Arrange
        let store = Arc::new(MemoryConfigStore::new());
        let (console, mut rx) = console(store.clone());
        let input: &[u8] = b"add Ops | ops.example\n\nbogus\nsave\nquit\nlist\n";
        let mut output = Vec::new();

        // Act
        run_console(console, input, &mut output).await.expect("console io");

        // Assert
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("added page 4"));
        assert!(text.contains("unknown command 'bogus'"));
        assert!(text.contains("settings applied and saved"));
        assert!(!text.contains("mode:"), "lines after quit are not read");
        assert!(matches!(rx.recv().await, Some(DisplayCommand::Apply(_))));
        assert_eq!(rx.recv().await, Some(DisplayCommand::Shutdown));
        assert_eq!(
            store.stored().map(|c| c.pages.last().cloned()),
            Some(Some(Page::new("Ops", "ops.example")))
        );
    }
}
