use std::io::{self, BufRead, Stderr, StdinLock, Stdout, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// What a tool needs from whoever is driving it: a status line, message
/// boxes and a "save as" prompt.
pub trait Ui {
    /// Replace the status line. Shown right before blocking work starts.
    fn status(&mut self, text: &str);

    fn notify(&mut self, level: Level, title: &str, message: &str);

    /// Ask where to save. `Ok(None)` means the user cancelled.
    fn ask_save_path(&mut self, title: &str, default_name: &str) -> io::Result<Option<PathBuf>>;
}

/// Appends `.pdf` when the chosen name has no extension.
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("pdf")
    }
}

/// Line-based [`Ui`] over any reader and writers. Errors and warnings go
/// to `errors`; everything else to `output`.
pub struct TerminalUi<R, W, E> {
    input: R,
    output: W,
    errors: E,
}

impl TerminalUi<StdinLock<'static>, Stdout, Stderr> {
    pub fn stdio() -> Self {
        TerminalUi::new(io::stdin().lock(), io::stdout(), io::stderr())
    }
}

impl<R: BufRead, W: Write, E: Write> TerminalUi<R, W, E> {
    pub fn new(input: R, output: W, errors: E) -> Self {
        TerminalUi {
            input,
            output,
            errors,
        }
    }

    /// Print `prompt` and read one line. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn streams(&mut self) -> (&mut W, &mut E) {
        (&mut self.output, &mut self.errors)
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (R, W, E) {
        (self.input, self.output, self.errors)
    }
}

impl<R: BufRead, W: Write, E: Write> Ui for TerminalUi<R, W, E> {
    fn status(&mut self, text: &str) {
        // Nothing useful to do if the terminal is gone.
        let _ = writeln!(self.output, "{}", text);
    }

    fn notify(&mut self, level: Level, title: &str, message: &str) {
        let _ = match level {
            Level::Info => writeln!(self.output, "{}: {}", title, message),
            Level::Warning => writeln!(self.errors, "warning: {}: {}", title, message),
            Level::Error => writeln!(self.errors, "error: {}: {}", title, message),
        };
    }

    fn ask_save_path(&mut self, title: &str, default_name: &str) -> io::Result<Option<PathBuf>> {
        let Some(answer) = self.read_line(&format!("{} [{}]: ", title, default_name))? else {
            return Ok(None);
        };
        let chosen = if answer.is_empty() {
            default_name.to_string()
        } else {
            answer
        };
        Ok(Some(with_default_extension(PathBuf::from(chosen))))
    }
}

/// Scripted [`Ui`] that records everything, for tool tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Default)]
    pub struct RecordingUi {
        pub save_answers: Vec<Option<PathBuf>>,
        pub statuses: Vec<String>,
        pub messages: Vec<(Level, String, String)>,
        pub prompts: Vec<(String, String)>,
    }

    impl RecordingUi {
        pub fn answering(answer: Option<PathBuf>) -> Self {
            RecordingUi {
                save_answers: vec![answer],
                ..Default::default()
            }
        }

        pub fn last_message(&self) -> &(Level, String, String) {
            self.messages.last().unwrap()
        }
    }

    impl Ui for RecordingUi {
        fn status(&mut self, text: &str) {
            self.statuses.push(text.to_string());
        }

        fn notify(&mut self, level: Level, title: &str, message: &str) {
            self.messages
                .push((level, title.to_string(), message.to_string()));
        }

        fn ask_save_path(
            &mut self,
            title: &str,
            default_name: &str,
        ) -> io::Result<Option<PathBuf>> {
            self.prompts
                .push((title.to_string(), default_name.to_string()));
            Ok(self.save_answers.pop().flatten())
        }
    }
}
