//! Interactive menu: pick a tool, answer its prompts, repeat.
//!
//! A failing tool prints its message and returns to the menu. The Poppler
//! directory set here lasts until the shell exits.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::commands::{self, images_to_pdf, merge, pdf_to_images};
use crate::config::{poppler_hint, Config};
use crate::ui::TerminalUi;

const MENU: &str = "\
Choose a tool:
  1) PDF -> JPEG
  2) JPEG -> PDF
  3) Combine PDF
  p) Set Poppler bin directory
  h) Help
  q) Quit";

pub struct Shell<R, W, E> {
    ui: TerminalUi<R, W, E>,
    config: Config,
}

impl<R: BufRead, W: Write, E: Write> Shell<R, W, E> {
    pub fn new(ui: TerminalUi<R, W, E>, config: Config) -> Self {
        Shell { ui, config }
    }

    /// Loop until `q` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.ui.output(), "PDF Tools")?;
        loop {
            let poppler = match self.config.poppler_dir() {
                Some(dir) => dir.display().to_string(),
                None => "(not set, using PATH)".to_string(),
            };
            writeln!(self.ui.output(), "\n{}\nPoppler bin directory: {}", MENU, poppler)?;

            let Some(choice) = self.ui.read_line("> ")? else {
                break;
            };
            match choice.to_lowercase().as_str() {
                "1" => {
                    let Some(path) = self.ui.read_line("PDF file: ")? else {
                        break;
                    };
                    pdf_to_images::run(path, &self.config, false, &mut self.ui);
                }
                "2" => {
                    writeln!(
                        self.ui.output(),
                        "Select a folder containing image(s). Files will be ordered by name."
                    )?;
                    let Some(folder) = self.ui.read_line("Folder: ")? else {
                        break;
                    };
                    images_to_pdf::run(folder, None, &mut self.ui);
                }
                "3" => {
                    writeln!(
                        self.ui.output(),
                        "Select a folder with PDFs. Files will be merged in name order."
                    )?;
                    let Some(folder) = self.ui.read_line("Folder: ")? else {
                        break;
                    };
                    merge::run(folder, None, &mut self.ui);
                }
                "p" => {
                    let Some(dir) = self
                        .ui
                        .read_line("Folder containing pdftoppm (blank to clear): ")?
                    else {
                        break;
                    };
                    self.config.set_poppler_dir(Some(PathBuf::from(dir)));
                    let (out, err) = self.ui.streams();
                    commands::check::run(&self.config, out, err);
                }
                "h" => writeln!(self.ui.output(), "{}", poppler_hint())?,
                "q" | "quit" | "exit" => break,
                "" => {}
                other => writeln!(self.ui.output(), "Unknown choice: {}", other)?,
            }
        }
        Ok(())
    }
}

pub fn run(config: Config) -> io::Result<()> {
    Shell::new(TerminalUi::stdio(), config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::merge::tests::labelled_document;
    use tempfile::TempDir;

    fn shell(script: &str) -> Shell<&[u8], Vec<u8>, Vec<u8>> {
        Shell::new(
            TerminalUi::new(script.as_bytes(), Vec::new(), Vec::new()),
            Config::default(),
        )
    }

    fn finish(shell: Shell<&[u8], Vec<u8>, Vec<u8>>) -> (String, String) {
        let (_, out, err) = shell.ui.into_parts();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_quit() {
        let mut sh = shell("q\n");
        sh.run().unwrap();
        let (out, _) = finish(sh);
        assert!(out.contains("Choose a tool:"));
        assert_eq!(out.matches("Choose a tool:").count(), 1);
    }

    #[test]
    fn test_errors_return_to_menu() {
        let mut sh = shell("1\n/definitely/not/here.pdf\n3\n/no/such/folder\nq\n");
        sh.run().unwrap();
        let (out, err) = finish(sh);
        assert!(err.contains("error: Invalid file: Please select a valid PDF file."));
        assert!(err.contains("error: Invalid folder: Please select a valid folder."));
        assert_eq!(out.matches("Choose a tool:").count(), 3);
    }

    #[test]
    fn test_merge_from_menu() {
        let tmp = TempDir::new().unwrap();
        labelled_document(&[1]).save(tmp.path().join("a.pdf")).unwrap();
        labelled_document(&[2]).save(tmp.path().join("b.pdf")).unwrap();
        let dest = tmp.path().join("both.pdf");

        let script = format!("3\n{}\n{}\nq\n", tmp.path().display(), dest.display());
        let mut sh = shell(&script);
        sh.run().unwrap();
        let (out, err) = finish(sh);
        assert!(err.is_empty(), "got: {err}");
        assert!(out.contains("Save merged PDF as [merged.pdf]: "));
        assert!(out.contains("Merging PDFs..."));
        assert!(out.contains("Completed: Merged 2 file(s)."));
        assert!(dest.is_file());
    }

    #[test]
    fn test_poppler_directory_is_kept_for_the_session() {
        let tmp = TempDir::new().unwrap();
        let script = format!("p\n{}\nq\n", tmp.path().display());
        let mut sh = shell(&script);
        sh.run().unwrap();
        assert_eq!(sh.config.poppler_dir(), Some(tmp.path()));

        let (out, _) = finish(sh);
        assert!(out.contains(&format!("Poppler bin directory: {}", tmp.path().display())));
    }

    #[test]
    fn test_blank_poppler_directory_clears() {
        let mut sh = shell("p\n/opt/poppler\np\n\nq\n");
        sh.run().unwrap();
        assert!(sh.config.poppler_dir().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_pdf_to_jpeg_from_menu_removes_intermediates() {
        let tmp = TempDir::new().unwrap();
        crate::raster::testing::fake_pdftoppm(&tmp.path().join("poppler"));
        let pdf = tmp.path().join("book.pdf");
        std::fs::write(&pdf, "2").unwrap();

        let script = format!("1\n{}\nq\n", pdf.display());
        let mut sh = Shell::new(
            TerminalUi::new(script.as_bytes(), Vec::new(), Vec::new()),
            Config::new(Some(tmp.path().join("poppler"))),
        );
        sh.run().unwrap();
        let (_, out, _) = sh.ui.into_parts();
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Completed: Converted 2 page(s)."));

        let mut names: Vec<String> = std::fs::read_dir(tmp.path().join("book_images"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["book[0].jpeg", "book[1].jpeg"]);
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut sh = shell("2\n");
        sh.run().unwrap();
    }
}
