use std::io::Write;

use super::Outcome;
use crate::config::Config;
use crate::raster::{Origin, DPI};

/// Describe how pdftoppm resolves under `config`.
pub fn describe(config: &Config) -> Result<String, String> {
    let Some(rasterizer) = config.rasterizer() else {
        return Err(crate::config::missing_rasterizer_help());
    };
    let source = match rasterizer.origin() {
        Origin::Override(dir) => format!("Poppler directory {}", dir.display()),
        Origin::SearchPath => "PATH".to_string(),
    };
    Ok(format!(
        "pdftoppm: {} (from {}, rendering at {} DPI)",
        rasterizer.program().display(),
        source,
        DPI
    ))
}

pub fn run<W: Write, E: Write>(config: &Config, out: &mut W, err: &mut E) -> Outcome {
    match describe(config) {
        Ok(line) => {
            let _ = writeln!(out, "{}", line);
            Outcome::Succeeded
        }
        Err(help) => {
            let _ = writeln!(err, "{}", help);
            Outcome::Failed
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::raster::testing::fake_pdftoppm;
    use tempfile::TempDir;

    #[test]
    fn test_reports_override() {
        let tmp = TempDir::new().unwrap();
        fake_pdftoppm(tmp.path());
        let config = Config::new(Some(tmp.path().to_path_buf()));

        let mut out = Vec::new();
        let mut err = Vec::new();
        assert_eq!(run(&config, &mut out, &mut err), Outcome::Succeeded);
        let line = String::from_utf8(out).unwrap();
        assert!(line.contains("from Poppler directory"), "got: {line}");
        assert!(line.contains("300 DPI"), "got: {line}");
        assert!(err.is_empty());
    }
}
