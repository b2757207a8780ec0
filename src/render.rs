//! Hand-off of DOT programs to the layout engine.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The DOT program itself, no layout.
    Dot,
    #[default]
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" => Some(Self::Dot),
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_str)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("Failed to run layout engine {engine}: {source}")]
    Spawn { engine: String, source: io::Error },
    #[error("Layout engine {engine} exited with {status}: {stderr}")]
    Engine {
        engine: String,
        status: String,
        stderr: String,
    },
}

/// Runs a Graphviz-compatible engine (`dot` by default).
#[derive(Debug, Clone)]
pub struct Renderer {
    engine: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            engine: "dot".to_string(),
        }
    }
}

impl Renderer {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
        }
    }

    pub fn render(&self, program: &str, path: &Path, format: OutputFormat) -> Result<(), RenderError> {
        if format == OutputFormat::Dot {
            return fs::write(path, program).map_err(|source| RenderError::Write {
                path: path.display().to_string(),
                source,
            });
        }

        debug!(engine = %self.engine, format = format.extension(), path = %path.display(), "running layout engine");
        let spawn_err = |source: io::Error| RenderError::Spawn {
            engine: self.engine.clone(),
            source,
        };

        let mut child = Command::new(&self.engine)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(program.as_bytes()).map_err(spawn_err)?;
        }

        let output = child.wait_with_output().map_err(spawn_err)?;
        if !output.status.success() {
            return Err(RenderError::Engine {
                engine: self.engine.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out/model.SVG")), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_path(Path::new("model.gv")), Some(OutputFormat::Dot));
        assert_eq!(OutputFormat::from_path(Path::new("model.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("model")), None);
    }

    #[test]
    fn test_dot_format_writes_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.dot");
        Renderer::default()
            .render("digraph \"m\" {}", &path, OutputFormat::Dot)
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "digraph \"m\" {}");
    }

    #[test]
    fn test_missing_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.svg");
        let err = Renderer::new("tablegraph-no-such-engine")
            .render("digraph {}", &path, OutputFormat::Svg)
            .unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
    }
}
