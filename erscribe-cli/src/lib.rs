//! erscribe CLI library
//!
//! Input/output plumbing shared by the `erscribe` binary (main.rs) and its
//! integration tests.

use anyhow::{Context, Result};
use erscribe::{PipelineConfig, PipelineOutput, Schema};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// File name of the schema written by `run`
pub const SCHEMA_FILE: &str = "schema.json";
/// File name of the diagram written by `run`
pub const DIAGRAM_FILE: &str = "diagram.mmd";

/// Read a whole input; `-` means standard input
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read standard input")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write to `path`, or print to stdout when no path is given
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

/// Load the pipeline configuration from `path`, or from the default
/// location and environment
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::load_from(path),
        None => PipelineConfig::load(),
    };
    config.context("Failed to load configuration")
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
}

pub fn parse_schema(json: &str) -> Result<Schema> {
    serde_json::from_str(json).context("Input is not a valid schema document")
}

/// Paths written by [`write_run_outputs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub schema_path: PathBuf,
    pub diagram_path: PathBuf,
}

/// Write `schema.json` and `diagram.mmd` into `dir`, creating it if needed
pub fn write_run_outputs(output: &PipelineOutput, dir: &Path) -> Result<RunArtifacts> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let schema_path = dir.join(SCHEMA_FILE);
    write_output(&to_json(&output.schema)?, Some(&schema_path))?;

    let diagram_path = dir.join(DIAGRAM_FILE);
    write_output(&output.diagram.markup, Some(&diagram_path))?;

    log::debug!(
        "wrote {} and {}",
        schema_path.display(),
        diagram_path.display()
    );
    Ok(RunArtifacts {
        schema_path,
        diagram_path,
    })
}
