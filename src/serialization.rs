//! Output of the prepared IR.
//!
//! A [`ParseResult`] is written either as one pretty-printed JSON document or
//! as NDJSON, one record per line:
//!
//! ```text
//! {"kind":"type","statement":"typedef unsigned int GLenum;"}
//! {"kind":"enum","name":"attrib_mask","original_name":"AttribMask",...}
//! {"kind":"feature_level","api":"gl","version":"1.0","commands":[...]}
//! ```

use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::options::OutputFormat;
use crate::parse::TypeDefinition;
use crate::pipeline::ParseResult;
use crate::prepare::{PreparedEnum, PreparedFeatureLevel};

/// Error type for serialization operations
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One NDJSON line
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record<'a> {
    Type(&'a TypeDefinition),
    Enum(&'a PreparedEnum),
    FeatureLevel(&'a PreparedFeatureLevel),
}

/// NDJSON (Newline Delimited JSON) writer
///
/// Writes records as NDJSON, one JSON object per line.
pub struct NdjsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single record as an NDJSON line
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), SerializationError> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    /// Write every part of a result: types, then enums, then feature levels
    pub fn write_result(&mut self, result: &ParseResult) -> Result<(), SerializationError> {
        for statement in &result.types {
            self.write(&Record::Type(statement))?;
        }
        for prepared in result.enums.values() {
            self.write(&Record::Enum(prepared))?;
        }
        for level in &result.feature_levels {
            self.write(&Record::FeatureLevel(level))?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SerializationError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write `result` to `writer` in the given format
pub fn write_result<W: Write>(
    result: &ParseResult,
    format: OutputFormat,
    mut writer: W,
) -> Result<(), SerializationError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, result)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        OutputFormat::Ndjson => {
            let mut ndjson = NdjsonWriter::new(writer);
            ndjson.write_result(result)?;
            ndjson.flush()?;
        }
    }
    Ok(())
}

/// Create a file for writing, creating parent directories if needed
pub fn create_file<P: AsRef<Path>>(path: P) -> io::Result<fs::File> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::File::create(path)
}

/// Write `result` to the file at `path`, or to stdout when there is none
pub fn write_output(
    result: &ParseResult,
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<(), SerializationError> {
    match path {
        Some(path) => {
            let file = create_file(path)?;
            write_result(result, format, BufWriter::new(file))?;
            tracing::info!(path = %path.display(), %format, "wrote output");
        }
        None => {
            let stdout = io::stdout();
            write_result(result, format, stdout.lock())?;
        }
    }
    Ok(())
}
