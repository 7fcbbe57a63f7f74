// ABOUTME: Rendering and writing of extraction rows and source listings.
// ABOUTME: JSON (pretty or compact) or TSV, to stdout or a file.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use newsdesk_extract::{tsv_header, ExtractionResult};
use serde::Serialize;

use crate::args::{Format, OutputFlags};

pub fn render_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(out)
}

pub fn render_rows(rows: &[ExtractionResult], flags: &OutputFlags) -> Result<String> {
    match flags.format {
        Format::Json => render_json(rows, flags.compact),
        Format::Tsv => {
            let mut out = tsv_header();
            for row in rows {
                out.push('\n');
                out.push_str(&row.to_tsv_row());
            }
            Ok(out)
        }
    }
}

/// Write `body` plus a trailing newline to the output file, or stdout.
pub fn emit(body: &str, flags: &OutputFlags) -> Result<()> {
    match &flags.output {
        Some(path) => fs::write(path, format!("{}\n", body))
            .with_context(|| format!("writing {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", body)?;
            Ok(())
        }
    }
}
