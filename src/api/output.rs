//! Antenna position output
//!
//! Positions are written as a single JSON object mapping antenna name to a
//! three element array, in survey order.

use crate::processing::AntennaPositions;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// JSON writer for converted positions
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWriter {
    /// Pretty print JSON
    pub pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Format positions as a JSON string
    pub fn format_json(&self, positions: &AntennaPositions) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(positions)
        } else {
            serde_json::to_string(positions)
        }
    }

    /// Serialize positions into any writer
    pub fn write_to<W: Write>(&self, positions: &AntennaPositions, writer: W) -> Result<(), serde_json::Error> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, positions)
        } else {
            serde_json::to_writer(writer, positions)
        }
    }

    /// Write positions to `path`, or stdout when `path` is `-`
    pub fn write_path<P: AsRef<Path>>(&self, positions: &AntennaPositions, path: P) -> crate::Result<()> {
        let path = path.as_ref();

        if path == Path::new("-") {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            self.write_to(positions, &mut handle)?;
            writeln!(handle)?;
            return Ok(());
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(positions, &mut writer)?;
        writer.flush()?;

        info!(
            "wrote {} {} positions to {}",
            positions.len(),
            positions.frame(),
            path.display()
        );
        Ok(())
    }
}
