use std::path::Path;

use tracing::{debug, info};

use crate::error::{InputError, RenderError, Result};
use crate::source::frames::{csv_error, open_reader};

/// LED index -> (x, y) matrix position, loaded once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationTable {
    points: Vec<(u32, u32)>,
}

impl LocationTable {
    pub fn new(points: Vec<(u32, u32)>) -> Self {
        Self { points }
    }

    /// Load a headerless `x,y[,z]` CSV where the row number is the LED index.
    ///
    /// Coordinates may be written as floats; they are truncated toward zero.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let mut reader = open_reader(path)?;
        let mut points = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|e| csv_error(&path_str, e))?;
            let line = record.position().map(|p| p.line()).unwrap_or(points.len() as u64 + 1);

            let malformed = |reason: String| {
                RenderError::from(InputError::MalformedLocation {
                    path: path_str.clone(),
                    line,
                    reason,
                })
            };

            if record.len() < 2 {
                return Err(malformed(format!("expected x,y but found {} field(s)", record.len())));
            }

            let x = parse_coordinate(&record[0]).map_err(&malformed)?;
            let y = parse_coordinate(&record[1]).map_err(&malformed)?;
            points.push((x, y));
        }

        let table = Self { points };
        info!("Loaded {} LED locations from {:?}", table.len(), path);
        if let Some((width, height)) = table.extent() {
            debug!("Location extent: {}x{}", width, height);
        }

        Ok(table)
    }

    /// Position of the LED at `index`
    pub fn get(&self, index: usize) -> Option<(u32, u32)> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest (columns, rows) matrix that contains every location
    pub fn extent(&self) -> Option<(u32, u32)> {
        let max_x = self.points.iter().map(|p| p.0).max()?;
        let max_y = self.points.iter().map(|p| p.1).max()?;
        Some((max_x + 1, max_y + 1))
    }
}

fn parse_coordinate(field: &str) -> std::result::Result<u32, String> {
    let value: f64 = field
        .parse()
        .map_err(|_| format!("{:?} is not a number", field))?;

    if !value.is_finite() || value.trunc() < 0.0 || value.trunc() > u32::MAX as f64 {
        return Err(format!("{} is not a usable pixel coordinate", field));
    }

    Ok(value.trunc() as u32)
}
