use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use tracing::debug;

use crate::error::{InputError, RenderError, Result};
use crate::source::types::Frame;

/// Lazily reads frames from a headerless render log.
///
/// Opening the source counts the rows up front so callers can size canvases
/// and progress bars; the frames themselves are parsed one row at a time.
pub struct FrameSource {
    path: PathBuf,
    num_leds: usize,
    frame_count: usize,
    reader: csv::Reader<File>,
}

impl FrameSource {
    /// Open a render log whose rows hold `num_leds` RGB triples
    pub fn open<P: AsRef<Path>>(path: P, num_leds: usize) -> Result<Self> {
        let path = path.as_ref();
        let frame_count = count_rows(path)?;
        let reader = open_reader(path)?;

        debug!("Opened {:?}: {} frames of {} LEDs", path, frame_count, num_leds);

        Ok(Self {
            path: path.to_path_buf(),
            num_leds,
            frame_count,
            reader,
        })
    }

    /// Exact number of rows in the log
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn num_leds(&self) -> usize {
        self.num_leds
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the source and iterate its frames in render order
    pub fn frames(self) -> Frames {
        Frames {
            records: self.reader.into_records(),
            path: self.path.display().to_string(),
            num_leds: self.num_leds,
            next_index: 0,
        }
    }
}

/// Forward-only iterator over the frames of one render log
pub struct Frames {
    records: StringRecordsIntoIter<File>,
    path: String,
    num_leds: usize,
    next_index: usize,
}

impl Iterator for Frames {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let index = self.next_index;
        self.next_index += 1;

        let frame = record
            .map_err(|e| csv_error(&self.path, e))
            .and_then(|record| {
                let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 1);
                Frame::parse(index, record.iter(), self.num_leds).map_err(|reason| {
                    RenderError::from(InputError::MalformedRow {
                        path: self.path.clone(),
                        line,
                        reason,
                    })
                })
            });

        Some(frame)
    }
}

pub(crate) fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RenderError::from(InputError::FileNotFound {
            path: path.display().to_string(),
        }),
        _ => RenderError::Io(e),
    })?;

    Ok(ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file))
}

fn count_rows(path: &Path) -> Result<usize> {
    let mut reader = open_reader(path)?;
    let mut record = csv::ByteRecord::new();
    let mut count = 0;

    while reader
        .read_byte_record(&mut record)
        .map_err(|e| csv_error(&path.display().to_string(), e))?
    {
        count += 1;
    }

    Ok(count)
}

pub(crate) fn csv_error(path: &str, error: csv::Error) -> RenderError {
    let line = error.position().map(|p| p.line()).unwrap_or(0);
    if error.is_io_error() {
        return RenderError::Io(error.into());
    }

    InputError::MalformedRow {
        path: path.to_string(),
        line,
        reason: error.to_string(),
    }
    .into()
}
