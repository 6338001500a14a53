//! dg-save: Layout export and import for the grid dungeon generator
//!
//! Writes accepted layouts as numbered delimited text files or JSON
//! snapshots, and reads both formats back.

mod csv;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dg_core::GenerationResult;
use dg_core::dungeon::{GridShapeError, LayoutError};

pub use csv::{DELIMITER, format_csv, parse_csv};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Directory name layouts are saved under
pub const OUTPUT_DIR_NAME: &str = "GeneratedDungeons";

const FILE_PREFIX: &str = "Dungeon_";
const FILE_EXTENSION: &str = "csv";

/// Export/import errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Layout file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Unknown room {0:?}")]
    UnknownRoom(String),

    #[error("Malformed grid: {0}")]
    Shape(#[from] GridShapeError),

    #[error("Invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid snapshot header")]
    InvalidHeader,

    #[error("Incompatible snapshot version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },
}

/// Snapshot header for versioning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Magic identifier
    pub magic: String,
    /// Snapshot format version
    pub version: u32,
    /// When the snapshot was written
    pub generated_at: DateTime<Utc>,
    /// Seed the layout was generated from, when known
    pub seed: Option<u64>,
}

impl SnapshotHeader {
    const MAGIC: &'static str = "DGRS";

    pub fn new(seed: Option<u64>) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SNAPSHOT_VERSION,
            generated_at: Utc::now(),
            seed,
        }
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.magic != Self::MAGIC {
            return Err(ExportError::InvalidHeader);
        }
        if self.version != SNAPSHOT_VERSION {
            return Err(ExportError::IncompatibleVersion {
                expected: SNAPSHOT_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete snapshot file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub header: SnapshotHeader,
    pub layout: GenerationResult,
}

/// Write a layout as delimited text, replacing any existing file
pub fn export_csv(result: &GenerationResult, path: impl AsRef<Path>) -> Result<(), ExportError> {
    fs::write(path, format_csv(result))?;
    Ok(())
}

/// Read a layout written by [`export_csv`]
pub fn load_csv(path: impl AsRef<Path>) -> Result<GenerationResult, ExportError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| not_found_or_io(err, path))?;
    parse_csv(&text)
}

/// File name for dungeon number `n`
pub fn dungeon_file_name(n: u32) -> String {
    format!("{FILE_PREFIX}{n}.{FILE_EXTENSION}")
}

/// Lowest dungeon number without a file in `dir`
pub fn next_dungeon_number(dir: impl AsRef<Path>) -> Result<u32, ExportError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(0);
    }

    let mut used = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(number) = name
            .to_str()
            .and_then(|name| name.strip_prefix(FILE_PREFIX))
            .and_then(|rest| rest.strip_suffix(FILE_EXTENSION))
            .and_then(|rest| rest.strip_suffix('.'))
            .and_then(|digits| digits.parse::<u32>().ok())
        else {
            continue;
        };
        used.push(number);
    }

    used.sort_unstable();
    let mut next = 0;
    for number in used {
        if number == next {
            next += 1;
        } else if number > next {
            break;
        }
    }
    Ok(next)
}

/// Save a layout as the next numbered file in `dir`, creating `dir` if needed
pub fn save_dungeon(
    result: &GenerationResult,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let number = next_dungeon_number(dir)?;
    let path = dir.join(dungeon_file_name(number));
    export_csv(result, &path)?;

    info!("saved dungeon {number} to {}", path.display());
    Ok(path)
}

/// Save a layout with its header as pretty JSON
pub fn save_json(
    result: &GenerationResult,
    seed: Option<u64>,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let snapshot = Snapshot {
        header: SnapshotHeader::new(seed),
        layout: result.clone(),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &snapshot)?;
    Ok(())
}

/// Load a JSON snapshot written by [`save_json`]
///
/// The layout must pass [`GenerationResult::check`].
pub fn load_json(path: impl AsRef<Path>) -> Result<Snapshot, ExportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| not_found_or_io(err, path))?;
    let reader = BufReader::new(file);
    let snapshot: Snapshot = serde_json::from_reader(reader)?;

    snapshot.header.validate()?;
    snapshot.layout.check()?;
    Ok(snapshot)
}

/// Default directory for saved layouts
pub fn default_output_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("dungeon-grid");
    path.push(OUTPUT_DIR_NAME);
    path
}

fn not_found_or_io(err: io::Error, path: &Path) -> ExportError {
    if err.kind() == io::ErrorKind::NotFound {
        ExportError::NotFound(path.to_path_buf())
    } else {
        ExportError::Io(err)
    }
}
