// File persistence for collected data and extraction output.
//
// Collection output goes through `persist`, which degrades from JSON to a
// raw-text dump to a binary dump so a fetch that took fifteen minutes of
// rate-limit waits is never thrown away over a write problem.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// How `persist` ended up writing the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    Json(PathBuf),
    RawText(PathBuf),
    Binary(PathBuf),
}

impl Persisted {
    pub fn path(&self) -> &Path {
        match self {
            Persisted::Json(p) | Persisted::RawText(p) | Persisted::Binary(p) => p,
        }
    }
}

/// Create each directory (and its parents) if missing.
pub fn ensure_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<()> {
    for dir in dirs {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string(data)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write `data` to `<dir>/<name>.json`.
///
/// If JSON encoding fails, the value's debug rendering is written to the same
/// path instead. If that write fails too, the rendering goes to
/// `<dir>/<name>.bin`.
pub fn persist<T: Serialize + Debug>(dir: &Path, name: &str, data: &T) -> Result<Persisted> {
    let json_path = dir.join(format!("{name}.json"));

    let json_error = match serde_json::to_string(data) {
        Ok(json) => match std::fs::write(&json_path, json) {
            Ok(()) => return Ok(Persisted::Json(json_path)),
            Err(e) => anyhow::Error::from(e),
        },
        Err(e) => anyhow::Error::from(e),
    };
    warn!(path = %json_path.display(), error = %json_error, "JSON write failed, falling back to raw text");

    let raw = format!("{data:?}");
    let raw_error = match std::fs::write(&json_path, &raw) {
        Ok(()) => return Ok(Persisted::RawText(json_path)),
        Err(e) => e,
    };
    warn!(path = %json_path.display(), error = %raw_error, "Raw text write failed, falling back to binary dump");

    let bin_path = dir.join(format!("{name}.bin"));
    std::fs::write(&bin_path, raw.into_bytes())
        .with_context(|| format!("Failed to write {}", bin_path.display()))?;
    Ok(Persisted::Binary(bin_path))
}
