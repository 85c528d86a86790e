// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// Load a job file from a given path and return the raw `RawJobFile`.
///
/// This only performs TOML deserialization; it does **not** parse durations
/// or compile patterns. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobFile> {
    load_with(&RealFileSystem, path.as_ref())
}

/// Same as [`load_from_path`], reading through the given filesystem.
pub fn load_with(fs: &dyn FileSystem, path: &Path) -> Result<RawJobFile> {
    let contents = fs.read_to_string(path)?;
    let raw: RawJobFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a job file and parse its `[supervisor]` settings.
///
/// Field checks such as "does the submit script exist" are left to
/// [`crate::config::validate`], so a job can be loaded and edited even when
/// it is not runnable yet.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobFile> {
    let raw = load_from_path(&path)?;
    JobFile::try_from(raw)
}

/// Serialize a job file to TOML and write it to `path`.
pub fn save_to_path(path: impl AsRef<Path>, job: &RawJobFile) -> Result<()> {
    save_with(&RealFileSystem, path.as_ref(), job)
}

pub fn save_with(fs: &dyn FileSystem, path: &Path, job: &RawJobFile) -> Result<()> {
    let contents = toml::to_string_pretty(job)?;
    fs.write(path, contents.as_bytes())?;
    Ok(())
}

/// Default job file: `Submit.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Submit.toml")
}
