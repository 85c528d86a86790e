use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Throwaway directory holding fake submitter scripts.
///
/// Scripts are run as `/bin/sh <script>` rather than executed directly, so
/// a freshly written file is never exec'd while another test thread may
/// still hold it open for writing.
pub struct ScriptDir {
    dir: TempDir,
}

impl ScriptDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("creating temp dir for scripts"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `body` to `<dir>/<name>` and return its path.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("writing script");
        path
    }

    /// A path inside the directory that does not exist.
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for ScriptDir {
    fn default() -> Self {
        Self::new()
    }
}
