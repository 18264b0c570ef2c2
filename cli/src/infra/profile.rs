//! `ProfileScriptWriter` for the buildpack dependency layer.
//!
//! Scripts land in `<deps_dir>/<deps_idx>/profile.d/` and are sourced by the
//! platform before the application process starts.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ProfileScriptWriter;

pub const PROFILE_DIR_NAME: &str = "profile.d";

/// Permissions of written scripts.
pub const PROFILE_SCRIPT_MODE: u32 = 0o755;

/// Profile directory of one dependency layer.
#[derive(Debug, Clone)]
pub struct ProfileDir {
    deps_dir: PathBuf,
    deps_idx: String,
}

impl ProfileDir {
    #[must_use]
    pub fn new(deps_dir: PathBuf, deps_idx: impl Into<String>) -> Self {
        Self {
            deps_dir,
            deps_idx: deps_idx.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.deps_dir.join(&self.deps_idx).join(PROFILE_DIR_NAME)
    }
}

impl ProfileScriptWriter for ProfileDir {
    fn write_profile_script(&self, name: &str, content: &str) -> Result<()> {
        let dir = self.path();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
        let script = dir.join(name);
        std::fs::write(&script, content)
            .with_context(|| format!("writing {}", script.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(
                &script,
                std::fs::Permissions::from_mode(PROFILE_SCRIPT_MODE),
            )
            .with_context(|| format!("setting permissions on {}", script.display()))?;
        }
        tracing::debug!(path = %script.display(), "profile script written");
        Ok(())
    }
}
