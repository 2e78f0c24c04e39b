use crate::env::Environment;
use std::path::{Path, PathBuf};

/// Overrides the directory the command scripts are loaded from.
pub const SCRIPTS_DIR_VAR: &str = "ZOCLAW_SCRIPTS_DIR";

/// Overrides the interpreter used to run the scripts.
pub const SHELL_VAR: &str = "ZOCLAW_SHELL";

pub const DEFAULT_SHELL: &str = "bash";

/// Where scripts live and what runs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub scripts_dir: PathBuf,
    pub shell: PathBuf,
}

impl Settings {
    /// Resolve settings for an executable installed at `exe`.
    ///
    /// Without overrides the scripts are expected in `scripts/` next to the
    /// directory holding the executable, i.e. `<exe dir>/../scripts`.
    pub fn resolve(env: &Environment, exe: &Path) -> Self {
        let scripts_dir = match env.get_str(SCRIPTS_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_scripts_dir(exe),
        };
        let shell = PathBuf::from(env.get_str(SHELL_VAR).unwrap_or(DEFAULT_SHELL));
        Self { scripts_dir, shell }
    }
}

fn default_scripts_dir(exe: &Path) -> PathBuf {
    let install_dir = exe.parent().unwrap_or_else(|| Path::new("."));
    install_dir.join("..").join("scripts")
}
