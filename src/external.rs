use crate::command::{EXIT_FAILURE, ExitCode};
use crate::env::Environment;
use anyhow::{Context, Result, bail};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// A script ready to be handed to an interpreter.
#[derive(Debug)]
pub struct ScriptRun {
    pub interpreter: PathBuf,
    pub script: PathBuf,
    pub env: Environment,
}

impl ScriptRun {
    /// Locate `shell` and check that `script` exists.
    ///
    /// A bare interpreter name is searched in the `PATH` of `env`.
    pub fn prepare(shell: &Path, script: PathBuf, env: Environment) -> Result<Self> {
        let search_paths = env.get("PATH").unwrap_or_default();
        let interpreter = find_command_path(search_paths, shell)
            .map(Cow::into_owned)
            .with_context(|| format!("interpreter not found: {}", shell.display()))?;
        if !script.is_file() {
            bail!("script not found: {}", script.display());
        }
        Ok(Self {
            interpreter,
            script,
            env,
        })
    }

    /// Run the script with inherited standard streams and wait for it.
    ///
    /// The child sees exactly the variables in `env`. Returns the child's
    /// exit code.
    pub fn execute(self) -> Result<ExitCode> {
        log::debug!(
            "running {} {}",
            self.interpreter.display(),
            self.script.display()
        );
        let mut child = Command::new(&self.interpreter)
            .arg(&self.script)
            .env_clear()
            .envs(self.env.iter())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("can't start {}", self.interpreter.display()))?;
        let exit_status = child
            .wait()
            .with_context(|| format!("can't wait for {}", self.interpreter.display()))?;
        Ok(exit_code(exit_status))
    }
}

/// Map a child's status to the code this process should exit with.
///
/// A script that ended without a status of its own (killed by a signal) maps
/// to [`EXIT_FAILURE`].
pub fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => {
            log::warn!("script ended abnormally ({exit_status})");
            EXIT_FAILURE
        }
    }
}

/// Resolve an interpreter path the way a typical shell would.
///
/// Only executable files count, so a stray non-executable entry early in PATH
/// does not hide the real interpreter.
///
/// - Absolute path: returned if it exists.
/// - Single component (`bash`): first match among the `search_paths` (PATH).
/// - Anything else (`./sh`, `bin/sh`): returned if it exists relative to the
///   current directory.
/// - Empty path: `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if is_executable(path) { Some(path) } else { None }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "zoclaw_external_{}_{}_{}",
            tag,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).expect("write script");
        path
    }

    fn process_env() -> Environment {
        Environment::inherited()
    }

    #[test]
    #[cfg(unix)]
    fn absolute_existing() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(osstr("/nowhere"), path).expect("find /bin/sh");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    #[cfg(unix)]
    fn absolute_nonexisting() {
        let res = find_command_path(osstr("/bin"), Path::new("/bin/nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn single_component_found_in_path() {
        let found = find_command_path(osstr("/nowhere:/bin"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    fn single_component_not_found_in_path() {
        let res = find_command_path(osstr("/bin"), Path::new("nonexisting-zoclaw-shell"));
        assert!(res.is_none());
    }

    #[test]
    fn directories_are_not_interpreters() {
        let dir = make_unique_temp_dir("dirs");
        fs::create_dir_all(dir.join("bash")).unwrap();
        let res = find_command_path(dir.as_os_str(), Path::new("bash"));
        assert!(res.is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[cfg(unix)]
    fn write_interpreter(dir: &Path, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        fs::create_dir_all(dir).unwrap();
        let path = write_script(dir, "bash", "#!/bin/sh\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_entries_are_skipped() {
        let dir = make_unique_temp_dir("perms");
        write_interpreter(&dir.join("first"), 0o644);
        let real = write_interpreter(&dir.join("second"), 0o755);
        let search_paths = std::env::join_paths([dir.join("first"), dir.join("second")]).unwrap();

        let found = find_command_path(&search_paths, Path::new("bash")).expect("find bash");
        assert_eq!(found.as_ref(), real.as_path());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_absolute_path_is_none() {
        let dir = make_unique_temp_dir("perms_abs");
        let plain = write_interpreter(&dir, 0o644);
        assert!(find_command_path(osstr("/bin"), &plain).is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_path_is_none() {
        assert!(find_command_path(osstr("/bin"), Path::new("")).is_none());
    }

    #[test]
    fn prepare_rejects_missing_interpreter() {
        let dir = make_unique_temp_dir("noshell");
        let script = write_script(&dir, "setup.sh", "exit 0\n");
        let err = ScriptRun::prepare(Path::new("no-such-shell-zoclaw"), script, process_env())
            .unwrap_err();
        assert!(err.to_string().contains("interpreter not found"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn prepare_rejects_missing_script() {
        let dir = make_unique_temp_dir("noscript");
        let err = ScriptRun::prepare(Path::new("sh"), dir.join("setup.sh"), process_env())
            .unwrap_err();
        assert!(err.to_string().contains("script not found"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn execute_relays_exit_code() {
        let dir = make_unique_temp_dir("exit");
        let script = write_script(&dir, "fail.sh", "exit 7\n");
        let run = ScriptRun::prepare(Path::new("sh"), script, process_env()).unwrap();
        assert_eq!(run.execute().unwrap(), 7);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn execute_success_is_zero() {
        let dir = make_unique_temp_dir("ok");
        let script = write_script(&dir, "ok.sh", "true\n");
        let run = ScriptRun::prepare(Path::new("sh"), script, process_env()).unwrap();
        assert_eq!(run.execute().unwrap(), 0);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn execute_passes_exact_environment() {
        let dir = make_unique_temp_dir("env");
        let script = write_script(
            &dir,
            "env.sh",
            "[ \"$ZOCLAW_CHANNEL\" = next ] || exit 3\n[ -z \"$HOME\" ] || exit 4\n",
        );
        let env = Environment::from_vars([("PATH", "/usr/bin:/bin")]).for_channel(true);
        let run = ScriptRun::prepare(Path::new("sh"), script, env).unwrap();
        assert_eq!(run.execute().unwrap(), 0);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn killed_script_exits_with_failure() {
        let dir = make_unique_temp_dir("signal");
        let script = write_script(&dir, "kill.sh", "kill -TERM $$\n");
        let run = ScriptRun::prepare(Path::new("sh"), script, process_env()).unwrap();
        assert_eq!(run.execute().unwrap(), EXIT_FAILURE);
        let _ = fs::remove_dir_all(dir);
    }
}
