use std::io::Write;

/// Status zoclaw exits with: one of the constants below, or the script's own
/// exit status passed through as is.
pub type ExitCode = i32;

/// Exit code for a help request (no command given).
pub const EXIT_HELP: ExitCode = 0;

/// Exit code for an unknown command or a script that could not be launched.
pub const EXIT_FAILURE: ExitCode = 1;

/// A command known to the dispatcher at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptCommand {
    /// Name typed on the command line, e.g. "init".
    pub name: &'static str,
    /// File name of the script inside the scripts directory.
    pub script: &'static str,
    /// One-line description shown in the usage text.
    pub description: &'static str,
}

/// Fixed mapping from command names to the scripts they run.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: Vec<ScriptCommand>,
}

impl CommandTable {
    /// Build a table from an arbitrary set of commands.
    pub fn new(commands: Vec<ScriptCommand>) -> Self {
        Self { commands }
    }

    /// Look a command up by its name.
    pub fn get(&self, name: &str) -> Option<&ScriptCommand> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptCommand> {
        self.commands.iter()
    }

    /// Write the usage message listing every command and supported option.
    pub fn write_usage(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Usage: zoclaw <command> [options]")?;
        writeln!(out)?;
        writeln!(out, "Commands:")?;
        for cmd in &self.commands {
            writeln!(out, "  {:<12}{}", cmd.name, cmd.description)?;
        }
        writeln!(out)?;
        writeln!(out, "Options:")?;
        writeln!(out, "  {:<12}{}", "--next", "Use @next (dev) channel for dependencies")?;
        Ok(())
    }
}

impl Default for CommandTable {
    /// The commands shipped with zoclaw:
    /// - `init` runs `setup.sh`
    /// - `bootstrap` runs `bootstrap.sh`
    fn default() -> Self {
        Self::new(vec![
            ScriptCommand {
                name: "init",
                script: "setup.sh",
                description: "Full setup (Tailscale + OpenClaw + bootstrap)",
            },
            ScriptCommand {
                name: "bootstrap",
                script: "bootstrap.sh",
                description: "Config patches only (if already installed)",
            },
        ])
    }
}
