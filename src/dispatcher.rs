use crate::command::{CommandTable, EXIT_FAILURE, EXIT_HELP, ExitCode, ScriptCommand};
use crate::config::Settings;
use crate::env::Environment;
use crate::external::ScriptRun;
use crate::parser::{Invocation, parse_args};
use anyhow::Result;
use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;

/// What an [`Invocation`] asks the dispatcher to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// No command was given; show usage and succeed.
    Help,
    /// The command is not in the table; show usage and fail.
    UnknownCommand(String),
    /// Run the command's script.
    Run(&'a ScriptCommand),
}

/// Where a [`Dispatcher`] gets its [`Settings`] from.
enum SettingsSource {
    Fixed(Settings),
    /// Derived from the executable location on first use, so usage can be
    /// shown even when the location is unknown.
    Executable(std::io::Result<PathBuf>),
}

/// Maps a command name to a setup script and runs it.
///
/// Example
/// ```no_run
/// use zoclaw::Dispatcher;
/// let code = Dispatcher::from_process().run(&["init", "--next"]).unwrap();
/// std::process::exit(code);
/// ```
pub struct Dispatcher {
    table: CommandTable,
    settings: SettingsSource,
    env: Environment,
}

impl Dispatcher {
    pub fn new(table: CommandTable, settings: Settings, env: Environment) -> Self {
        Self {
            table,
            settings: SettingsSource::Fixed(settings),
            env,
        }
    }

    /// Dispatcher whose settings come from `env` and the executable path `exe`.
    ///
    /// A failed `exe` lookup only surfaces once a script has to be run.
    pub fn for_executable(
        table: CommandTable,
        env: Environment,
        exe: std::io::Result<PathBuf>,
    ) -> Self {
        Self {
            table,
            settings: SettingsSource::Executable(exe),
            env,
        }
    }

    /// Dispatcher for the running executable, with the default commands and
    /// the inherited environment.
    pub fn from_process() -> Self {
        Self::for_executable(
            CommandTable::default(),
            Environment::inherited(),
            std::env::current_exe(),
        )
    }

    pub fn settings(&self) -> Result<Cow<'_, Settings>> {
        match &self.settings {
            SettingsSource::Fixed(settings) => Ok(Cow::Borrowed(settings)),
            SettingsSource::Executable(Ok(exe)) => {
                Ok(Cow::Owned(Settings::resolve(&self.env, exe)))
            }
            SettingsSource::Executable(Err(err)) => {
                Err(anyhow::anyhow!("can't locate the zoclaw executable: {err}"))
            }
        }
    }

    pub fn resolve<'a>(&'a self, invocation: &Invocation) -> Resolution<'a> {
        match invocation.command.as_deref() {
            None => Resolution::Help,
            Some(name) => match self.table.get(name) {
                Some(cmd) => Resolution::Run(cmd),
                None => Resolution::UnknownCommand(name.to_string()),
            },
        }
    }

    pub fn script_path(&self, cmd: &ScriptCommand) -> Result<PathBuf> {
        Ok(self.settings()?.scripts_dir.join(cmd.script))
    }

    /// Build the script launch for `cmd` without starting it.
    pub fn prepare(&self, cmd: &ScriptCommand, invocation: &Invocation) -> Result<ScriptRun> {
        let settings = self.settings()?;
        let env = self.env.for_channel(invocation.flags.next);
        ScriptRun::prepare(&settings.shell, settings.scripts_dir.join(cmd.script), env)
    }

    /// Parse `args`, then show usage or run the selected script.
    ///
    /// Usage goes to `out`; the script itself inherits the process streams.
    /// Returns the code the process should exit with. Errors mean the script
    /// could not be launched.
    pub fn run_with_output<S: AsRef<str>>(
        &self,
        args: &[S],
        out: &mut dyn Write,
    ) -> Result<ExitCode> {
        let invocation = parse_args(args)?;
        match self.resolve(&invocation) {
            Resolution::Help => {
                self.table.write_usage(out)?;
                Ok(EXIT_HELP)
            }
            Resolution::UnknownCommand(name) => {
                log::debug!("unknown command {name:?}");
                self.table.write_usage(out)?;
                Ok(EXIT_FAILURE)
            }
            Resolution::Run(cmd) => {
                log::debug!(
                    "command {} -> {} (next channel: {})",
                    cmd.name,
                    cmd.script,
                    invocation.flags.next
                );
                self.prepare(cmd, &invocation)?.execute()
            }
        }
    }

    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<ExitCode> {
        self.run_with_output(args, &mut std::io::stdout())
    }
}
