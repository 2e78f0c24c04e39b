use argh::{EarlyExit, FromArgs};

#[derive(FromArgs, Debug, Default, PartialEq, Eq)]
/// Run a zoclaw setup script.
pub struct Flags {
    #[argh(switch)]
    /// use @next (dev) channel for dependencies.
    pub next: bool,
}

/// Flags understood by [`Flags`]. Anything else starting with `-` is dropped.
const KNOWN_FLAGS: &[&str] = &["--next"];

/// A parsed command line: the command token, if any, plus recognized flags.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    pub command: Option<String>,
    pub flags: Flags,
}

/// Split the argument vector (without the program name) into a command and flags.
///
/// The first token not starting with `-` is the command; every token starting
/// with `-` is a flag regardless of position. Unrecognized flags are ignored and
/// a repeated flag counts once.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> anyhow::Result<Invocation> {
    let (flags, words): (Vec<&str>, Vec<&str>) = args
        .iter()
        .map(AsRef::<str>::as_ref)
        .partition(|arg| arg.starts_with('-'));

    let mut known: Vec<&str> = Vec::new();
    for flag in flags {
        if known.contains(&flag) {
            continue;
        }
        if KNOWN_FLAGS.contains(&flag) {
            known.push(flag);
        } else {
            log::debug!("ignoring unrecognized flag {flag}");
        }
    }

    let flags = Flags::from_args(&["zoclaw"], &known)
        .map_err(|EarlyExit { output, .. }| anyhow::anyhow!("invalid flags: {}", output))?;

    Ok(Invocation {
        command: words.first().map(|w| w.to_string()),
        flags,
    })
}
