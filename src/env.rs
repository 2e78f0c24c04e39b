use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};

/// Variable read by the setup scripts to pick a release channel.
pub const CHANNEL_VAR: &str = "ZOCLAW_CHANNEL";

/// Value of [`CHANNEL_VAR`] selecting the development channel.
pub const NEXT_CHANNEL: &str = "next";

/// Immutable set of environment variables handed to the spawned script.
///
/// Built once by copying the process environment, then extended with
/// [`Environment::with_var`], which returns a new value instead of touching
/// the process-wide environment. Keys and values are kept as `OsString` so
/// variables that are not valid UTF-8 pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<OsString, OsString>,
}

impl Environment {
    /// Capture the variables of the current process.
    pub fn inherited() -> Self {
        Self::from_vars(stdenv::vars_os())
    }

    /// Build an environment from arbitrary key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Return a copy of this environment with `key` set to `val`.
    pub fn with_var(&self, key: impl Into<OsString>, val: impl Into<OsString>) -> Self {
        let mut vars = self.vars.clone();
        vars.insert(key.into(), val.into());
        Self { vars }
    }

    /// Return a copy with the channel variable set when `next` is requested,
    /// or an unchanged copy otherwise.
    pub fn for_channel(&self, next: bool) -> Self {
        if next {
            self.with_var(CHANNEL_VAR, NEXT_CHANNEL)
        } else {
            self.clone()
        }
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    /// Like [`Environment::get`], but ignores unset, empty and non-UTF-8 values.
    pub fn get_str(&self, key: impl AsRef<OsStr>) -> Option<&str> {
        self.get(key)
            .and_then(OsStr::to_str)
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
