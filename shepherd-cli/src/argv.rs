//! Lenient argument handling for `migrate-workflows`.
//!
//! Unknown arguments are reported and dropped instead of failing the run.
//! The set of known flags comes from the clap definition itself, so the two
//! never drift apart.

use std::ffi::OsString;

use clap::{Command, CommandFactory};

/// Arguments split into what clap should parse and what was dropped.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Partitioned {
    /// Program name followed by every recognized flag and its value.
    pub known: Vec<OsString>,
    pub ignored: Vec<String>,
}

/// Keep the tokens `C` understands. The first token is the program name.
pub fn partition<C: CommandFactory>(args: impl IntoIterator<Item = OsString>) -> Partitioned {
    let mut cmd = C::command();
    cmd.build();

    let mut out = Partitioned::default();
    let mut iter = args.into_iter();
    out.known.extend(iter.next());

    while let Some(token) = iter.next() {
        let Some(text) = token.to_str() else {
            out.ignored.push(token.to_string_lossy().into_owned());
            continue;
        };
        match consumes_next(&cmd, text) {
            Some(takes_next) => {
                out.known.push(token.clone());
                if takes_next {
                    out.known.extend(iter.next());
                }
            }
            None => out.ignored.push(text.to_string()),
        }
    }
    out
}

/// `None` when `token` is not a flag of `cmd`; otherwise whether the flag
/// takes its value from the following token.
fn consumes_next(cmd: &Command, token: &str) -> Option<bool> {
    if let Some(long) = token.strip_prefix("--") {
        let (name, inline) = match long.split_once('=') {
            Some((name, _)) => (name, true),
            None => (long, false),
        };
        if name.is_empty() {
            return None;
        }
        let arg = cmd.get_arguments().find(|a| a.get_long() == Some(name))?;
        let takes_value = arg.get_action().takes_values();
        if inline && !takes_value {
            return None;
        }
        return Some(takes_value && !inline);
    }

    let mut chars = token.strip_prefix('-')?.chars();
    let short = chars.next()?;
    let attached = chars.as_str();
    let arg = cmd.get_arguments().find(|a| a.get_short() == Some(short))?;
    let takes_value = arg.get_action().takes_values();
    match (takes_value, attached.is_empty()) {
        (true, empty) => Some(empty),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
