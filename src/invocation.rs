use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

pub const DEFAULT_CARGO: &str = "cargo";
pub const DEFAULT_BIN: &str = "parami";
pub const DEFAULT_FEATURE: &str = "try-runtime";
pub const DEFAULT_EXECUTION: &str = "Native";
pub const DEFAULT_URI: &str = "wss://rpc.parami.io:443/ws";
pub const DEFAULT_LOG_FILTER: &str = "runtime=trace,try-runtime::cli=trace,executor=trace";

/// Where the state for the upgrade check comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Download state from `uri`, saving it to `snapshot`. An empty pallet
    /// list downloads every pallet.
    Live {
        uri: String,
        snapshot: String,
        pallets: Vec<String>,
    },
    /// Replay a previously saved snapshot.
    Snap { snapshot: String },
}

/// A `cargo run ... -- try-runtime on-runtime-upgrade ...` invocation.
///
/// Arguments are kept as a list and handed to the child directly, so pallet
/// names and file names never pass through a shell.
#[derive(Clone, Debug)]
pub struct TryRuntime {
    cargo: PathBuf,
    bin: String,
    feature: String,
    execution: String,
    log_filter: String,
    target: Target,
}

impl TryRuntime {
    pub fn new(target: Target) -> Self {
        TryRuntime {
            cargo: PathBuf::from(DEFAULT_CARGO),
            bin: DEFAULT_BIN.to_string(),
            feature: DEFAULT_FEATURE.to_string(),
            execution: DEFAULT_EXECUTION.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            target,
        }
    }

    pub fn live(uri: impl Into<String>, snapshot: impl Into<String>, pallets: Vec<String>) -> Self {
        Self::new(Target::Live {
            uri: uri.into(),
            snapshot: snapshot.into(),
            pallets,
        })
    }

    pub fn snap(snapshot: impl Into<String>) -> Self {
        Self::new(Target::Snap {
            snapshot: snapshot.into(),
        })
    }

    pub fn with_cargo(mut self, cargo: impl Into<PathBuf>) -> Self {
        self.cargo = cargo.into();
        self
    }

    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = feature.into();
        self
    }

    pub fn with_execution(mut self, execution: impl Into<String>) -> Self {
        self.execution = execution.into();
        self
    }

    pub fn with_log_filter(mut self, log_filter: impl Into<String>) -> Self {
        self.log_filter = log_filter.into();
        self
    }

    pub fn cargo(&self) -> &Path {
        &self.cargo
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Arguments passed to cargo, in order.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "run".to_string(),
            "--release".to_string(),
            format!("--bin={}", self.bin),
            format!("--features={}", self.feature),
            "--".to_string(),
            "try-runtime".to_string(),
            format!("--execution={}", self.execution),
            "on-runtime-upgrade".to_string(),
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        match &self.target {
            Target::Live {
                uri,
                snapshot,
                pallets,
            } => {
                args.extend(
                    ["live", "--uri", uri.as_str(), "-s", snapshot.as_str()].map(OsString::from),
                );
                for pallet in pallets {
                    args.push("--pallets".into());
                    args.push(pallet.into());
                }
            }
            Target::Snap { snapshot } => {
                args.extend(["snap", "-s", snapshot.as_str()].map(OsString::from));
            }
        }

        args
    }

    /// Environment variables set on the child, on top of the inherited ones.
    pub fn envs(&self) -> Vec<(&'static str, &str)> {
        vec![("RUST_LOG", self.log_filter.as_str())]
    }

    /// The child process, with stdio inherited from the wrapper.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.cargo);
        command
            .args(self.args())
            .envs(self.envs())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }
}

impl fmt::Display for TryRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.envs() {
            write!(f, "{key}={} ", quote(OsStr::new(value)))?;
        }
        write!(f, "{}", quote(self.cargo.as_os_str()))?;
        for arg in self.args() {
            write!(f, " {}", quote(&arg))?;
        }
        Ok(())
    }
}

// Arguments with whitespace or quotes are shown in Rust debug quoting so the
// rendered line stays unambiguous.
fn quote(arg: &OsStr) -> String {
    let s = arg.to_string_lossy();
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("{s:?}")
    } else {
        s.into_owned()
    }
}
