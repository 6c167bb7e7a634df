//! Condition evaluation against the current machine.

use crate::directive::{Condition, Directive};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Operating systems a directive can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsType {
    Windows,
    Linux,
    #[serde(alias = "macos", alias = "osx", alias = "darwin")]
    Mac,
}

impl OsType {
    /// The OS this binary was compiled for. Anything that is neither Windows
    /// nor macOS is treated as Linux.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Mac => "mac",
        }
    }
}

impl FromStr for OsType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            "mac" | "macos" | "osx" | "darwin" => Ok(Self::Mac),
            _ => Err(Error::UnknownOs(s.to_string())),
        }
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of environment variable names.
///
/// Only presence matters to `env=` conditions, so values are not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    names: BTreeSet<String>,
}

impl Environment {
    /// Captures the names currently set in the process environment.
    pub fn from_process() -> Self {
        Self {
            names: std::env::vars_os()
                .filter_map(|(name, _)| name.into_string().ok())
                .collect(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Looks up the upper-cased form of `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_uppercase())
    }
}

/// Facts about the machine a document is written on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineFacts {
    pub os: OsType,
    pub host_name: Option<String>,
    pub environment: Environment,
}

impl MachineFacts {
    /// Facts with the given OS, no host name and an empty environment.
    pub fn new(os: OsType) -> Self {
        Self {
            os,
            host_name: None,
            environment: Environment::default(),
        }
    }

    /// Facts for the running process: compiled OS and live environment.
    pub fn detect(host_name: Option<String>) -> Self {
        Self {
            os: OsType::current(),
            host_name,
            environment: Environment::from_process(),
        }
    }

    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}

/// Outcome of evaluating a directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    /// Every condition holds; content stays active.
    Applies,
    /// Some condition fails; content gets commented out.
    Excluded,
    /// An `os=` value names no known OS; the region is left alone.
    Unevaluable { token: String },
}

/// Evaluates all conditions of a directive. Conditions are ANDed and absent
/// kinds hold vacuously.
///
/// # Example
/// ```
/// use sync_directives::condition::{evaluate, MachineFacts, OsType, Verdict};
/// use sync_directives::directive::parse_directive;
///
/// let directive = parse_directive("// @sync os=linux").unwrap();
/// let facts = MachineFacts::new(OsType::Mac);
/// assert_eq!(evaluate(&directive, &facts), Verdict::Excluded);
/// ```
pub fn evaluate(directive: &Directive, facts: &MachineFacts) -> Verdict {
    if let Some(token) = unevaluable_token(directive) {
        return Verdict::Unevaluable { token };
    }

    let mut applies = true;

    for condition in &directive.conditions {
        let holds = match condition {
            Condition::Os(name) => name.parse::<OsType>().is_ok_and(|os| os == facts.os),
            Condition::Host(value) => facts.host_name.as_deref().is_some_and(|host| {
                !host.is_empty() && host.to_lowercase() == value.to_lowercase()
            }),
            Condition::Env(name) => facts.environment.contains(name),
        };
        applies &= holds;
    }

    if applies {
        Verdict::Applies
    } else {
        Verdict::Excluded
    }
}

/// The first `os=` token naming no known OS, rendered as `os=<value>`.
pub fn unevaluable_token(directive: &Directive) -> Option<String> {
    directive.conditions.iter().find_map(|condition| match condition {
        Condition::Os(name) if name.parse::<OsType>().is_err() => Some(condition.to_string()),
        _ => None,
    })
}
