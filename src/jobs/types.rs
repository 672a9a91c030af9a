/*!
 * Job Types
 * Job capability, arguments and descriptors
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A unit of work executed inside a forked child
///
/// The supervisor does not interpret the outcome beyond the child's exit
/// status: `Ok` exits 0, `Err` exits 1.
pub trait Job: Send {
    fn perform(&mut self) -> anyhow::Result<()>;
}

impl<F> Job for F
where
    F: FnMut() -> anyhow::Result<()> + Send,
{
    fn perform(&mut self) -> anyhow::Result<()> {
        self()
    }
}

/// Named string arguments handed to a job factory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobArgs(BTreeMap<String, String>);

impl JobArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Get a required argument
    pub fn require(&self, key: &str) -> anyhow::Result<&str> {
        self.get(key)
            .ok_or_else(|| anyhow::anyhow!("missing required argument '{}'", key))
    }

    /// Parse an optional argument
    pub fn parse<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| anyhow::anyhow!("argument '{}' = '{}': {}", key, raw, e))
            })
            .transpose()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for JobArgs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Typed request to run one job: a registered kind plus its arguments
///
/// Owned by the caller and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobDescriptor {
    pub kind: String,
    #[serde(default, skip_serializing_if = "JobArgs::is_empty")]
    pub args: JobArgs,
}

impl JobDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            args: JobArgs::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key, value);
        self
    }

    pub fn with_args(mut self, args: JobArgs) -> Self {
        self.args = args;
        self
    }
}
