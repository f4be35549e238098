// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// A cQASM version: a dot-separated list of non-negative integer components.
///
/// Comparison is lexicographic, with missing trailing components treated as
/// zero, so `1.0` and `1.0.0` compare equal.
#[derive(Clone, Debug, Default, Eq)]
pub struct Version(pub Vec<u64>);

/// Error returned when a version string does not have the form `M(.N)*`.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("invalid version component")]
pub struct InvalidVersion;

impl Version {
    #[must_use]
    pub fn new(components: &[u64]) -> Self {
        Self(components.to_vec())
    }

    /// The component at `index`, with missing components reading as zero.
    #[must_use]
    pub fn component(&self, index: usize) -> u64 {
        self.0.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('.')
            .map(|component| component.parse().map_err(|_| InvalidVersion))
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut components = self.0.iter();
        if let Some(first) = components.next() {
            write!(f, "{first}")?;
            for component in components {
                write!(f, ".{component}")?;
            }
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in 0..self.0.len().max(other.0.len()) {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => {}
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }
}
