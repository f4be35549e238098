// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::version::Version;
use std::fmt::{self, Display, Formatter};

/// The two cQASM language dialects. They share one analyzer architecture but
/// differ in grammar, type system, and default instruction set.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dialect {
    /// The legacy 1.x dialect. Names resolve case-insensitively.
    V1,
    /// The 3.x dialect. Names resolve case-sensitively.
    V3,
}

impl Dialect {
    /// Selects the dialect that parses files with the given version header.
    #[must_use]
    pub fn for_version(version: &Version) -> Self {
        if version.component(0) < 3 {
            Self::V1
        } else {
            Self::V3
        }
    }

    /// Whether names in this dialect match case-sensitively.
    #[must_use]
    pub fn case_sensitive(self) -> bool {
        match self {
            Self::V1 => false,
            Self::V3 => true,
        }
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("1.x"),
            Self::V3 => f.write_str("3.x"),
        }
    }
}
