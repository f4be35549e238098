// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use enum_iterator::Sequence;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A reserved word. `true` and `false` are lexed as keywords for both dialects;
/// the legacy grammar treats them as ordinary identifiers again, since there
/// they are default mappings rather than literals.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Sequence)]
pub(super) enum Keyword {
    Bit,
    Break,
    Continue,
    False,
    Map,
    Qubit,
    Qubits,
    True,
    Version,
}

impl Keyword {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Keyword::Bit => "bit",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::False => "false",
            Keyword::Map => "map",
            Keyword::Qubit => "qubit",
            Keyword::Qubits => "qubits",
            Keyword::True => "true",
            Keyword::Version => "version",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum_iterator::all::<Self>()
            .find(|keyword| keyword.as_str() == s)
            .ok_or(())
    }
}
