// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The syntactic tree for cQASM. One node vocabulary covers both dialects;
//! the parser decides which constructs are legal for a given grammar, and the
//! analyzer gives the nodes meaning.

pub mod ast;
pub mod serialize;
pub mod visit;
