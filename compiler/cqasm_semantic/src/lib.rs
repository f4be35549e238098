// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The semantic tree for cQASM: name-resolved, type-checked, constant-folded
//! programs, plus the type and value model shared by the analyzer's registries.

pub mod instruction;
pub mod semantic;
pub mod serialize;
pub mod types;
pub mod value;
