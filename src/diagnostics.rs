/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The append-only diagnostic list accumulated across both passes.
//! Everything but `SymbolIgnoredWarn` is blocking: it suppresses encoding
//! for the rest of the offending line and, at emission time, suppresses
//! all three output files.

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Blocking,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticCode {
    SyntaxError(String),
    SymbolRedefinition(String),
    SymbolIgnoredWarn(String),
    InvalidLabelDef(String),
    LabelAlreadyExistsAsExtern(String),
    LabelAlreadyExistsAsEntry(String),
    LabelCannotBeOpcodeOrRegister(String),
    ImmediateOutOfRange(String),
    UnknownOperand(String),
    UndefinedLabel(String),
}

impl DiagnosticCode {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticCode::SymbolIgnoredWarn(_) => Severity::Warning,
            _ => Severity::Blocking,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::SyntaxError(s) => write!(f, "syntax error: {s}"),
            DiagnosticCode::SymbolRedefinition(s) => write!(f, "symbol redefinition: {s}"),
            DiagnosticCode::SymbolIgnoredWarn(s) => write!(f, "label ignored: {s}"),
            DiagnosticCode::InvalidLabelDef(s) => write!(f, "invalid label definition: {s}"),
            DiagnosticCode::LabelAlreadyExistsAsExtern(s) => {
                write!(f, "label already declared extern: {s}")
            }
            DiagnosticCode::LabelAlreadyExistsAsEntry(s) => {
                write!(f, "label already declared entry: {s}")
            }
            DiagnosticCode::LabelCannotBeOpcodeOrRegister(s) => {
                write!(f, "label cannot be an opcode or register name: {s}")
            }
            DiagnosticCode::ImmediateOutOfRange(s) => write!(f, "immediate out of range: {s}"),
            DiagnosticCode::UnknownOperand(s) => write!(f, "unknown operand: {s}"),
            DiagnosticCode::UndefinedLabel(s) => write!(f, "undefined label: {s}"),
        }
    }
}

/// One accumulated diagnostic: the offending line number plus the byte
/// range within that line the error was detected at, for cosmetics a
/// caller may layer on top (spec.md explicitly keeps that formatting out
/// of scope for this crate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line_number: usize,
    pub range_start: usize,
    pub range_end: usize,
    pub code: DiagnosticCode,
}

impl Diagnostic {
    pub fn new(line_number: usize, range: std::ops::Range<usize>, code: DiagnosticCode) -> Self {
        Diagnostic {
            line_number,
            range_start: range.start,
            range_end: range.end,
            code,
        }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

/// Append-only across both passes; never edited once pushed.
#[derive(Debug, Default)]
pub struct DiagnosticList {
    nodes: Vec<Diagnostic>,
}

impl DiagnosticList {
    pub fn new() -> Self {
        DiagnosticList::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.nodes.push(diagnostic);
    }

    /// Appends every diagnostic from `other`, preserving its internal
    /// order. Used to append pass two's diagnostics after pass one's.
    pub fn extend(&mut self, other: DiagnosticList) {
        self.nodes.extend(other.nodes);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.nodes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_blocking(&self) -> bool {
        self.nodes.iter().any(|d| d.severity() == Severity::Blocking)
    }
}
