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

//! Pass one: classify every line, populate the symbol table, and perform
//! a first encoding that leaves label operands as zero/Absolute
//! placeholders for pass two to patch.
//!
//! Dispatch is a single match over [`LineState`], the tagged variant
//! spec.md's design notes ask for in place of a table of function
//! pointers indexed by classifier state.

use crate::assembler::encoder::{self, Operand};
use crate::assembler::line_scan::{
    parse_group5_operand, parse_operand_tokens, parse_string_literal, split_label,
};
use crate::assembler::memory_image::MemoryImage;
use crate::assembler::symbol_table::{EntryOutcome, InsertOutcome, SymbolKind, SymbolTable};
use crate::classifiers::{get_opcode, is_valid_label, Opcode, SyntaxGroup};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticList};
use crate::line_iterator::LineIterator;

pub struct FirstPassOutput {
    pub image: MemoryImage,
    pub symbols: SymbolTable,
    pub diagnostics: DiagnosticList,
}

/// The six terminal dispatch states plus the two pseudo-states, per
/// spec.md §4.3. Each variant carries just enough to route to its
/// handler; the handler does its own operand parsing and validation.
enum LineState {
    SymEnt,
    SymExt,
    SymData,
    SymStr,
    SymDef(Opcode),
    Opcode(Opcode),
    SymIgnored,
    None,
}

fn classify(label_present: bool, keyword: &str) -> LineState {
    match keyword {
        ".entry" => {
            if label_present {
                LineState::SymIgnored
            } else {
                LineState::SymEnt
            }
        }
        ".extern" => {
            if label_present {
                LineState::SymIgnored
            } else {
                LineState::SymExt
            }
        }
        ".data" if label_present => LineState::SymData,
        ".string" if label_present => LineState::SymStr,
        _ => match get_opcode(keyword) {
            Some(opcode) if label_present => LineState::SymDef(opcode),
            Some(opcode) => LineState::Opcode(opcode),
            None => LineState::None,
        },
    }
}

pub fn run(lines: &[String]) -> FirstPassOutput {
    let mut image = MemoryImage::new();
    let mut symbols = SymbolTable::new();
    let mut diagnostics = DiagnosticList::new();
    let mut should_encode = true;
    let mut pending_entries: Vec<(String, usize)> = Vec::new();

    for (idx, raw_line) in lines.iter().enumerate() {
        let line_number = idx + 1;
        let stripped = raw_line.trim_start();
        if stripped.is_empty() || stripped.starts_with(';') {
            continue;
        }

        let (mut iter, split) = split_label(raw_line);

        if split.keyword.is_empty() {
            diagnostics.push(Diagnostic::new(
                line_number,
                0..raw_line.len(),
                DiagnosticCode::SyntaxError("expected a directive or mnemonic".to_string()),
            ));
            should_encode = false;
            continue;
        }

        let label_matters = split.keyword != ".entry" && split.keyword != ".extern";
        let label_valid = split.label.as_deref().map(is_valid_label);
        if label_matters && label_valid == Some(false) {
            diagnostics.push(Diagnostic::new(
                line_number,
                0..raw_line.len(),
                DiagnosticCode::InvalidLabelDef(split.label.clone().unwrap()),
            ));
            should_encode = false;
        }

        let state = classify(split.label.is_some(), &split.keyword);

        match state {
            LineState::SymIgnored => {
                diagnostics.push(Diagnostic::new(
                    line_number,
                    0..raw_line.len(),
                    DiagnosticCode::SymbolIgnoredWarn(split.label.clone().unwrap_or_default()),
                ));
                handle_directive_target(
                    &split.keyword,
                    &mut iter,
                    line_number,
                    raw_line,
                    &mut symbols,
                    &mut pending_entries,
                    &mut diagnostics,
                    &mut should_encode,
                );
            }
            LineState::SymEnt => {
                handle_directive_target(
                    &split.keyword,
                    &mut iter,
                    line_number,
                    raw_line,
                    &mut symbols,
                    &mut pending_entries,
                    &mut diagnostics,
                    &mut should_encode,
                );
            }
            LineState::SymExt => {
                handle_directive_target(
                    &split.keyword,
                    &mut iter,
                    line_number,
                    raw_line,
                    &mut symbols,
                    &mut pending_entries,
                    &mut diagnostics,
                    &mut should_encode,
                );
            }
            LineState::SymData => {
                let label = split.label.clone().unwrap();
                handle_data(
                    &label,
                    label_valid.unwrap_or(false),
                    &mut iter,
                    line_number,
                    raw_line,
                    &mut image,
                    &mut symbols,
                    &mut diagnostics,
                    &mut should_encode,
                );
            }
            LineState::SymStr => {
                let label = split.label.clone().unwrap();
                handle_string(
                    &label,
                    label_valid.unwrap_or(false),
                    &mut iter,
                    line_number,
                    raw_line,
                    &mut image,
                    &mut symbols,
                    &mut diagnostics,
                    &mut should_encode,
                );
            }
            LineState::SymDef(opcode) => {
                let label = split.label.clone().unwrap();
                if label_valid.unwrap_or(false) {
                    let address = image.instruction_counter();
                    if let InsertOutcome::Redefinition =
                        symbols.define(&label, SymbolKind::Code, address)
                    {
                        diagnostics.push(Diagnostic::new(
                            line_number,
                            0..raw_line.len(),
                            DiagnosticCode::SymbolRedefinition(label.clone()),
                        ));
                        should_encode = false;
                    }
                }
                handle_instruction(
                    opcode,
                    &mut iter,
                    line_number,
                    raw_line,
                    &mut image,
                    &mut diagnostics,
                    &mut should_encode,
                );
            }
            LineState::Opcode(opcode) => {
                handle_instruction(
                    opcode,
                    &mut iter,
                    line_number,
                    raw_line,
                    &mut image,
                    &mut diagnostics,
                    &mut should_encode,
                );
            }
            LineState::None => {
                diagnostics.push(Diagnostic::new(
                    line_number,
                    0..raw_line.len(),
                    DiagnosticCode::SyntaxError(format!(
                        "unrecognized directive or mnemonic '{}'",
                        split.keyword
                    )),
                ));
                should_encode = false;
            }
        }
    }

    symbols.relocate_data_symbols(image.data_base());

    for (name, line_number) in pending_entries {
        match symbols.promote_to_entry(&name) {
            EntryOutcome::Promoted => {}
            EntryOutcome::NotFound => {
                diagnostics.push(Diagnostic::new(
                    line_number,
                    0..0,
                    DiagnosticCode::UndefinedLabel(name),
                ));
            }
            EntryOutcome::Redefinition => {
                let code = match symbols.kind_of(&name) {
                    Some(SymbolKind::Extern) => {
                        DiagnosticCode::LabelAlreadyExistsAsExtern(name)
                    }
                    _ => DiagnosticCode::LabelAlreadyExistsAsEntry(name),
                };
                diagnostics.push(Diagnostic::new(line_number, 0..0, code));
            }
        }
    }

    symbols.seal();

    FirstPassOutput {
        image,
        symbols,
        diagnostics,
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_directive_target(
    keyword: &str,
    iter: &mut LineIterator,
    line_number: usize,
    raw_line: &str,
    symbols: &mut SymbolTable,
    pending_entries: &mut Vec<(String, usize)>,
    diagnostics: &mut DiagnosticList,
    should_encode: &mut bool,
) {
    iter.consume_blanks();
    let target = iter.next_word(&[' ', '\t']);
    if target.is_empty() || !is_valid_label(&target) {
        diagnostics.push(Diagnostic::new(
            line_number,
            0..raw_line.len(),
            DiagnosticCode::LabelCannotBeOpcodeOrRegister(target),
        ));
        *should_encode = false;
        return;
    }

    if keyword == ".entry" {
        pending_entries.push((target, line_number));
    } else {
        debug_assert_eq!(keyword, ".extern");
        if let InsertOutcome::Redefinition = symbols.insert_extern(&target) {
            diagnostics.push(Diagnostic::new(
                line_number,
                0..raw_line.len(),
                DiagnosticCode::SymbolRedefinition(target),
            ));
            *should_encode = false;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_data(
    label: &str,
    label_valid: bool,
    iter: &mut LineIterator,
    line_number: usize,
    raw_line: &str,
    image: &mut MemoryImage,
    symbols: &mut SymbolTable,
    diagnostics: &mut DiagnosticList,
    should_encode: &mut bool,
) {
    let tokens = parse_operand_tokens(iter);
    if tokens.is_empty() {
        diagnostics.push(Diagnostic::new(
            line_number,
            0..raw_line.len(),
            DiagnosticCode::SyntaxError(".data requires at least one value".to_string()),
        ));
        *should_encode = false;
        return;
    }

    let mut values = Vec::with_capacity(tokens.len());
    for token in &tokens {
        match token.parse::<i16>() {
            Ok(v) if (-8192..=8191).contains(&v) => values.push(v),
            _ => {
                diagnostics.push(Diagnostic::new(
                    line_number,
                    0..raw_line.len(),
                    DiagnosticCode::ImmediateOutOfRange(token.clone()),
                ));
                *should_encode = false;
            }
        }
    }

    if label_valid {
        if let InsertOutcome::Redefinition =
            symbols.define(label, SymbolKind::Data, image.data_counter())
        {
            diagnostics.push(Diagnostic::new(
                line_number,
                0..raw_line.len(),
                DiagnosticCode::SymbolRedefinition(label.to_string()),
            ));
            *should_encode = false;
        }
    }

    if *should_encode {
        for word in encoder::encode_data(&values) {
            image.push_data_word(word);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_string(
    label: &str,
    label_valid: bool,
    iter: &mut LineIterator,
    line_number: usize,
    raw_line: &str,
    image: &mut MemoryImage,
    symbols: &mut SymbolTable,
    diagnostics: &mut DiagnosticList,
    should_encode: &mut bool,
) {
    let Some(text) = parse_string_literal(iter) else {
        diagnostics.push(Diagnostic::new(
            line_number,
            0..raw_line.len(),
            DiagnosticCode::SyntaxError(".string requires a quoted literal".to_string()),
        ));
        *should_encode = false;
        return;
    };

    if label_valid {
        if let InsertOutcome::Redefinition =
            symbols.define(label, SymbolKind::Data, image.data_counter())
        {
            diagnostics.push(Diagnostic::new(
                line_number,
                0..raw_line.len(),
                DiagnosticCode::SymbolRedefinition(label.to_string()),
            ));
            *should_encode = false;
        }
    }

    if *should_encode {
        for word in encoder::encode_string(&text) {
            image.push_data_word(word);
        }
    }
}

/// Which addressing modes an operand slot accepts.
#[derive(Copy, Clone)]
enum Restriction {
    Any,
    NotImmediate,
    RegisterOnly,
    LabelOrIndex,
}

fn restriction_ok(operand: &Operand, restriction: Restriction) -> bool {
    match (restriction, operand) {
        (Restriction::Any, _) => true,
        (Restriction::NotImmediate, Operand::Immediate(_)) => false,
        (Restriction::NotImmediate, _) => true,
        (Restriction::RegisterOnly, Operand::Register(_)) => true,
        (Restriction::RegisterOnly, _) => false,
        (Restriction::LabelOrIndex, Operand::Label(_)) => true,
        (Restriction::LabelOrIndex, Operand::Index(_, _)) => true,
        (Restriction::LabelOrIndex, _) => false,
    }
}

fn operand_restrictions(group: SyntaxGroup) -> Vec<Restriction> {
    match group {
        SyntaxGroup::Group1 => vec![Restriction::Any, Restriction::NotImmediate],
        SyntaxGroup::Group2 => vec![Restriction::Any, Restriction::Any],
        SyntaxGroup::Group3 => vec![Restriction::NotImmediate],
        SyntaxGroup::Group4 => vec![],
        SyntaxGroup::Group6 => vec![Restriction::Any],
        SyntaxGroup::Group7 => vec![Restriction::LabelOrIndex, Restriction::RegisterOnly],
        SyntaxGroup::Group5 => vec![],
    }
}

fn handle_instruction(
    opcode: Opcode,
    iter: &mut LineIterator,
    line_number: usize,
    raw_line: &str,
    image: &mut MemoryImage,
    diagnostics: &mut DiagnosticList,
    should_encode: &mut bool,
) {
    let group = opcode.syntax_group();

    let operands = match group {
        SyntaxGroup::Group4 => Some(Vec::new()),
        SyntaxGroup::Group5 => {
            let (label, params) = parse_group5_operand(iter);
            if label.is_empty() {
                diagnostics.push(Diagnostic::new(
                    line_number,
                    0..raw_line.len(),
                    DiagnosticCode::SyntaxError("expected a target label".to_string()),
                ));
                None
            } else {
                let mut parsed = vec![Operand::Label(label)];
                let mut ok = true;
                for token in params {
                    match encoder::parse_operand(&token) {
                        Ok(op) => parsed.push(op),
                        Err(code) => {
                            diagnostics.push(Diagnostic::new(line_number, 0..raw_line.len(), code));
                            ok = false;
                        }
                    }
                }
                ok.then_some(parsed)
            }
        }
        _ => {
            let tokens = parse_operand_tokens(iter);
            let restrictions = operand_restrictions(group);
            if tokens.len() != restrictions.len() {
                diagnostics.push(Diagnostic::new(
                    line_number,
                    0..raw_line.len(),
                    DiagnosticCode::SyntaxError(format!(
                        "{opcode:?} expects {} operand(s), found {}",
                        restrictions.len(),
                        tokens.len()
                    )),
                ));
                None
            } else {
                let mut parsed = Vec::with_capacity(tokens.len());
                let mut ok = true;
                for (token, restriction) in tokens.iter().zip(restrictions) {
                    match encoder::parse_operand(token) {
                        Ok(op) => {
                            if restriction_ok(&op, restriction) {
                                parsed.push(op);
                            } else {
                                diagnostics.push(Diagnostic::new(
                                    line_number,
                                    0..raw_line.len(),
                                    DiagnosticCode::UnknownOperand(token.clone()),
                                ));
                                ok = false;
                            }
                        }
                        Err(code) => {
                            diagnostics.push(Diagnostic::new(line_number, 0..raw_line.len(), code));
                            ok = false;
                        }
                    }
                }
                ok.then_some(parsed)
            }
        }
    };

    let Some(operands) = operands else {
        *should_encode = false;
        return;
    };

    if *should_encode {
        for word in encoder::encode_instruction(opcode, group, operands) {
            image.push_instruction_word(word);
        }
    } else {
        // Still advance nothing: once should_encode is false for the rest
        // of the pass, later lines keep accumulating diagnostics but no
        // image state, per spec.md's single global should-encode flag.
    }
}
