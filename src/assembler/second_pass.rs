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

//! Pass two: walk the source a second time with a sealed symbol table,
//! re-deriving each instruction's operand list to find its label and
//! index operand words and patching them in place with resolved
//! addresses. Directives contribute no words here; pass one already
//! emitted everything that needed emitting.

use crate::assembler::encoder::{self, Operand, OperandWord};
use crate::assembler::line_scan::{parse_group5_operand, parse_operand_tokens, split_label};
use crate::assembler::memory_image::MemoryImage;
use crate::assembler::symbol_table::{SymbolKind, SymbolTable};
use crate::classifiers::{get_opcode, SyntaxGroup};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticList};

/// One instruction-image address at which an EXTERN symbol was
/// referenced, for the externals table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternReference {
    pub name: String,
    pub address: u32,
}

pub struct SecondPassOutput {
    pub diagnostics: DiagnosticList,
    pub externals: Vec<ExternReference>,
}

/// Re-walks `lines` against the now-sealed `symbols`, patching every
/// label and index operand word in `image`'s instruction array with its
/// resolved address. Diagnostics raised here are appended after pass
/// one's own list, per source-order reporting; `externals` lists every
/// site an EXTERN symbol was referenced from, in encounter order, for
/// the externals table.
pub fn run(lines: &[String], symbols: &SymbolTable, image: &mut MemoryImage) -> SecondPassOutput {
    debug_assert!(symbols.is_sealed());

    let mut diagnostics = DiagnosticList::new();
    let mut externals = Vec::new();
    image.reset_instruction_counter();

    for (idx, raw_line) in lines.iter().enumerate() {
        let line_number = idx + 1;
        let stripped = raw_line.trim_start();
        if stripped.is_empty() || stripped.starts_with(';') {
            continue;
        }

        let (mut iter, split) = split_label(raw_line);
        if split.keyword.is_empty()
            || split.keyword == ".entry"
            || split.keyword == ".extern"
            || split.keyword == ".data"
            || split.keyword == ".string"
        {
            continue;
        }

        let Some(opcode) = get_opcode(&split.keyword) else {
            continue;
        };
        let group = opcode.syntax_group();

        let operands = match group {
            SyntaxGroup::Group4 => Vec::new(),
            SyntaxGroup::Group5 => {
                let (label, params) = parse_group5_operand(&mut iter);
                let mut parsed = vec![Operand::Label(label)];
                for token in params {
                    if let Ok(op) = encoder::parse_operand(&token) {
                        parsed.push(op);
                    }
                }
                parsed
            }
            _ => {
                let tokens = parse_operand_tokens(&mut iter);
                tokens
                    .iter()
                    .filter_map(|t| encoder::parse_operand(t).ok())
                    .collect()
            }
        };

        let span = encoder::span_for(group, &operands);
        let base_addr = image.instruction_counter();
        patch_operand_words(
            base_addr,
            group,
            &operands,
            symbols,
            image,
            line_number,
            &mut diagnostics,
            &mut externals,
        );
        image.advance_instruction_counter(span);
    }

    SecondPassOutput {
        diagnostics,
        externals,
    }
}

#[allow(clippy::too_many_arguments)]
fn patch_operand_words(
    base_addr: u32,
    group: SyntaxGroup,
    operands: &[Operand],
    symbols: &SymbolTable,
    image: &mut MemoryImage,
    line_number: usize,
    diagnostics: &mut DiagnosticList,
    externals: &mut Vec<ExternReference>,
) {
    let words = encoder::operand_word_kinds(group, operands);
    for (offset, word) in words.iter().enumerate() {
        let addr = base_addr + 1 + offset as u32;
        match word {
            OperandWord::Value(Operand::Label(name)) => {
                patch_label(addr, name, symbols, image, line_number, diagnostics, externals);
            }
            OperandWord::Value(Operand::Index(name, _)) => {
                patch_index(addr, name, symbols, image, line_number, diagnostics, externals);
            }
            _ => {}
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn patch_label(
    addr: u32,
    name: &str,
    symbols: &SymbolTable,
    image: &mut MemoryImage,
    line_number: usize,
    diagnostics: &mut DiagnosticList,
    externals: &mut Vec<ExternReference>,
) {
    let Some(symbol) = symbols.get(name) else {
        diagnostics.push(Diagnostic::new(
            line_number,
            0..0,
            DiagnosticCode::UndefinedLabel(name.to_string()),
        ));
        return;
    };
    if symbol.kind == SymbolKind::Extern {
        externals.push(ExternReference {
            name: name.to_string(),
            address: addr,
        });
    }
    let payload = encoder::patch_label_word(symbol);
    if let Some(word) = image.instruction_word_at_mut(addr) {
        word.payload = payload;
    }
}

#[allow(clippy::too_many_arguments)]
fn patch_index(
    addr: u32,
    name: &str,
    symbols: &SymbolTable,
    image: &mut MemoryImage,
    line_number: usize,
    diagnostics: &mut DiagnosticList,
    externals: &mut Vec<ExternReference>,
) {
    let Some(symbol) = symbols.get(name) else {
        diagnostics.push(Diagnostic::new(
            line_number,
            0..0,
            DiagnosticCode::UndefinedLabel(name.to_string()),
        ));
        return;
    };
    if symbol.kind == SymbolKind::Extern {
        externals.push(ExternReference {
            name: name.to_string(),
            address: addr,
        });
    }
    if let Some(word) = image.instruction_word_at_mut(addr) {
        word.payload = encoder::patch_index_word(word.payload, symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::first_pass;
    use crate::assembler::memory_image::INSTRUCTION_ORIGIN;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn label_operand_is_patched_to_relocatable_address() {
        let src = lines("mov r1, LEN\nLEN: .data 7");
        let mut first = first_pass::run(&src);
        assert!(!first.diagnostics.has_blocking());

        let second = run(&src, &first.symbols, &mut first.image);
        assert!(second.diagnostics.is_empty());
        assert!(second.externals.is_empty());

        let patched = first
            .image
            .instruction_word_at_mut(INSTRUCTION_ORIGIN + 1)
            .unwrap();
        assert_eq!(patched.payload & 0b11, crate::assembler::memory_image::Are::Relocatable.bits());
    }

    #[test]
    fn undefined_label_operand_is_reported() {
        let src = lines("mov r1, MISSING");
        let mut first = first_pass::run(&src);
        assert!(!first.diagnostics.has_blocking());

        let second = run(&src, &first.symbols, &mut first.image);
        assert!(!second.diagnostics.is_empty());
    }

    #[test]
    fn extern_reference_site_is_recorded() {
        let src = lines(".extern FUNC\njsr FUNC");
        let mut first = first_pass::run(&src);
        assert!(!first.diagnostics.has_blocking());

        let second = run(&src, &first.symbols, &mut first.image);
        assert_eq!(second.externals.len(), 1);
        assert_eq!(second.externals[0].name, "FUNC");
        assert_eq!(second.externals[0].address, INSTRUCTION_ORIGIN + 1);
    }
}
