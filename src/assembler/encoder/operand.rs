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

//! Parsed operand values and the logic that turns them into operand
//! words. Both passes call [`parse_operand`] on the same raw token: pass
//! one to build the placeholder word, pass two to rediscover which word
//! needs patching and with what label.

use super::constants::*;
use crate::assembler::memory_image::{Are, MemoryWord};
use crate::assembler::symbol_table::{Symbol, SymbolKind};
use crate::classifiers::{get_operand_kind, is_register_name, OperandKind, Register};
use crate::diagnostics::DiagnosticCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Immediate(i16),
    Label(String),
    Index(String, Register),
    Register(Register),
}

/// Parses an already-tokenized operand. Validates the payload shape (e.g.
/// that an immediate is a well-formed signed integer) but never resolves
/// a label against the symbol table; that is each pass's own job.
pub fn parse_operand(token: &str) -> Result<Operand, DiagnosticCode> {
    match get_operand_kind(token) {
        Some(OperandKind::Register) => {
            Ok(Operand::Register(is_register_name(token).expect("register kind")))
        }
        Some(OperandKind::Immediate) => {
            let digits = &token[1..];
            match digits.parse::<i16>() {
                Ok(v) if (IMMEDIATE_MIN..=IMMEDIATE_MAX).contains(&v) => Ok(Operand::Immediate(v)),
                _ => Err(DiagnosticCode::ImmediateOutOfRange(token.to_string())),
            }
        }
        Some(OperandKind::Index) => {
            let open = token.find('[').expect("index shape already matched");
            let label = &token[..open];
            let reg_token = &token[open + 1..token.len() - 1];
            let reg = is_register_name(reg_token)
                .ok_or_else(|| DiagnosticCode::UnknownOperand(token.to_string()))?;
            Ok(Operand::Index(label.to_string(), reg))
        }
        Some(OperandKind::Label) => Ok(Operand::Label(token.to_string())),
        None => Err(DiagnosticCode::UnknownOperand(token.to_string())),
    }
}

pub fn operand_kind_bits(operand: &Operand) -> u16 {
    match operand {
        Operand::Immediate(_) => 0,
        Operand::Label(_) => 1,
        Operand::Index(_, _) => 2,
        Operand::Register(_) => 3,
    }
}

/// The 3-bit nibble written into the first word for this operand: the
/// register number when the operand addresses a register directly,
/// otherwise the 2-bit addressing mode.
pub fn nibble_for(operand: &Operand) -> u16 {
    match operand {
        Operand::Register(r) => r.index() as u16,
        other => operand_kind_bits(other),
    }
}

/// One operand word still awaiting emission (pass one) or patching
/// (pass two).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandWord {
    /// Both operands of a two-operand instruction address registers;
    /// they share a single word instead of one each.
    SharedRegisters { src: Register, dst: Register },
    /// Any other operand, in the source-then-destination order it was
    /// parsed in.
    Value(Operand),
}

/// Builds the operand-word sequence for a two-operand instruction
/// (groups 1, 2, 7), applying the register-register collapse rule.
pub fn two_operand_words(src: Operand, dst: Operand) -> Vec<OperandWord> {
    match (&src, &dst) {
        (Operand::Register(rs), Operand::Register(rd)) => {
            vec![OperandWord::SharedRegisters {
                src: *rs,
                dst: *rd,
            }]
        }
        _ => vec![OperandWord::Value(src), OperandWord::Value(dst)],
    }
}

/// Builds the operand-word sequence for a one-operand instruction
/// (groups 3, 6): always exactly one word, even when it addresses a
/// register.
pub fn one_operand_words(operand: Operand) -> Vec<OperandWord> {
    vec![OperandWord::Value(operand)]
}

/// Builds the operand-word sequence for a group 5 instruction (jmp, bne,
/// jsr): the target label followed by zero or more parameter words.
pub fn group5_words(target: Operand, params: Vec<Operand>) -> Vec<OperandWord> {
    let mut words = vec![OperandWord::Value(target)];
    words.extend(params.into_iter().map(OperandWord::Value));
    words
}

/// Encodes a placeholder or concrete operand word for pass one. Label and
/// index operands are written with address zero and ARE = Absolute; pass
/// two overwrites them once the symbol table is complete.
pub fn encode_operand_word(word: &OperandWord) -> MemoryWord {
    match word {
        OperandWord::SharedRegisters { src, dst } => {
            let payload = (Are::Absolute.bits() << ARE_SHIFT)
                | ((src.index() as u16) << SHARED_SRC_SHIFT)
                | ((dst.index() as u16) << SHARED_DST_SHIFT);
            MemoryWord::new(payload)
        }
        OperandWord::Value(Operand::Immediate(value)) => {
            MemoryWord::new(value_payload(Are::Absolute, *value as i32))
        }
        OperandWord::Value(Operand::Register(reg)) => {
            let payload =
                (Are::Absolute.bits() << ARE_SHIFT) | ((reg.index() as u16) << STANDALONE_REG_SHIFT);
            MemoryWord::new(payload)
        }
        OperandWord::Value(Operand::Label(_)) => {
            MemoryWord::new(Are::Absolute.bits() << ARE_SHIFT)
        }
        OperandWord::Value(Operand::Index(_, reg)) => {
            let payload =
                (Are::Absolute.bits() << ARE_SHIFT) | ((reg.index() as u16) << INDEX_REG_SHIFT);
            MemoryWord::new(payload)
        }
    }
}

fn value_payload(are: Are, value: i32) -> u16 {
    let bits = (value as u32) & VALUE_MASK;
    (are.bits() << ARE_SHIFT) | ((bits as u16) << VALUE_SHIFT)
}

/// The symbol's resolved ARE: Relocatable for an internal definition,
/// External for one declared via `.extern`.
pub fn are_for_symbol(symbol: &Symbol) -> Are {
    match symbol.kind {
        SymbolKind::Extern => Are::External,
        _ => Are::Relocatable,
    }
}

/// Patches a placeholder label word in place with the symbol's resolved
/// address and ARE field.
pub fn patch_label_word(symbol: &Symbol) -> u16 {
    value_payload(are_for_symbol(symbol), symbol.address as i32)
}

/// Patches a placeholder index word in place: the register nibble is
/// already correct from pass one, only the address field and ARE change.
pub fn patch_index_word(existing_payload: u16, symbol: &Symbol) -> u16 {
    let reg_bits = existing_payload & (NIBBLE_MASK << INDEX_REG_SHIFT);
    let are = are_for_symbol(symbol).bits() << ARE_SHIFT;
    let addr_bits = ((symbol.address as u32) & INDEX_ADDR_MASK) as u16;
    are | reg_bits | (addr_bits << INDEX_ADDR_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_register_collapses_to_one_word() {
        let words = two_operand_words(
            Operand::Register(Register::R1),
            Operand::Register(Register::R2),
        );
        assert_eq!(words.len(), 1);
        let word = encode_operand_word(&words[0]);
        assert_eq!((word.payload >> SHARED_SRC_SHIFT) & NIBBLE_MASK, 1);
        assert_eq!((word.payload >> SHARED_DST_SHIFT) & NIBBLE_MASK, 2);
    }

    #[test]
    fn mixed_two_operand_emits_two_words() {
        let words = two_operand_words(
            Operand::Register(Register::R1),
            Operand::Label("LEN".into()),
        );
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn parse_operand_rejects_malformed_immediate() {
        assert!(parse_operand("#").is_err());
        assert!(parse_operand("#-7").is_ok());
    }

    #[test]
    fn parse_operand_rejects_immediate_outside_12_bit_range() {
        assert!(parse_operand("#2047").is_ok());
        assert!(parse_operand("#-2048").is_ok());
        assert!(parse_operand("#2048").is_err());
        assert!(parse_operand("#-2049").is_err());
        assert!(parse_operand("#5000").is_err());
    }

    #[test]
    fn patch_label_word_sets_relocatable_are_for_internal_symbol() {
        let symbol = Symbol {
            name: "L".into(),
            kind: SymbolKind::Code,
            address: 105,
        };
        let payload = patch_label_word(&symbol);
        assert_eq!(payload & 0b11, Are::Relocatable.bits());
        assert_eq!((payload >> VALUE_SHIFT) & (VALUE_MASK as u16), 105);
    }
}
