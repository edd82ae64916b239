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

//! Turns parsed operands into the word sequence appended to the
//! instruction image, and the raw `.data`/`.string` values into the word
//! sequence appended to the data image.

pub mod constants;
pub mod operand;

use crate::assembler::memory_image::{Are, MemoryWord};
use crate::classifiers::{Opcode, SyntaxGroup};
use constants::*;
use operand::{encode_operand_word, nibble_for, OperandWord};

/// Re-exported so callers only need `crate::assembler::encoder::*` to
/// reach the operand vocabulary and the pass-two patch helpers.
pub use operand::{
    are_for_symbol, parse_operand, patch_index_word, patch_label_word, Operand, OperandWord,
};

/// Builds the operand-word sequence for `group` from the already-parsed
/// operand list. The operand count per group was validated earlier by the
/// first pass's per-state handler; this panics on a mismatched count,
/// which would indicate a bug in that validation rather than bad input.
/// Shared between both passes: pass one emits these words, pass two
/// rebuilds the same list from the same source line to find which word
/// to patch, per spec.md's "without re-parsing operands" span shortcut
/// applying only to the instruction-counter walk, not to locating labels.
fn operand_words_for(group: SyntaxGroup, operands: &[Operand]) -> Vec<OperandWord> {
    match group {
        SyntaxGroup::Group1 | SyntaxGroup::Group2 | SyntaxGroup::Group7 => {
            operand::two_operand_words(operands[0].clone(), operands[1].clone())
        }
        SyntaxGroup::Group3 | SyntaxGroup::Group6 => {
            operand::one_operand_words(operands[0].clone())
        }
        SyntaxGroup::Group4 => Vec::new(),
        SyntaxGroup::Group5 => {
            operand::group5_words(operands[0].clone(), operands[1..].to_vec())
        }
    }
}

/// The first word's dest/src nibble pair for `group`, given the operand
/// list in the same order the one-word-per-operand table describes them.
/// Groups with fewer than two operands leave the unused nibble at zero.
fn first_word_nibbles(group: SyntaxGroup, operands: &[Operand]) -> (u16, u16) {
    match group {
        SyntaxGroup::Group1 | SyntaxGroup::Group2 | SyntaxGroup::Group7 => {
            (nibble_for(&operands[1]), nibble_for(&operands[0]))
        }
        SyntaxGroup::Group3 | SyntaxGroup::Group6 => (nibble_for(&operands[0]), 0),
        SyntaxGroup::Group4 => (0, 0),
        SyntaxGroup::Group5 => (nibble_for(&operands[0]), 0),
    }
}

/// The total word count (first word plus operands) for `group` given a
/// concrete operand list: exact even for the register-register collapse,
/// since that depends on the operand values, not the group alone.
pub fn span_for(group: SyntaxGroup, operands: &[Operand]) -> u32 {
    1 + operand_words_for(group, operands).len() as u32
}

/// Encodes a full instruction (first word plus operand words) for the
/// given opcode, syntax group, and already-parsed operand list.
pub fn encode_instruction(
    opcode: Opcode,
    group: SyntaxGroup,
    operands: Vec<Operand>,
) -> Vec<MemoryWord> {
    let (dest_nibble, src_nibble) = first_word_nibbles(group, &operands);
    let group_specific = match group {
        SyntaxGroup::Group5 => (operands.len().saturating_sub(1)).min(3) as u16,
        _ => 0,
    };
    let words = operand_words_for(group, &operands);

    let first_payload = (Are::Absolute.bits() << ARE_SHIFT)
        | ((dest_nibble & NIBBLE_MASK) << DEST_NIBBLE_SHIFT)
        | ((src_nibble & NIBBLE_MASK) << SRC_NIBBLE_SHIFT)
        | (((opcode.code() as u16) & OPCODE_MASK) << OPCODE_SHIFT)
        | (group_specific << 12);

    let span = 1 + words.len() as u8;
    let mut out = vec![MemoryWord::with_span(first_payload, span)];
    out.extend(words.iter().map(encode_operand_word));
    out
}

/// The operand words in emission order, for the second pass to locate
/// which image addresses need patching for a given set of operands.
pub fn operand_word_kinds(group: SyntaxGroup, operands: &[Operand]) -> Vec<OperandWord> {
    operand_words_for(group, operands)
}

/// Sign-extends each `.data` value into its own full 14-bit word.
pub fn encode_data(values: &[i16]) -> Vec<MemoryWord> {
    values
        .iter()
        .map(|&v| MemoryWord::new((v as i32 as u32 & 0x3FFF) as u16))
        .collect()
}

/// Encodes a `.string` literal: one word per byte followed by a
/// terminating zero word.
pub fn encode_string(text: &str) -> Vec<MemoryWord> {
    let mut words: Vec<MemoryWord> = text.bytes().map(|b| MemoryWord::new(b as u16)).collect();
    words.push(MemoryWord::new(0));
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::Register;

    #[test]
    fn register_register_mov_is_two_words() {
        let words = encode_instruction(
            Opcode::Mov,
            SyntaxGroup::Group1,
            vec![
                Operand::Register(Register::R1),
                Operand::Register(Register::R2),
            ],
        );
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].span, 2);
    }

    #[test]
    fn register_label_mov_is_three_words() {
        let words = encode_instruction(
            Opcode::Mov,
            SyntaxGroup::Group1,
            vec![Operand::Register(Register::R1), Operand::Label("LEN".into())],
        );
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].span, 3);
    }

    #[test]
    fn zero_operand_instruction_is_one_word() {
        let words = encode_instruction(Opcode::Stop, SyntaxGroup::Group4, vec![]);
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn group5_span_counts_target_and_params() {
        let words = encode_instruction(
            Opcode::Jsr,
            SyntaxGroup::Group5,
            vec![
                Operand::Label("F".into()),
                Operand::Immediate(1),
                Operand::Immediate(2),
            ],
        );
        assert_eq!(words.len(), 4);
    }

    #[test]
    fn span_for_matches_encode_instruction_word_count() {
        let operands = vec![Operand::Register(Register::R1), Operand::Label("LEN".into())];
        let span = span_for(SyntaxGroup::Group1, &operands);
        let words = encode_instruction(Opcode::Mov, SyntaxGroup::Group1, operands);
        assert_eq!(span as usize, words.len());
    }

    #[test]
    fn data_values_round_trip_sign_extension() {
        let words = encode_data(&[7, -1, 0]);
        assert_eq!(words[0].payload, 7);
        assert_eq!(words[1].payload, 0x3FFF);
        assert_eq!(words[2].payload, 0);
    }

    #[test]
    fn string_encoding_appends_terminator() {
        let words = encode_string("ab");
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].payload, b'a' as u16);
        assert_eq!(words[1].payload, b'b' as u16);
        assert_eq!(words[2].payload, 0);
    }
}
