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

//! Bit positions for the 14-bit instruction word and its operand words.
//! First word: ARE(0-1), dest nibble(2-4), src nibble(5-7), opcode(8-11),
//! reserved(12-13). Operand words reuse bits 0-1 for ARE and pack the rest
//! depending on operand kind; see `crate::assembler::encoder::operand`.

pub const ARE_SHIFT: u16 = 0;

pub const DEST_NIBBLE_SHIFT: u16 = 2;
pub const SRC_NIBBLE_SHIFT: u16 = 5;
pub const NIBBLE_MASK: u16 = 0b111;

pub const OPCODE_SHIFT: u16 = 8;
pub const OPCODE_MASK: u16 = 0b1111;

/// Plain value word (immediate or resolved label address): 12 bits of
/// payload above the 2-bit ARE field.
pub const VALUE_SHIFT: u16 = 2;
pub const VALUE_MASK: u32 = 0xFFF;

/// Signed range an immediate operand's 12-bit payload can hold.
pub const IMMEDIATE_MIN: i16 = -2048;
pub const IMMEDIATE_MAX: i16 = 2047;

/// Index-mode operand word: a 3-bit register nibble followed by a 9-bit
/// address field.
pub const INDEX_REG_SHIFT: u16 = 2;
pub const INDEX_ADDR_SHIFT: u16 = 5;
pub const INDEX_ADDR_MASK: u32 = 0x1FF;

/// Standalone (non-shared) register operand word: just the register
/// number in the destination nibble position.
pub const STANDALONE_REG_SHIFT: u16 = 2;

/// Shared register-register operand word: source register in the high
/// nibble, destination register in the low nibble, mirroring the first
/// word's own layout.
pub const SHARED_SRC_SHIFT: u16 = SRC_NIBBLE_SHIFT;
pub const SHARED_DST_SHIFT: u16 = DEST_NIBBLE_SHIFT;
