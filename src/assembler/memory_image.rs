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

//! Two append-only arrays of 14-bit machine words with independent
//! counters: the instruction image and the data image. Both persist
//! across passes; only the instruction counter is reset between them.

/// Origin of the instruction counter, per the dialect's convention.
pub const INSTRUCTION_ORIGIN: u32 = 100;

/// Absolute / Relocatable / External, the two-bit field every word's
/// low bits carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Are {
    Absolute,
    Relocatable,
    External,
}

impl Are {
    pub fn bits(self) -> u16 {
        match self {
            Are::Absolute => 0b00,
            Are::Relocatable => 0b01,
            Are::External => 0b10,
        }
    }
}

/// A single 14-bit payload word. `span` is only meaningful on the first
/// word of an instruction: the total number of words (including itself)
/// that instruction occupies, letting the second pass skip ahead without
/// recomputing it from the syntax group a second time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryWord {
    pub payload: u16,
    pub span: u8,
}

impl MemoryWord {
    pub fn new(payload: u16) -> Self {
        MemoryWord { payload, span: 1 }
    }

    pub fn with_span(payload: u16, span: u8) -> Self {
        MemoryWord { payload, span }
    }

    /// Most-significant-bit-first visual rendering used by the object
    /// file: `/` for a set bit, `.` for a clear bit, 14 characters wide.
    pub fn to_visual(self) -> String {
        (0..14)
            .rev()
            .map(|bit| if self.payload & (1 << bit) != 0 { '/' } else { '.' })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryImage {
    pub instruction_words: Vec<MemoryWord>,
    pub data_words: Vec<MemoryWord>,
    ic: u32,
    dc: u32,
}

impl MemoryImage {
    pub fn new() -> Self {
        MemoryImage {
            instruction_words: Vec::new(),
            data_words: Vec::new(),
            ic: INSTRUCTION_ORIGIN,
            dc: 0,
        }
    }

    pub fn instruction_counter(&self) -> u32 {
        self.ic
    }

    pub fn data_counter(&self) -> u32 {
        self.dc
    }

    /// Resets the instruction counter to its origin without touching the
    /// accumulated words, for the start of pass two.
    pub fn reset_instruction_counter(&mut self) {
        self.ic = INSTRUCTION_ORIGIN;
    }

    pub fn push_instruction_word(&mut self, word: MemoryWord) -> u32 {
        let addr = self.ic;
        self.instruction_words.push(word);
        self.ic += 1;
        addr
    }

    pub fn push_data_word(&mut self, word: MemoryWord) -> u32 {
        let addr = self.dc;
        self.data_words.push(word);
        self.dc += 1;
        addr
    }

    /// Advances the instruction counter by `span` words without touching
    /// the vector; used by the second pass, which only patches words
    /// already written in pass one.
    pub fn advance_instruction_counter(&mut self, span: u32) {
        self.ic += span;
    }

    /// The final instruction-image counter, i.e. its length after pass one:
    /// the base that data-image addresses are offset from in the object
    /// file.
    pub fn data_base(&self) -> u32 {
        INSTRUCTION_ORIGIN + self.instruction_words.len() as u32
    }

    pub fn instruction_word_at_mut(&mut self, addr: u32) -> Option<&mut MemoryWord> {
        let idx = addr.checked_sub(INSTRUCTION_ORIGIN)? as usize;
        self.instruction_words.get_mut(idx)
    }
}
