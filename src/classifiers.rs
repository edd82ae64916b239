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

//! Pure predicates and extractors over already-tokenized words: no
//! scanning, no allocation beyond what the caller already holds.

pub const LABEL_MAX_LEN: usize = 31;

/// The sixteen mnemonics of the dialect's fixed opcode set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Opcode {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Red,
    Prn,
    Jsr,
    Rts,
    Stop,
}

impl Opcode {
    /// The 4-bit code written into bits 8-11 of an instruction's first word.
    pub fn code(self) -> u8 {
        match self {
            Opcode::Mov => 0,
            Opcode::Cmp => 1,
            Opcode::Add => 2,
            Opcode::Sub => 3,
            Opcode::Lea => 4,
            Opcode::Clr => 5,
            Opcode::Not => 6,
            Opcode::Inc => 7,
            Opcode::Dec => 8,
            Opcode::Jmp => 9,
            Opcode::Bne => 10,
            Opcode::Red => 11,
            Opcode::Prn => 12,
            Opcode::Jsr => 13,
            Opcode::Rts => 14,
            Opcode::Stop => 15,
        }
    }

    pub fn syntax_group(self) -> SyntaxGroup {
        match self {
            Opcode::Mov | Opcode::Add | Opcode::Sub => SyntaxGroup::Group1,
            Opcode::Cmp => SyntaxGroup::Group2,
            Opcode::Clr | Opcode::Not | Opcode::Inc | Opcode::Dec | Opcode::Red => {
                SyntaxGroup::Group3
            }
            Opcode::Rts | Opcode::Stop => SyntaxGroup::Group4,
            Opcode::Jmp | Opcode::Bne | Opcode::Jsr => SyntaxGroup::Group5,
            Opcode::Prn => SyntaxGroup::Group6,
            Opcode::Lea => SyntaxGroup::Group7,
        }
    }
}

/// Coarse classification of opcodes by operand arity, used to compute an
/// instruction's encoded span without re-deriving it from scratch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyntaxGroup {
    /// Two operands, destination may not be immediate (mov, add, sub).
    Group1,
    /// Two operands, either may be immediate (cmp).
    Group2,
    /// One operand, may not be immediate (clr, not, inc, dec, red).
    Group3,
    /// No operands (rts, stop).
    Group4,
    /// Variable operand count: a label plus an optional parenthesized
    /// parameter list (jmp, bne, jsr).
    Group5,
    /// One operand, any addressing mode including immediate (prn).
    Group6,
    /// Two operands with restricted addressing modes (lea).
    Group7,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Register {
    pub fn index(self) -> u8 {
        match self {
            Register::R0 => 0,
            Register::R1 => 1,
            Register::R2 => 2,
            Register::R3 => 3,
            Register::R4 => 4,
            Register::R5 => 5,
            Register::R6 => 6,
            Register::R7 => 7,
        }
    }
}

/// The coarse shape of an operand token, independent of its concrete value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperandKind {
    Immediate,
    Label,
    Index,
    Register,
}

/// Maps a mnemonic or directive keyword to its opcode, or `None` if `word`
/// is not one of the sixteen recognized mnemonics.
pub fn get_opcode(word: &str) -> Option<Opcode> {
    match word {
        "mov" => Some(Opcode::Mov),
        "cmp" => Some(Opcode::Cmp),
        "add" => Some(Opcode::Add),
        "sub" => Some(Opcode::Sub),
        "lea" => Some(Opcode::Lea),
        "clr" => Some(Opcode::Clr),
        "not" => Some(Opcode::Not),
        "inc" => Some(Opcode::Inc),
        "dec" => Some(Opcode::Dec),
        "jmp" => Some(Opcode::Jmp),
        "bne" => Some(Opcode::Bne),
        "red" => Some(Opcode::Red),
        "prn" => Some(Opcode::Prn),
        "jsr" => Some(Opcode::Jsr),
        "rts" => Some(Opcode::Rts),
        "stop" => Some(Opcode::Stop),
        _ => None,
    }
}

pub fn get_syntax_group(opcode: Opcode) -> SyntaxGroup {
    opcode.syntax_group()
}

/// `r0`..`r7`, case sensitive, nothing else.
pub fn is_register_name(word: &str) -> Option<Register> {
    match word {
        "r0" => Some(Register::R0),
        "r1" => Some(Register::R1),
        "r2" => Some(Register::R2),
        "r3" => Some(Register::R3),
        "r4" => Some(Register::R4),
        "r5" => Some(Register::R5),
        "r6" => Some(Register::R6),
        "r7" => Some(Register::R7),
        _ => None,
    }
}

/// `word` begins with a letter, contains only letters and digits, is no
/// longer than [`LABEL_MAX_LEN`], and is neither a mnemonic nor a register
/// name.
pub fn is_valid_label(word: &str) -> bool {
    if word.is_empty() || word.len() > LABEL_MAX_LEN {
        return false;
    }
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    if get_opcode(word).is_some() || is_register_name(word).is_some() {
        return false;
    }
    if word == ".entry" || word == ".extern" || word == ".data" || word == ".string" {
        return false;
    }
    true
}

/// Classifies a raw operand token by its leading character / shape. Does
/// not validate the payload (e.g. that an immediate parses as an integer);
/// callers perform that validation separately once the kind routes them to
/// the right parser.
pub fn get_operand_kind(token: &str) -> Option<OperandKind> {
    if token.is_empty() {
        return None;
    }
    if is_register_name(token).is_some() {
        return Some(OperandKind::Register);
    }
    if let Some(rest) = token.strip_prefix('#') {
        if !rest.is_empty() {
            return Some(OperandKind::Immediate);
        }
        return None;
    }
    if token.contains('[') && token.ends_with(']') {
        return Some(OperandKind::Index);
    }
    if is_valid_label(token) {
        return Some(OperandKind::Label);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_lookup_is_case_sensitive_and_closed() {
        assert_eq!(get_opcode("mov"), Some(Opcode::Mov));
        assert_eq!(get_opcode("MOV"), None);
        assert_eq!(get_opcode("frobnicate"), None);
    }

    #[test]
    fn register_names_are_r0_through_r7_only() {
        assert_eq!(is_register_name("r0"), Some(Register::R0));
        assert_eq!(is_register_name("r7"), Some(Register::R7));
        assert_eq!(is_register_name("r8"), None);
        assert_eq!(is_register_name("R1"), None);
    }

    #[test]
    fn labels_cannot_shadow_mnemonics_or_registers() {
        assert!(is_valid_label("MAIN"));
        assert!(is_valid_label("len2"));
        assert!(!is_valid_label("mov"));
        assert!(!is_valid_label("r3"));
        assert!(!is_valid_label("2fast"));
        assert!(!is_valid_label(""));
    }

    #[test]
    fn operand_kind_dispatches_on_shape() {
        assert_eq!(get_operand_kind("#-1"), Some(OperandKind::Immediate));
        assert_eq!(get_operand_kind("r2"), Some(OperandKind::Register));
        assert_eq!(get_operand_kind("LABEL[r2]"), Some(OperandKind::Index));
        assert_eq!(get_operand_kind("LABEL"), Some(OperandKind::Label));
        assert_eq!(get_operand_kind("#"), None);
    }
}
