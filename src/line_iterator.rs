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

//! A cursor over a single source line. Borrows the line for its whole
//! lifetime rather than copying it; only `next_word` allocates, and only
//! the word it returns.

/// Cursor into one line of source text. `text` is never mutated; `current`
/// only ever moves forward except for the single-word `unget_word` rewind.
pub struct LineIterator<'a> {
    text: &'a str,
    current: usize,
}

impl<'a> LineIterator<'a> {
    pub fn new(text: &'a str) -> Self {
        LineIterator { text, current: 0 }
    }

    /// Rebinds the iterator to a fresh line, resetting the cursor to the start.
    pub fn put_line(&mut self, text: &'a str) {
        self.text = text;
        self.current = 0;
    }

    pub fn peek(&self) -> Option<char> {
        self.text[self.current..].chars().next()
    }

    pub fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.current += c.len_utf8();
        }
    }

    pub fn is_end(&self) -> bool {
        self.current >= self.text.len()
    }

    /// Advances past spaces and tabs.
    pub fn consume_blanks(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.advance();
        }
    }

    /// Advances `current` to the position immediately after the first
    /// occurrence of `target`. No-op if `target` does not appear in the
    /// remainder of the line.
    pub fn jump_to(&mut self, target: char) {
        if let Some(offset) = self.text[self.current..].find(target) {
            self.current += offset + target.len_utf8();
        }
    }

    /// Returns a freshly-owned copy of the characters from `current` up to
    /// (but not including) the next character in `separators`, or the end of
    /// the line. Advances `current` past the separator, if one was found.
    /// Returns an empty string when already at the end of the line.
    pub fn next_word(&mut self, separators: &[char]) -> String {
        let start = self.current;
        while let Some(c) = self.peek() {
            if separators.contains(&c) {
                break;
            }
            self.advance();
        }
        let word = self.text[start..self.current].to_string();
        if let Some(c) = self.peek() {
            if separators.contains(&c) {
                self.advance();
            }
        }
        word
    }

    /// Rewinds `current` by the byte length of `word`. Callers must pass the
    /// same word they just received from `next_word`; the iterator does not
    /// verify this.
    pub fn unget_word(&mut self, word: &str) {
        self.current = self.current.saturating_sub(word.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_word_splits_on_separators() {
        let mut it = LineIterator::new("mov r1, r2");
        assert_eq!(it.next_word(&[' ', ',']), "mov");
        it.consume_blanks();
        assert_eq!(it.next_word(&[' ', ',']), "r1");
        it.consume_blanks();
        assert_eq!(it.next_word(&[' ', ',']), "r2");
        assert!(it.is_end());
    }

    #[test]
    fn unget_word_rewinds_exactly_one_token() {
        let mut it = LineIterator::new("LEN: .data 1");
        let label = it.next_word(&[':']);
        assert_eq!(label, "LEN");
        it.unget_word(&label);
        assert_eq!(it.next_word(&[':']), "LEN");
    }

    #[test]
    fn jump_to_is_noop_when_absent() {
        let mut it = LineIterator::new("no quote here");
        it.jump_to('"');
        assert_eq!(it.peek(), Some('n'));
    }

    #[test]
    fn next_word_at_end_returns_empty() {
        let mut it = LineIterator::new("x");
        let _ = it.next_word(&[' ']);
        assert_eq!(it.next_word(&[' ']), "");
    }
}
