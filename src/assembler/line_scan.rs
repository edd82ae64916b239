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

//! Line-shape scanning shared by both passes: splitting off a leading
//! label, reading comma-separated operand lists, and the two directive
//! payload shapes (`.data`'s integer list, `.string`'s quoted text).
//! Neither pass needs more than this from the line iterator directly;
//! everything else is classification over the tokens these return.

use crate::line_iterator::LineIterator;

pub struct SplitLine {
    pub label: Option<String>,
    pub keyword: String,
}

/// Positions `iter` just past the keyword (directive or mnemonic) and
/// reports whether a `label:` prefix preceded it. A label is only
/// recognized when the colon is attached to the identifier with no
/// intervening space, per spec.md's `next_word`-based tokenization.
pub fn split_label<'a>(text: &'a str) -> (LineIterator<'a>, SplitLine) {
    let mut iter = LineIterator::new(text);
    iter.consume_blanks();
    let first = iter.next_word(&[' ', '\t']);
    if let Some(candidate) = first.strip_suffix(':') {
        iter.consume_blanks();
        let keyword = iter.next_word(&[' ', '\t']);
        (
            iter,
            SplitLine {
                label: Some(candidate.to_string()),
                keyword,
            },
        )
    } else {
        (
            iter,
            SplitLine {
                label: None,
                keyword: first,
            },
        )
    }
}

/// Reads the rest of the line as a comma-separated token list, trimming
/// whitespace around each token and dropping empty ones. Used for
/// `.data` integer lists and ordinary instruction operand lists.
pub fn parse_operand_tokens(iter: &mut LineIterator) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    loop {
        match iter.peek() {
            None => {
                push_trimmed(&mut tokens, &current);
                break;
            }
            Some(',') => {
                iter.advance();
                push_trimmed(&mut tokens, &current);
                current.clear();
            }
            Some(c) => {
                current.push(c);
                iter.advance();
            }
        }
    }
    tokens
}

fn push_trimmed(tokens: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
}

/// Parses a group 5 operand: a target label optionally followed by a
/// parenthesized, comma-separated parameter list.
pub fn parse_group5_operand(iter: &mut LineIterator) -> (String, Vec<String>) {
    iter.consume_blanks();
    let mut label = String::new();
    while let Some(c) = iter.peek() {
        if c == '(' || c == ' ' || c == '\t' {
            break;
        }
        label.push(c);
        iter.advance();
    }
    iter.consume_blanks();

    let mut params = Vec::new();
    if iter.peek() == Some('(') {
        iter.advance();
        let mut current = String::new();
        loop {
            match iter.peek() {
                None => break,
                Some(')') => {
                    iter.advance();
                    push_trimmed(&mut params, &current);
                    break;
                }
                Some(',') => {
                    iter.advance();
                    push_trimmed(&mut params, &current);
                    current.clear();
                }
                Some(c) => {
                    current.push(c);
                    iter.advance();
                }
            }
        }
    }
    (label, params)
}

/// Parses a `.string` directive's quoted payload. Returns `None` if the
/// line doesn't start with `"` after blanks, or the quote is unterminated.
pub fn parse_string_literal(iter: &mut LineIterator) -> Option<String> {
    iter.consume_blanks();
    if iter.peek() != Some('"') {
        return None;
    }
    iter.advance();
    let mut text = String::new();
    loop {
        match iter.peek() {
            None => return None,
            Some('"') => {
                iter.advance();
                return Some(text);
            }
            Some(c) => {
                text.push(c);
                iter.advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_label_requires_attached_colon() {
        let (_, split) = split_label("MAIN: mov r1, r2");
        assert_eq!(split.label.as_deref(), Some("MAIN"));
        assert_eq!(split.keyword, "mov");

        let (_, split) = split_label("mov r1, r2");
        assert_eq!(split.label, None);
        assert_eq!(split.keyword, "mov");
    }

    #[test]
    fn group5_operand_splits_label_and_params() {
        let (_, split) = split_label("jsr F(1, 2)");
        let mut iter = LineIterator::new("F(1, 2)");
        let _ = &split;
        let (label, params) = parse_group5_operand(&mut iter);
        assert_eq!(label, "F");
        assert_eq!(params, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn group5_operand_without_params() {
        let mut iter = LineIterator::new("START");
        let (label, params) = parse_group5_operand(&mut iter);
        assert_eq!(label, "START");
        assert!(params.is_empty());
    }

    #[test]
    fn string_literal_round_trips() {
        let mut iter = LineIterator::new("\"ab\"");
        assert_eq!(parse_string_literal(&mut iter), Some("ab".to_string()));
    }
}
