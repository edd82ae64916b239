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

//! An insertion-ordered symbol table. Deterministic output of the entries
//! and externals files depends on iteration order matching the order
//! labels first appeared in source, which a `HashMap` cannot guarantee, so
//! this is a plain `Vec` with a linear scan. The table is small in every
//! realistic program; determinism matters more than asymptotic lookup cost.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Code,
    Data,
    Entry,
    Extern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub address: u32,
}

/// What happened when a name was inserted that was already present.
pub enum InsertOutcome {
    /// The name was new; it now names `kind` at `address`.
    Inserted,
    /// Reinsertion was illegal; the table was not modified.
    Redefinition,
}

/// What happened when a `.entry` directive's target was resolved against
/// the table, once pass one has finished and every label is defined.
pub enum EntryOutcome {
    /// The existing CODE/DATA symbol was promoted to ENTRY in place.
    Promoted,
    /// No symbol by that name was ever defined in this pass.
    NotFound,
    /// The symbol exists but may not become an ENTRY (already EXTERN or
    /// already ENTRY).
    Redefinition,
}

/// Ordered sequence of symbols, unique by name. Built during pass one,
/// sealed, and read-only through pass two.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    sealed: bool,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Inserts a brand-new CODE or DATA symbol. Panics if `kind` is
    /// ENTRY/EXTERN; those go through [`SymbolTable::insert_extern`] and
    /// [`SymbolTable::promote_to_entry`] respectively, which carry their
    /// own redefinition rules.
    pub fn define(&mut self, name: &str, kind: SymbolKind, address: u32) -> InsertOutcome {
        debug_assert!(matches!(kind, SymbolKind::Code | SymbolKind::Data));
        if self.position(name).is_some() {
            return InsertOutcome::Redefinition;
        }
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            address,
        });
        InsertOutcome::Inserted
    }

    /// Declares `name` as EXTERN at address 0. A name already in the table
    /// under any kind is a redefinition, since a `.extern` declaration is
    /// only ever the first mention of that name.
    pub fn insert_extern(&mut self, name: &str) -> InsertOutcome {
        if self.position(name).is_some() {
            return InsertOutcome::Redefinition;
        }
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Extern,
            address: 0,
        });
        InsertOutcome::Inserted
    }

    /// Promotes an existing CODE/DATA symbol to ENTRY, as driven by a
    /// `.entry` directive naming it. `.entry` may precede the label's own
    /// definition in source, so callers defer this call to the end of
    /// pass one, once every label has been seen. An EXTERN symbol may not
    /// be promoted; an ENTRY symbol may not be re-promoted — both are
    /// redefinition errors.
    pub fn promote_to_entry(&mut self, name: &str) -> EntryOutcome {
        match self.position(name) {
            None => EntryOutcome::NotFound,
            Some(idx) => match self.symbols[idx].kind {
                SymbolKind::Code | SymbolKind::Data => {
                    self.symbols[idx].kind = SymbolKind::Entry;
                    EntryOutcome::Promoted
                }
                SymbolKind::Entry | SymbolKind::Extern => EntryOutcome::Redefinition,
            },
        }
    }

    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.get(name).map(|s| s.kind)
    }

    /// Rebases every DATA symbol's address by `base`. DATA symbols are
    /// defined during pass one against the bare 0-based data counter,
    /// since the instruction image's final length (the data image's
    /// true base address) isn't known until pass one ends; call this
    /// once, with `MemoryImage::data_base()`, right after the main pass
    /// one loop finishes and before any `.entry` promotion or patching
    /// reads these addresses.
    pub fn relocate_data_symbols(&mut self, base: u32) {
        for symbol in &mut self.symbols {
            if symbol.kind == SymbolKind::Data {
                symbol.address += base;
            }
        }
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// In-order traversal, i.e. insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn iter_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(move |s| s.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_definition_is_redefinition() {
        let mut table = SymbolTable::new();
        assert!(matches!(
            table.define("X", SymbolKind::Data, 100),
            InsertOutcome::Inserted
        ));
        assert!(matches!(
            table.define("X", SymbolKind::Data, 101),
            InsertOutcome::Redefinition
        ));
    }

    #[test]
    fn entry_promotes_code_but_not_extern() {
        let mut table = SymbolTable::new();
        table.define("MAIN", SymbolKind::Code, 100);
        assert!(matches!(
            table.promote_to_entry("MAIN"),
            EntryOutcome::Promoted
        ));
        assert_eq!(table.kind_of("MAIN"), Some(SymbolKind::Entry));

        assert!(matches!(
            table.promote_to_entry("MAIN"),
            EntryOutcome::Redefinition
        ));

        table.insert_extern("EXT");
        assert!(matches!(
            table.promote_to_entry("EXT"),
            EntryOutcome::Redefinition
        ));

        assert!(matches!(
            table.promote_to_entry("NOPE"),
            EntryOutcome::NotFound
        ));
    }

    #[test]
    fn traversal_preserves_insertion_order() {
        let mut table = SymbolTable::new();
        table.define("C", SymbolKind::Code, 100);
        table.define("A", SymbolKind::Data, 103);
        table.define("B", SymbolKind::Code, 101);
        let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn relocate_data_symbols_shifts_data_kind_only() {
        let mut table = SymbolTable::new();
        table.define("CODE_LBL", SymbolKind::Code, 100);
        table.define("LEN", SymbolKind::Data, 0);
        table.define("NUMS", SymbolKind::Data, 1);
        table.relocate_data_symbols(104);
        assert_eq!(table.get("CODE_LBL").unwrap().address, 100);
        assert_eq!(table.get("LEN").unwrap().address, 104);
        assert_eq!(table.get("NUMS").unwrap().address, 105);
    }
}
