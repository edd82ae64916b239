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

//! Ties the two passes together and writes the three output files once
//! a source assembles clean. A source with any blocking diagnostic
//! still runs both passes to completion (pass two is harmless against
//! an unsealed-but-complete symbol table either way) but never reaches
//! the file-writing step.

pub mod encoder;
pub mod first_pass;
pub mod line_scan;
pub mod memory_image;
pub mod second_pass;
pub mod symbol_table;

use crate::diagnostics::DiagnosticList;
use crate::errors::AssemblerError;
use crate::file_reader::OutputSink;
use memory_image::{MemoryImage, INSTRUCTION_ORIGIN};
use second_pass::ExternReference;
use std::path::Path;
use symbol_table::{SymbolKind, SymbolTable};

pub struct AssembleResult {
    pub diagnostics: DiagnosticList,
    /// Whether the three output files were written. `false` whenever
    /// any blocking diagnostic was raised in either pass.
    pub succeeded: bool,
}

/// Runs both passes over `source` and, if nothing blocking turned up,
/// writes `<basename>.object`, `<basename>.external`, and
/// `<basename>.entry` through `sink`.
pub fn assemble_source<O: OutputSink>(
    basename: &str,
    source: &str,
    sink: &mut O,
) -> Result<AssembleResult, AssemblerError> {
    let lines: Vec<String> = source.lines().map(str::to_string).collect();

    let mut first = first_pass::run(&lines);
    let second = second_pass::run(&lines, &first.symbols, &mut first.image);

    let mut diagnostics = first.diagnostics;
    diagnostics.extend(second.diagnostics);

    let succeeded = !diagnostics.has_blocking();
    if succeeded {
        write_object_file(basename, &first.image, sink)?;
        write_externals_file(basename, &second.externals, sink)?;
        write_entries_file(basename, &first.symbols, sink)?;
    }

    Ok(AssembleResult {
        diagnostics,
        succeeded,
    })
}

fn write_object_file<O: OutputSink>(
    basename: &str,
    image: &MemoryImage,
    sink: &mut O,
) -> Result<(), AssemblerError> {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>9}\t{:<9}\n",
        image.data_words.len(),
        image.instruction_words.len()
    ));

    let mut addr = INSTRUCTION_ORIGIN;
    for word in &image.instruction_words {
        out.push_str(&format!("{addr:04}\t{}\n", word.to_visual()));
        addr += 1;
    }

    let mut addr = image.data_base();
    for word in &image.data_words {
        out.push_str(&format!("{addr:04}\t{}\n", word.to_visual()));
        addr += 1;
    }

    write_file(sink, &format!("{basename}.object"), &out)
}

fn write_externals_file<O: OutputSink>(
    basename: &str,
    externals: &[ExternReference],
    sink: &mut O,
) -> Result<(), AssemblerError> {
    let mut out = String::new();
    for reference in externals {
        out.push_str(&format!("{}\t{}\n", reference.name, reference.address));
    }
    write_file(sink, &format!("{basename}.external"), &out)
}

fn write_entries_file<O: OutputSink>(
    basename: &str,
    symbols: &SymbolTable,
    sink: &mut O,
) -> Result<(), AssemblerError> {
    let mut out = String::new();
    for symbol in symbols.iter_kind(SymbolKind::Entry) {
        out.push_str(&format!("{}\t{}\n", symbol.name, symbol.address));
    }
    write_file(sink, &format!("{basename}.entry"), &out)
}

fn write_file<O: OutputSink>(sink: &mut O, path: &str, content: &str) -> Result<(), AssemblerError> {
    sink.write(Path::new(path), content)
        .map_err(|source| AssemblerError::OutputUnwritable {
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_reader::MockOutputSink;

    #[test]
    fn clean_source_writes_all_three_files() {
        let mut sink = MockOutputSink::default();
        let result = assemble_source(
            "prog",
            "MAIN: mov r1, r2\n.entry MAIN\nstop",
            &mut sink,
        )
        .unwrap();
        assert!(result.succeeded);
        assert!(sink.files.contains_key(Path::new("prog.object")));
        assert!(sink.files.contains_key(Path::new("prog.external")));
        assert!(sink.files.contains_key(Path::new("prog.entry")));

        let entries = &sink.files[Path::new("prog.entry")];
        assert!(entries.contains("MAIN"));
    }

    #[test]
    fn source_with_blocking_diagnostic_writes_nothing() {
        let mut sink = MockOutputSink::default();
        let result = assemble_source("prog", "mov r1, r2, r3", &mut sink).unwrap();
        assert!(!result.succeeded);
        assert!(sink.files.is_empty());
    }

    #[test]
    fn externals_file_lists_reference_site_address() {
        let mut sink = MockOutputSink::default();
        let result = assemble_source(
            "prog",
            ".extern FUNC\nmov r1, FUNC\nstop",
            &mut sink,
        )
        .unwrap();
        assert!(result.succeeded);
        let externals = &sink.files[Path::new("prog.external")];
        assert!(externals.contains("FUNC"));
        assert!(externals.contains("FUNC\t102"));
    }
}
