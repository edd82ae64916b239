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

pub mod assembler;
pub mod classifiers;
pub mod diagnostics;
pub mod errors;
pub mod file_reader;
pub mod line_iterator;

use std::path::Path;

use assembler::AssembleResult;
use errors::AssemblerError;
use file_reader::{FileReader, OutputSink};

/// Reads `<basename>.as` through `reader`, assembles it, and — if it
/// assembled clean — writes `<basename>.object`, `<basename>.external`,
/// and `<basename>.entry` through `sink`.
pub fn assemble_file<F: FileReader, O: OutputSink>(
    basename: &str,
    reader: &F,
    sink: &mut O,
) -> Result<AssembleResult, AssemblerError> {
    let source_path = format!("{basename}.as");
    let source = reader
        .read_to_string(Path::new(&source_path))
        .map_err(|source| AssemblerError::SourceUnreadable {
            path: source_path,
            source,
        })?;

    assembler::assemble_source(basename, &source, sink)
}
