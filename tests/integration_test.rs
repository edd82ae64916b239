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

use std::fs;
use std::path::Path;

use tpasm::assemble_file;
use tpasm::file_reader::{AsmFileReader, FsOutputSink, MockFileReader, MockOutputSink};

fn run(source: &str) -> (tpasm::assembler::AssembleResult, MockOutputSink) {
    let mut reader = MockFileReader::default();
    reader.add_file("prog.as", source);
    let mut sink = MockOutputSink::default();
    let result = assemble_file("prog", &reader, &mut sink).expect("assembly should not I/O-fail");
    (result, sink)
}

#[test]
fn register_register_mov_collapses_to_two_words() {
    let (result, sink) = run("mov r1, r2\nstop\n");
    assert!(result.succeeded);
    let object = &sink.files[Path::new("prog.object")];
    // Header line: 0 data words, 2 instruction words.
    assert!(object.starts_with("        0\t2        \n"));
}

#[test]
fn extern_reference_is_recorded_in_externals_table() {
    let (result, sink) = run(".extern PRINT\njsr PRINT\nstop\n");
    assert!(result.succeeded);
    let externals = &sink.files[Path::new("prog.external")];
    assert!(externals.contains("PRINT"));
    assert_eq!(externals.lines().count(), 1);
}

#[test]
fn entry_forward_reference_promotes_later_label() {
    let (result, sink) = run(".entry MAIN\nMAIN: mov r0, r1\nstop\n");
    assert!(result.succeeded);
    let entries = &sink.files[Path::new("prog.entry")];
    assert!(entries.contains("MAIN\t100"));
}

#[test]
fn entry_for_undefined_label_is_a_blocking_diagnostic() {
    let (result, _sink) = run(".entry GHOST\nstop\n");
    assert!(!result.succeeded);
    assert!(result.diagnostics.has_blocking());
}

#[test]
fn duplicate_label_definition_is_a_blocking_diagnostic() {
    let (result, sink) = run("A: mov r1, r2\nA: mov r3, r4\n");
    assert!(!result.succeeded);
    assert!(result.diagnostics.has_blocking());
    assert!(sink.files.is_empty());
}

#[test]
fn should_encode_stays_false_for_rest_of_pass_after_first_error() {
    // The malformed mov (three operands) trips should_encode; a perfectly
    // valid instruction afterwards still gets diagnosed as unreachable
    // work but must not silently re-enable encoding, and the run must
    // still fail overall.
    let (result, sink) = run("mov r1, r2, r3\nstop\n");
    assert!(!result.succeeded);
    assert!(sink.files.is_empty());
}

#[test]
fn data_directive_encodes_negative_and_zero_values() {
    let (result, sink) = run("NUMS: .data 7, -1, 0\nstop\n");
    assert!(result.succeeded);
    let object = &sink.files[Path::new("prog.object")];
    // Three data words plus one instruction word (stop).
    assert!(object.starts_with("        3\t1        \n"));
}

#[test]
fn string_directive_appends_terminator_word() {
    let (result, sink) = run("MSG: .string \"hi\"\nstop\n");
    assert!(result.succeeded);
    let object = &sink.files[Path::new("prog.object")];
    // "hi" is 2 bytes plus a zero terminator: 3 data words, plus one
    // instruction word (stop).
    assert!(object.starts_with("        3\t1        \n"));
}

#[test]
fn empty_source_assembles_to_empty_image() {
    let (result, sink) = run("");
    assert!(result.succeeded);
    let object = &sink.files[Path::new("prog.object")];
    assert_eq!(object, "        0\t0        \n");
}

#[test]
fn data_label_address_accounts_for_final_instruction_count() {
    // mov (3 words: 100-102) then stop (1 word: 103) leaves 4
    // instruction words; LEN's data-image slot at offset 0 lands at
    // object address 104, not the bare 0-based data counter.
    let (result, sink) = run("mov r1, LEN\nstop\nLEN: .data 7\n");
    assert!(result.succeeded);
    let object = &sink.files[Path::new("prog.object")];
    assert!(object.starts_with("        1\t4        \n"));
    // Word at 102 is the patched LEN operand (mov's second operand
    // word); its 12-bit value field must carry 104, not 0.
    let lines: Vec<&str> = object.lines().collect();
    let patched = lines
        .iter()
        .find(|l| l.starts_with("0102\t"))
        .expect("patched operand word present");
    let visual = patched.split('\t').nth(1).unwrap();
    // bits 2-13 hold the value field; an unrelocated address of 0 would
    // leave it all zero regardless of the ARE bits in bits 0-1.
    assert_ne!(&visual[0..12], "............");
}

#[test]
fn out_of_range_data_value_is_a_blocking_diagnostic() {
    let (result, sink) = run("NUMS: .data 20000\nstop\n");
    assert!(!result.succeeded);
    assert!(result.diagnostics.has_blocking());
    assert!(sink.files.is_empty());
}

#[test]
fn out_of_range_immediate_is_a_blocking_diagnostic() {
    let (result, sink) = run("mov #5000, r1\nstop\n");
    assert!(!result.succeeded);
    assert!(result.diagnostics.has_blocking());
    assert!(sink.files.is_empty());
}

#[test]
fn index_operand_patches_register_and_address() {
    let (result, sink) = run("TABLE: .data 1, 2, 3\nmov TABLE[r2], r0\nstop\n");
    assert!(result.succeeded);
    let object = &sink.files[Path::new("prog.object")];
    assert!(object.contains('\n'));
}

#[test]
fn missing_source_file_is_a_plumbing_error_not_a_diagnostic() {
    let reader = MockFileReader::default();
    let mut sink = MockOutputSink::default();
    let err = assemble_file("missing", &reader, &mut sink).unwrap_err();
    assert!(err.to_string().contains("missing.as"));
}

#[test]
fn real_filesystem_round_trip_writes_three_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let basename = dir.path().join("prog");
    fs::write(basename.with_extension("as"), "MAIN: mov r1, r2\n.entry MAIN\nstop\n")
        .expect("write source");

    let reader = AsmFileReader;
    let mut sink = FsOutputSink;
    let result = assemble_file(basename.to_str().unwrap(), &reader, &mut sink)
        .expect("assembly should not I/O-fail");
    assert!(result.succeeded);

    let object = fs::read_to_string(basename.with_extension("object")).expect("read object");
    assert!(object.starts_with("        0\t2        \n"));

    let entries = fs::read_to_string(basename.with_extension("entry")).expect("read entries");
    assert!(entries.contains("MAIN\t100"));

    let externals = fs::read_to_string(basename.with_extension("external")).expect("read externals");
    assert!(externals.is_empty());
}
