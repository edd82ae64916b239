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

use anyhow::Result;
use clap::Parser as clap_parser;
use tpasm::assemble_file;
use tpasm::file_reader::{AsmFileReader, FsOutputSink};

#[derive(clap_parser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    /// One or more source basenames; each names `<basename>.as`.
    basenames: Vec<String>,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let reader = AsmFileReader;
    let mut sink = FsOutputSink;
    let mut any_failed = false;

    for basename in &opts.basenames {
        match assemble_file(basename, &reader, &mut sink) {
            Ok(result) => {
                for diagnostic in result.diagnostics.iter() {
                    eprintln!("{basename}:{}: {}", diagnostic.line_number, diagnostic.code);
                }
                if !result.succeeded {
                    any_failed = true;
                } else {
                    println!("{basename}: assembled successfully");
                }
            }
            Err(err) => {
                eprintln!("{basename}: {err}");
                any_failed = true;
            }
        }
    }

    if any_failed {
        std::process::exit(1);
    }

    Ok(())
}
