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

use thiserror::Error;

/// Hard failures in assembling a file: things that stop before a
/// meaningful diagnostic list can even be produced. Per-line problems
/// (bad operand, redefined symbol) are never represented here; they
/// accumulate in a [`crate::diagnostics::DiagnosticList`] instead, and a
/// source file riddled with them still assembles to completion.
#[derive(Error, Debug)]
pub enum AssemblerError {
    #[error("could not read '{path}': {source}")]
    SourceUnreadable {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not write '{path}': {source}")]
    OutputUnwritable {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}
