//! `cog_core` regenerates text in place from generator code embedded in the
//! text itself.
//!
//! A file carries one or more generator blocks. Each block is run through an
//! external command and the block's previously generated output is replaced
//! with whatever the command prints:
//!
//! ```text
//! // [[[gocog
//! // package main
//! // import "fmt"
//! // func main() { fmt.Println("const answer = 42") }
//! // gocog]]]
//! const answer = 42
//! // [[[end]]]
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! original file
//!   → LineScanner (plain text → generator source → stale output, repeating)
//!   → ScratchFile (generator source with its comment prefix stripped)
//!   → GeneratorCommand (external process; stdout spliced into the rewrite)
//!   → PendingOutput (`<file>_cog`, replaces the original only on success)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Run settings, marker derivation and `cog.toml` loading.
//! - [`scanner`]: Byte-exact line scanning up to a marker.
//! - [`prefix`]: Comment prefix extraction and stripping.
//! - [`runner`]: Scratch generator files and external command execution.
//! - [`commit`]: The temporary output file and its replace-or-discard
//!   lifecycle.
//! - [`diagnostics`]: Per-run message sinks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cog_core::CogConfig;
//! use cog_core::RunOutcome;
//! use cog_core::TracingDiagnostics;
//! use cog_core::process_file;
//! use std::path::Path;
//!
//! let config = CogConfig::default();
//! let file = Path::new("src/generated.rs");
//! let diagnostics = TracingDiagnostics::new(file, config.verbosity);
//!
//! match process_file(file, &config, &diagnostics) {
//!     Ok(RunOutcome::NoGeneratorBlocks) => println!("nothing to do"),
//!     Ok(_) => println!("regenerated"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub use commit::*;
pub use config::*;
pub use diagnostics::*;
pub use engine::*;
pub use error::*;
pub use prefix::*;
pub use runner::*;
pub use scanner::*;

pub mod commit;
pub mod config;
pub mod diagnostics;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod prefix;
pub mod runner;
pub mod scanner;
