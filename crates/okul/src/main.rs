//! # okul
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this file
//! only invokes `cli::run()` and picks the exit code. Content rules, storage and
//! rendering all live in the `okulapp` library; see its crate docs for the
//! layering.
//!
//! ## Testing Approach
//!
//! - **okulapp commands and core**: unit tests beside the code, run against
//!   the in-memory store and media host.
//! - **CLI parsing and rendering**: unit tests in `setup.rs` and `render.rs`.
//! - **End to end**: `tests/cli_e2e.rs` runs the binary against a temporary
//!   data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
