//! LL(1) Predictive Parser Generator
//!
//! Reads a context-free grammar from stdin, eliminates left recursion,
//! left-factors, computes FIRST/FOLLOW sets, builds the LL(1) parse table
//! and drives token streams through it. An optional positional argument
//! names a directory for the analysis artifacts.

use std::process;

fn main() {
    env_logger::init();
    if let Err(e) = ll1_parser::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
