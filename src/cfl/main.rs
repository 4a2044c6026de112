//! `cfl`: Confluence from the command line.
//!
//! See [`cli`] for command behavior and the library crate docs for the layering.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
