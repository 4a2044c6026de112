//! Shell completion scripts, generated from the clap definition.

use super::setup::Cli;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

pub fn write_completions<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}
