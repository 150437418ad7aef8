//! Pixedit - command-line tool for editing and rendering pixel grid documents

use std::process::ExitCode;

use pixedit::cli;

fn main() -> ExitCode {
    cli::run()
}
