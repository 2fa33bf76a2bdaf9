//! `arsync completions <shell>` and `arsync man`.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;

use crate::cli::Cli;

pub fn run_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "arsync", &mut io::stdout());
    Ok(())
}

pub fn run_man() -> Result<()> {
    clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
    Ok(())
}
