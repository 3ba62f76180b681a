use std::io::{self, Write};

use clap::{Args, CommandFactory};
use clap_complete::Shell;
use eyre::Result;

use super::Cli;

#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    shell: Shell,
}

impl CompletionsCommand {
    pub fn run(&self) -> Result<()> {
        self.write_to(&mut io::stdout())
    }

    /// Write the completion script for the `outsource` binary to `out`.
    fn write_to(&self, out: &mut impl Write) -> Result<()> {
        let mut cmd = Cli::command();
        let bin = cmd.get_name().to_string();
        clap_complete::generate(self.shell, &mut cmd, bin, out);
        out.flush()?;
        Ok(())
    }
}
