use std::io;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::CommandFactory;
use clap_complete::Shell;
use clap_complete::generate;

use crate::Cli;

const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Args)]
pub struct Completion {
    #[arg(long, help = "target shell, detected from $SHELL if omitted")]
    shell: Option<Shell>,
}

impl Completion {
    pub fn execute(&self) -> Result<()> {
        let shell = self.shell.or_else(Shell::from_env).context("unknown shell")?;
        generate(shell, &mut Cli::command(), CARGO_PKG_NAME, &mut io::stdout());
        Ok(())
    }
}
