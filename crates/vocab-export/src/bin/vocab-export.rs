use anyhow::Result;
use clap::Parser;
use vocab_export::cli::{self, Cli};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(&cli);
    cli::run(&cli)
}
