use std::fs::OpenOptions;

use clap::{Parser, Subcommand};

use westwood_formats::error::Result;

use crate::command::global_args::GlobalArgs;

mod export;
mod extract;
mod global_args;
mod info;
mod list;

pub trait WestwoodCommand {
    fn run(self, global_args: GlobalArgs) -> Result<()>;
}

#[derive(Parser, Debug)]
#[clap(about = "Westwood asset file reader", version)]
pub struct WestwoodTool {
    #[clap(flatten)]
    pub global_args: GlobalArgs,
    /// Thing to do.
    #[clap(subcommand)]
    pub subcommand: WwdCommand,
}

#[derive(Subcommand, Debug)]
pub enum WwdCommand {
    Info(info::Info),
    List(list::List),
    Extract(extract::Extract),
    Export(export::Export),
}

impl WestwoodCommand for WwdCommand {
    fn run(self, global_args: GlobalArgs) -> Result<()> {
        match self {
            WwdCommand::Info(v) => v.run(global_args),
            WwdCommand::List(v) => v.run(global_args),
            WwdCommand::Extract(v) => v.run(global_args),
            WwdCommand::Export(v) => v.run(global_args),
        }
    }
}

pub(crate) fn make_open_options(overwrite: bool) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options
}
