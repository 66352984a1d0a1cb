use std::path::PathBuf;

use clap::Args;

use westwood_formats::error::Result;
use westwood_formats::mix::MixArchive;

use crate::command::global_args::GlobalArgs;
use crate::command::WestwoodCommand;

/// List the entries of an archive.
#[derive(Args, Debug)]
pub struct List {
    /// The archive to list.
    archive: PathBuf,
}

impl WestwoodCommand for List {
    fn run(self, global_args: GlobalArgs) -> Result<()> {
        let mut archive = MixArchive::open(&self.archive)?;
        let names = global_args.load_names()?;
        if !names.is_empty() {
            match global_args.game {
                Some(game) => archive.resolve_names_as(game, &names),
                None => archive.resolve_names(&names),
            }
        }

        let info = archive.info();
        println!(
            "{} ({} archive, {} files)",
            self.archive.display(),
            info.format,
            info.file_count
        );
        println!("{:>10}  {:>10}  {:>10}  name", "hash", "offset", "size");
        for entry in archive.entries() {
            println!(
                "{:#010X}  {:#10X}  {:>10}  {}",
                entry.hash,
                entry.offset,
                entry.size,
                entry.name.as_deref().unwrap_or("-")
            );
        }
        Ok(())
    }
}
