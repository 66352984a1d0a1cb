use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use rayon::prelude::*;

use westwood_formats::console::format_entry_for_console;
use westwood_formats::error::{Result, WestwoodError};
use westwood_formats::mix::{MixArchive, MixEntry};

use crate::command::global_args::GlobalArgs;
use crate::command::{make_open_options, WestwoodCommand};

/// Extract entries from an archive.
#[derive(Args, Debug)]
pub struct Extract {
    /// The archive to extract from.
    archive: PathBuf,
    /// Entry names (or 0x-prefixed hashes) to extract.
    entries: Vec<String>,
    /// Extract every entry.
    #[clap(short, long)]
    all: bool,
    /// Directory to write into.
    #[clap(short, long, default_value = ".")]
    output: PathBuf,
    /// Should files be overwritten?
    #[clap(long)]
    overwrite: bool,
}

impl WestwoodCommand for Extract {
    fn run(mut self, global_args: GlobalArgs) -> Result<()> {
        let mut archive = MixArchive::open(&self.archive)?;
        let names = global_args.load_names()?;
        if !names.is_empty() {
            match global_args.game {
                Some(game) => archive.resolve_names_as(game, &names),
                None => archive.resolve_names(&names),
            }
        }

        std::fs::create_dir_all(&self.output)
            .map_err(|e| WestwoodError::Io("Couldn't create output dirs".into(), e))?;

        if self.all {
            archive
                .entries()
                .par_iter()
                .try_for_each(|entry| self.write_entry(&archive, entry))?;
            return Ok(());
        }

        self.entries.sort();
        for wanted in &self.entries {
            let entry = lookup(&archive, wanted)?.clone();
            self.write_entry(&archive, &entry)?;
        }
        Ok(())
    }
}

fn lookup<'a>(archive: &'a MixArchive, wanted: &str) -> Result<&'a MixEntry> {
    if let Some(hex) = wanted.strip_prefix("0x").or_else(|| wanted.strip_prefix("0X")) {
        if let Ok(hash) = u32::from_str_radix(hex, 16) {
            if let Some(entry) = archive.find_hash(hash) {
                return Ok(entry);
            }
        }
    }
    archive
        .find_name(wanted)
        .ok_or_else(|| WestwoodError::Read(format!("no entry matching '{}'", wanted)))
}

impl Extract {
    fn write_entry(&self, archive: &MixArchive, entry: &MixEntry) -> Result<()> {
        log::info!("Extracting {}...", format_entry_for_console(archive, entry));

        let file_name = entry
            .name
            .clone()
            .unwrap_or_else(|| format!("{:08X}.bin", entry.hash));
        // Archive names may carry path separators; keep only the last part.
        let file_name = file_name
            .rsplit(['/', '\\'])
            .next()
            .expect("rsplit yields at least one piece")
            .to_string();

        let bytes = archive.read(entry)?;
        let output_path = self.output.join(file_name);
        let mut output = make_open_options(self.overwrite)
            .open(&output_path)
            .map_err(|e| {
                WestwoodError::Io(format!("Couldn't open {}", output_path.display()), e)
            })?;
        output
            .write_all(bytes)
            .map_err(|e| WestwoodError::Io("Couldn't write output".into(), e))?;
        Ok(())
    }
}
