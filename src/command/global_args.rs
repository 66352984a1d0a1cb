use clap::Args;
use std::path::PathBuf;

use westwood_formats::error::{Result, WestwoodError};
use westwood_formats::hash::Game;

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// File with one candidate filename per line, used to resolve archive
    /// entry hashes back to names.
    #[clap(short, long, global = true)]
    pub names: Option<PathBuf>,
    /// Hash names as this game instead of the detected one
    /// (e.g. tiberian_dawn, red_alert, tiberian_sun).
    #[clap(short, long, global = true)]
    pub game: Option<Game>,
    /// Verbosity level, repeat to increase.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Load the name dictionary, if one was given.
    pub fn load_names(&self) -> Result<Vec<String>> {
        let Some(path) = &self.names else {
            return Ok(Vec::new());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| WestwoodError::Io(format!("Couldn't read {}", path.display()), e))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}
