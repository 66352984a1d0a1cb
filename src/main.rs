use clap::Parser;

use crate::command::{WestwoodCommand, WestwoodTool};

mod command;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match WestwoodTool::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version requests are not argument errors.
            if e.use_stderr() {
                e.print().ok();
                std::process::exit(1);
            }
            e.print().ok();
            std::process::exit(0);
        }
    };

    if let Err(e) = args.subcommand.run(args.global_args) {
        eprintln!("wwd: {}", e);
        std::process::exit(e.exit_code());
    }
}
