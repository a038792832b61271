use autobench::cli::{handle_run, CliArgs};

use clap::Parser;
use std::process;

fn main() {
    let args = CliArgs::parse();
    process::exit(handle_run(args));
}
