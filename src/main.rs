use clap::Parser;
use kabusignal::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    kabusignal::logging::init();
    run(Cli::parse())
}
