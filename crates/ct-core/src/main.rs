use clap::Parser;
use ct_core::cli::{run_cli, Cli};
use ct_core::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.log_format, cli.global.verbose, cli.global.quiet);
    let code = run_cli(&cli);
    std::process::exit(code.as_i32());
}
