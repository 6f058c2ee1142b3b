use compdb::cli::{handle, CliArgs};
use compdb::util::{init_logging, parse_level, LoggingConfig};
use compdb::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("compdb v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    std::process::exit(handle(&args));
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();
    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }
    init_logging(config);
}
