use clap::Parser;
use std::path::PathBuf;

/// Generates a compilation database from a trace of process executions
#[derive(Parser, Debug)]
#[command(
    name = "compdb",
    about = "Generate a compilation database from a build trace",
    version,
    long_about = "compdb reads the process executions recorded during a build, recognizes \
                  the compiler invocations among them and writes a JSON compilation \
                  database usable by clang tooling.\n\n\
                  Examples:\n  \
                  compdb\n  \
                  compdb --input events.json --output compile_commands.json\n  \
                  compdb --append --exclude-compiler /usr/bin/cc"
)]
pub struct CliArgs {
    #[arg(
        short = 'i',
        long,
        value_name = "FILE",
        default_value = "events.json",
        help = "Trace of the build executions"
    )]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        default_value = "compile_commands.json",
        help = "Compilation database to write"
    )]
    pub output: PathBuf,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Configuration file (defaults to $COMPDB_CONFIG when set)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Merge with the entries of an existing output file")]
    pub append: bool,

    #[arg(long, help = "Only write entries whose source file exists")]
    pub include_only_existing: bool,

    #[arg(
        long = "exclude-compiler",
        value_name = "PATH",
        help = "Compiler executable to ignore (can be used multiple times)"
    )]
    pub exclude_compiler: Vec<PathBuf>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Debug logging of every recognized execution")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}
