use crate::cli::commands::CliArgs;
use crate::config::Config;
use crate::output::{merge, CompilationDatabase};
use crate::semantic::RecognitionPipeline;
use crate::trace::Report;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Runs one trace to database conversion, returns the number of written entries
pub fn run(args: &CliArgs) -> Result<usize> {
    let mut config = Config::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    apply_overrides(&mut config, args);
    debug!("Configuration: {:?}", config);

    let report = Report::load(&args.input)?;
    let pipeline = RecognitionPipeline::from_config(&config.compilation);
    let mut entries = pipeline.transform(&report);
    info!(
        executions = report.executions.len(),
        entries = entries.len(),
        "Recognized compilations"
    );

    let database = CompilationDatabase::new(config.output.format, config.output.content);
    if args.append && args.output.exists() {
        let existing = database.from_json(&args.output).with_context(|| {
            format!(
                "Failed to read existing compilation database {}",
                args.output.display()
            )
        })?;
        debug!(existing = existing.len(), "Merging with existing entries");
        entries = merge(&existing, &entries);
    }

    let written = database.to_json(&args.output, &entries).with_context(|| {
        format!(
            "Failed to write compilation database {}",
            args.output.display()
        )
    })?;
    info!("Wrote {} entries to {}", written, args.output.display());
    Ok(written)
}

fn apply_overrides(config: &mut Config, args: &CliArgs) {
    if args.include_only_existing {
        config.output.content.include_only_existing_source = true;
    }
    config
        .compilation
        .compilers_to_exclude
        .extend(args.exclude_compiler.iter().cloned());
}

/// Process exit code of [`run`]
pub fn handle(args: &CliArgs) -> i32 {
    match run(args) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
