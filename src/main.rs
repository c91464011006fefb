use anyhow::Result;
use clap::Parser;

use linediff::{
    cli::Cli,
    config::LineDiffConfig,
    diff::{CancellationToken, DiffFormatter, DiffGenerator, DiffResult, OutputFormat},
};

const EXIT_SAME: i32 = 0;
const EXIT_DIFFERENT: i32 = 1;
const EXIT_TROUBLE: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.setup_logging();

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(EXIT_TROUBLE);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let config = cli.resolve_config()?;
    let options = config.to_options()?;
    let (left, right) = cli.read_inputs()?;

    tracing::info!(
        left = %cli.left.display(),
        right = %cli.right.display(),
        "Comparing files"
    );

    let token = CancellationToken::new();
    let handle = token.clone();
    ctrlc::set_handler(move || {
        handle.cancel();
    })?;

    let result = DiffGenerator::new(options)
        .with_cancellation(token)
        .generate(&left, &right)?;

    print_result(&result, cli.format, &config)?;

    Ok(if result.stats.is_identical() {
        EXIT_SAME
    } else {
        EXIT_DIFFERENT
    })
}

fn print_result(result: &DiffResult, format: OutputFormat, config: &LineDiffConfig) -> Result<()> {
    match format {
        OutputFormat::Unified => {
            let text = if config.render.inline_markers {
                DiffFormatter::render_unified_inline(result)
            } else {
                DiffFormatter::render_unified(result)
            };
            // Split on '\n' only so a trailing '\r' stays part of its line
            if !text.is_empty() {
                for line in text.split('\n') {
                    print_colored(line, config.render.color);
                }
            }
        }
        OutputFormat::SideBySide => {
            println!("{}", DiffFormatter::format_side_by_side(result, config.render.width));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Stats => {
            println!("{}", DiffFormatter::format_stats(result));
        }
    }
    Ok(())
}

fn print_colored(line: &str, color: bool) {
    if !color {
        println!("{}", line);
    } else if line.starts_with('+') {
        println!("\x1b[32m{}\x1b[0m", line);
    } else if line.starts_with('-') {
        println!("\x1b[31m{}\x1b[0m", line);
    } else {
        println!("{}", line);
    }
}
