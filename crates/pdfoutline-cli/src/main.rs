mod cli;

use clap::Parser;
use cli::Cli;
use pdfoutline::fix::{FixOptions, FixReport, fix_document};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(code) = run(&cli) {
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<(), i32> {
    let options = FixOptions {
        content_file: cli.content.clone(),
        no_calibration: cli.no_calibration,
    };

    let report = fix_document(&cli.input, &cli.output, &options).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
    print_summary(cli, &report);
    Ok(())
}

fn print_summary(cli: &Cli, report: &FixReport) {
    if report.copied_verbatim {
        println!(
            "Nothing to add; copied {} unchanged to {}.",
            cli.input.display(),
            cli.output.display()
        );
        return;
    }

    let info_action = if report.info_inserted {
        "info inserted"
    } else if report.info_patched {
        "info patched"
    } else {
        "no info change"
    };
    let mut line = format!(
        "Wrote {}: {} outline entries, {}",
        cli.output.display(),
        report.outline_nodes,
        info_action
    );
    if report.page_offset != 0 {
        line.push_str(&format!(", page offset {:+}", report.page_offset));
    }
    println!("{line}.");
}
