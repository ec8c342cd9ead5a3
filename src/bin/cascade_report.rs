use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use barcode_cascade::detector::default_detector;
use barcode_cascade::tools::{InputSource, dataset_iter, decode_input};
use barcode_cascade::{Cascade, CascadeConfig, DecodeOutcome, ImageCrateCodec, plan};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "cascade_report",
    version,
    about = "Run the cascade over a directory of images and report which views decode"
)]
struct Cli {
    /// Directory searched recursively for images
    root: PathBuf,
    /// Stop after this many images
    #[arg(long)]
    limit: Option<usize>,
    /// Print one line per image
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if !cli.root.exists() {
        eprintln!("Dataset root not found: {}", cli.root.display());
        return ExitCode::FAILURE;
    }
    let Some(detector) = default_detector() else {
        eprintln!("No barcode detector backend in this build (enable feature `rxing` or `qr`)");
        return ExitCode::FAILURE;
    };

    let codec = ImageCrateCodec::with_config(&CascadeConfig::from_env());
    let mut cascade = Cascade::new(detector);

    let mut total = 0usize;
    let mut decoded = 0usize;
    let mut by_method: HashMap<String, usize> = HashMap::new();
    let mut failures: HashMap<String, usize> = HashMap::new();
    let start = Instant::now();

    for path in dataset_iter(&cli.root, cli.limit) {
        total += 1;
        let outcome = decode_input(&mut cascade, &codec, &InputSource::File(path.clone()));
        match &outcome {
            DecodeOutcome::Decoded { method, .. } => {
                decoded += 1;
                *by_method.entry(method.clone()).or_default() += 1;
            }
            DecodeOutcome::Failed { error } => {
                *failures.entry(error.clone()).or_default() += 1;
            }
        }
        if cli.verbose {
            let line = outcome.to_json().unwrap_or_default();
            println!("{}: {line}", path.display());
        }
    }

    if total == 0 {
        println!("No images found under {}", cli.root.display());
        return ExitCode::SUCCESS;
    }

    let elapsed = start.elapsed();
    println!("Cascade report for {}", cli.root.display());
    println!("=====================================");
    println!(
        "Decoded {decoded}/{total} = {:.2}% in {:.2?} ({:.1} ms/image)",
        decoded as f64 / total as f64 * 100.0,
        elapsed,
        elapsed.as_secs_f64() * 1000.0 / total as f64
    );

    println!("\nWinning views:");
    for step in plan() {
        let label = step.label();
        if let Some(count) = by_method.get(&label) {
            println!("  {label:<32} {count}");
        }
    }

    if !failures.is_empty() {
        println!("\nFailures:");
        let mut failures: Vec<(String, usize)> = failures.into_iter().collect();
        failures.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        for (error, count) in failures {
            println!("  {count:>5}  {error}");
        }
    }

    ExitCode::SUCCESS
}
