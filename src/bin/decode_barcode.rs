use std::path::PathBuf;
use std::process::ExitCode;

use barcode_cascade::detector::default_detector;
use barcode_cascade::tools::{InputSource, decode_input};
use barcode_cascade::{Cascade, CascadeConfig, DecodeOutcome, ImageCrateCodec};
use clap::Parser;
use clap::error::ErrorKind;

const USAGE: &str = "Usage: decode_barcode --file <path> OR decode_barcode <base64_data>";
const MISSING_DETECTOR: &str = "Missing dependency: no barcode detector backend in this build. \
     Install with: cargo install barcode_cascade --features rxing";

#[derive(Parser)]
#[command(
    name = "decode_barcode",
    version,
    about = "Decode a barcode from an image, retrying over preprocessed and rotated views"
)]
struct Cli {
    /// Read the image from a file
    #[arg(long, value_name = "PATH", conflicts_with = "data")]
    file: Option<PathBuf>,
    /// Base64-encoded image bytes (a data: URL prefix is accepted)
    data: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            log::debug!("argument error: {err}");
            return fail(USAGE);
        }
    };

    let source = match (cli.file, cli.data) {
        (Some(path), _) => InputSource::File(path),
        (None, Some(data)) => InputSource::Base64(data),
        (None, None) => return fail(USAGE),
    };

    let Some(detector) = default_detector() else {
        return fail(MISSING_DETECTOR);
    };

    let codec = ImageCrateCodec::with_config(&CascadeConfig::from_env());
    let mut cascade = Cascade::new(detector);
    emit(&decode_input(&mut cascade, &codec, &source));
    ExitCode::SUCCESS
}

fn fail(message: &str) -> ExitCode {
    emit(&DecodeOutcome::Failed {
        error: message.to_string(),
    });
    ExitCode::FAILURE
}

fn emit(outcome: &DecodeOutcome) {
    match outcome.to_json() {
        Ok(line) => println!("{line}"),
        Err(err) => {
            log::error!("failed to serialize outcome: {err}");
            println!(r#"{{"success":false,"error":"Decoding error: unserializable outcome"}}"#);
        }
    }
}
