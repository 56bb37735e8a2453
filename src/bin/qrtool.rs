use clap::{Parser, Subcommand, ValueEnum};
use rust_qr_encoder::encoder::config::max_strategies;
use rust_qr_encoder::encoder::optimizer::{all_strategies, find_minimal_segmentation};
use rust_qr_encoder::encoder::segment::mode_runs;
use rust_qr_encoder::logging::setup_logging;
use rust_qr_encoder::tools::{parse_hex, render_text, to_hex};
use rust_qr_encoder::{
    ECLevel, EncodeOptions, MaskPattern, Mode, QRCode, Strategy, Version, encode,
    encode_with_best_mask,
};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR code encoder CLI tools")]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn", env = "QR_LOG_LEVEL")]
    log_level: String,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    /// Terminal block characters
    Text,
    /// Symbol byte layout as hex
    Hex,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text into a QR symbol
    Encode {
        text: String,
        #[arg(long)]
        version: Option<u8>,
        #[arg(long)]
        min_version: Option<u8>,
        #[arg(long)]
        max_version: Option<u8>,
        #[arg(long)]
        ecl: Option<ECLevel>,
        #[arg(long)]
        min_ecl: Option<ECLevel>,
        #[arg(long)]
        max_ecl: Option<ECLevel>,
        /// Mask index 0-7; picked by penalty score when omitted
        #[arg(long)]
        mask: Option<u8>,
        #[arg(long, value_enum, default_value = "text")]
        output: Output,
        #[arg(long, default_value_t = 4)]
        quiet_zone: usize,
    },
    /// Print the minimal segmentation of text at a version
    Segment {
        text: String,
        #[arg(long, default_value_t = 1)]
        version: u8,
    },
    /// List every strategy that fits a version and error correction level
    Strategies {
        text: String,
        #[arg(long, default_value_t = 1)]
        version: u8,
        #[arg(long, default_value = "l")]
        ecl: ECLevel,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Render a symbol from its hex byte layout
    Inspect {
        hex: String,
        #[arg(long, default_value_t = 4)]
        quiet_zone: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, !cli.log_json);

    let result = match cli.command {
        Command::Encode {
            text,
            version,
            min_version,
            max_version,
            ecl,
            min_ecl,
            max_ecl,
            mask,
            output,
            quiet_zone,
        } => build_options(version, min_version, max_version, ecl, min_ecl, max_ecl, mask)
            .and_then(|(options, auto_mask)| encode_cmd(&text, &options, auto_mask, output, quiet_zone)),
        Command::Segment { text, version } => segment_cmd(&text, version),
        Command::Strategies {
            text,
            version,
            ecl,
            limit,
        } => strategies_cmd(&text, version, ecl, limit.unwrap_or_else(max_strategies)),
        Command::Inspect { hex, quiet_zone } => inspect_cmd(&hex, quiet_zone),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_options(
    version: Option<u8>,
    min_version: Option<u8>,
    max_version: Option<u8>,
    ecl: Option<ECLevel>,
    min_ecl: Option<ECLevel>,
    max_ecl: Option<ECLevel>,
    mask: Option<u8>,
) -> rust_qr_encoder::Result<(EncodeOptions, bool)> {
    let mut options = EncodeOptions::new();
    if let Some(v) = version {
        options = options.version(Version::new(v)?);
    }
    if let Some(v) = min_version {
        options = options.min_version(Version::new(v)?);
    }
    if let Some(v) = max_version {
        options = options.max_version(Version::new(v)?);
    }
    if let Some(e) = ecl {
        options = options.ecl(e);
    }
    if let Some(e) = min_ecl {
        options = options.min_ecl(e);
    }
    if let Some(e) = max_ecl {
        options = options.max_ecl(e);
    }
    if let Some(m) = mask {
        options = options.mask(MaskPattern::new(m)?);
    }
    Ok((options, mask.is_none()))
}

fn encode_cmd(
    text: &str,
    options: &EncodeOptions,
    auto_mask: bool,
    output: Output,
    quiet_zone: usize,
) -> rust_qr_encoder::Result<()> {
    let start = Instant::now();
    let qr = if auto_mask {
        encode_with_best_mask(text, options)?
    } else {
        encode(text, options)?
    };
    let elapsed = start.elapsed();

    match output {
        Output::Text => {
            print!("{}", render_text(&qr.grid(), quiet_zone));
            println!("{qr}");
            println!("Encoded in {:.3}ms", elapsed.as_secs_f64() * 1000.0);
        }
        Output::Hex => println!("{}", to_hex(&qr.to_bytes())),
    }
    Ok(())
}

fn describe(strategy: &Strategy) -> String {
    let runs: Vec<String> = mode_runs(&strategy.steps)
        .into_iter()
        .map(|(mode, len)| format!("{}x{len}", short_name(mode)))
        .collect();
    format!("{:>6} bits  {}", strategy.cost, runs.join(" "))
}

fn short_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Numeric => "N",
        Mode::Alphanumeric => "A",
        Mode::Byte => "B",
    }
}

fn segment_cmd(text: &str, version: u8) -> rust_qr_encoder::Result<()> {
    let version = Version::new(version)?;
    let strategy = find_minimal_segmentation(text, version);
    println!("Version {version}");
    println!("{}", describe(&strategy));
    for (mode, len) in mode_runs(&strategy.steps) {
        println!("  {mode}: {len} chars");
    }
    Ok(())
}

fn strategies_cmd(
    text: &str,
    version: u8,
    ecl: ECLevel,
    limit: usize,
) -> rust_qr_encoder::Result<()> {
    let version = Version::new(version)?;
    let mut count = 0;
    for strategy in all_strategies(text, version, ecl).take(limit) {
        println!("{}", describe(&strategy));
        count += 1;
    }
    println!("{count} strategies (limit {limit})");
    Ok(())
}

fn inspect_cmd(hex: &str, quiet_zone: usize) -> rust_qr_encoder::Result<()> {
    let qr = QRCode::from_bytes(&parse_hex(hex)?)?;
    println!("{qr}");
    println!("Size: {}x{}, {} codewords", qr.size(), qr.size(), qr.codewords.len());
    print!("{}", render_text(&qr.grid(), quiet_zone));
    Ok(())
}
