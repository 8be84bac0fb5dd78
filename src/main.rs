//! # cp437 CLI - CP437 Text Converter
//!
//! Command-line front end for the CP437 codec: decode DOS-era text and
//! screen dumps to UTF-8, encode UTF-8 back to CP437, and check how much of
//! a document would survive the trip.

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use std::time::Instant;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use serde::Serialize;

#[cfg(feature = "cli")]
use cp437_codec::{ConversionState, Cp437Codec, Error as CodecError, Substitution, TextCodec};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// cp437: convert between CP437 (DOS/OEM-US) and UTF-8
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "cp437")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Decode CP437 bytes to UTF-8 text
    Decode(DecodeArgs),

    /// Encode UTF-8 text as CP437 bytes
    Encode(EncodeArgs),

    /// Count characters of a UTF-8 file that CP437 cannot represent
    Check(CheckArgs),

    /// Print the CP437 high-byte table (0x80-0xFF)
    Table,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct DecodeArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct EncodeArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Substitute unrepresentable characters with a null byte instead of '?'
    #[arg(long)]
    null: bool,

    /// Fail on the first unrepresentable character
    #[arg(long, conflicts_with = "null")]
    strict: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct CheckArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Show the first unrepresentable character and its position
    #[arg(long)]
    show_errors: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ConversionReport {
    success: bool,
    encoding: &'static str,
    bytes_processed: usize,
    bytes_written: usize,
    invalid_chars: usize,
    substitution: Option<Substitution>,
    processing_time_ms: u64,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct InvalidChar {
    character: char,
    code_point: String,
    position: usize,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct CheckReport {
    encoding: &'static str,
    characters: usize,
    invalid_chars: usize,
    representable: bool,
    first_invalid: Option<InvalidChar>,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct TableEntry {
    byte: u8,
    code_point: String,
    character: char,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Decode(ref args) => decode_command(args, &cli)?,
        Commands::Encode(ref args) => encode_command(args, &cli)?,
        Commands::Check(ref args) => check_command(args, &cli)?,
        Commands::Table => table_command(&cli)?,
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    if let Some(input_path) = input {
        log::info!("Reading from: {}", input_path.display());
        fs::read(input_path)
            .with_context(|| format!("Failed to read input file: {}", input_path.display()))
    } else {
        log::info!("Reading from stdin");
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    }
}

#[cfg(feature = "cli")]
fn write_output(output: Option<&Path>, data: &[u8]) -> Result<()> {
    if let Some(output_path) = output {
        fs::write(output_path, data)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;
        log::info!("Wrote to: {}", output_path.display());
    } else {
        io::stdout()
            .write_all(data)
            .context("Failed to write to stdout")?;
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn utf8_input(data: &[u8]) -> Result<&str> {
    std::str::from_utf8(data).map_err(|e| {
        anyhow::Error::new(CodecError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })
    })
}

#[cfg(feature = "cli")]
fn decode_command(args: &DecodeArgs, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();
    let codec = Cp437Codec;

    let input_data = read_input(args.input.as_deref())?;
    let text = codec.decode(&input_data);
    write_output(args.output.as_deref(), text.as_bytes())?;

    let processing_time = start_time.elapsed();
    log::debug!(
        "Decoded {} bytes -> {} bytes in {:?}",
        input_data.len(),
        text.len(),
        processing_time
    );

    match cli.format {
        OutputFormat::Json => {
            let report = ConversionReport {
                success: true,
                encoding: codec.name(),
                bytes_processed: input_data.len(),
                bytes_written: text.len(),
                invalid_chars: 0,
                substitution: None,
                processing_time_ms: processing_time.as_millis() as u64,
            };
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if args.output.is_some() {
                eprintln!("✓ Decoded {} bytes", input_data.len());
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn encode_command(args: &EncodeArgs, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();
    let codec = Cp437Codec;

    let input_data = read_input(args.input.as_deref())?;

    let mut state = ConversionState::new();
    state.set_convert_invalid_to_null(args.null);

    let output_data = if args.strict {
        cp437_codec::encode_utf8_strict(&input_data).context("Strict encoding failed")?
    } else {
        let text = utf8_input(&input_data)?;
        codec.encode(text, &mut state)
    };

    write_output(args.output.as_deref(), &output_data)?;

    let processing_time = start_time.elapsed();
    log::debug!(
        "Encoded {} bytes -> {} bytes in {:?}",
        input_data.len(),
        output_data.len(),
        processing_time
    );

    if state.has_invalid() {
        log::warn!(
            "{} character(s) had no CP437 form and were replaced with 0x{:02X}",
            state.invalid_chars(),
            state.substitute_byte()
        );
    }

    match cli.format {
        OutputFormat::Json => {
            let report = ConversionReport {
                success: true,
                encoding: codec.name(),
                bytes_processed: input_data.len(),
                bytes_written: output_data.len(),
                invalid_chars: state.invalid_chars(),
                substitution: (!args.strict).then_some(state.substitution()),
                processing_time_ms: processing_time.as_millis() as u64,
            };
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if state.has_invalid() {
                eprintln!(
                    "✗ Lossy conversion: {} unrepresentable character(s)",
                    state.invalid_chars()
                );
            } else if args.output.is_some() {
                eprintln!("✓ Encoded {} characters", output_data.len());
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn check_command(args: &CheckArgs, cli: &Cli) -> Result<()> {
    let codec = Cp437Codec;

    let input_data = read_input(args.input.as_deref())?;
    let text = utf8_input(&input_data)?;

    let mut state = ConversionState::new();
    let encoded = codec.encode(text, &mut state);

    let first_invalid = match codec.encode_strict(text) {
        Err(CodecError::Unrepresentable {
            character,
            position,
        }) => Some(InvalidChar {
            character,
            code_point: format!("U+{:04X}", character as u32),
            position,
        }),
        _ => None,
    };

    match cli.format {
        OutputFormat::Json => {
            let report = CheckReport {
                encoding: codec.name(),
                characters: encoded.len(),
                invalid_chars: state.invalid_chars(),
                representable: !state.has_invalid(),
                first_invalid,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if state.has_invalid() {
                println!(
                    "✗ {} of {} characters cannot be represented in {}",
                    state.invalid_chars(),
                    encoded.len(),
                    codec.name()
                );
                if args.show_errors {
                    if let Some(ref invalid) = first_invalid {
                        println!(
                            "  First at position {}: '{}' ({})",
                            invalid.position, invalid.character, invalid.code_point
                        );
                    }
                }
            } else {
                println!("✓ All {} characters fit {}", encoded.len(), codec.name());
            }
        }
    }

    if state.has_invalid() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn table_command(cli: &Cli) -> Result<()> {
    let entries: Vec<TableEntry> = (0x80u8..=0xFF)
        .map(|byte| {
            let character = cp437_codec::decode_char(byte);
            TableEntry {
                byte,
                code_point: format!("U+{:04X}", character as u32),
                character,
            }
        })
        .collect();

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            for row in entries.chunks(8) {
                let line: Vec<String> = row
                    .iter()
                    .map(|entry| format!("{:02X} {} {}", entry.byte, entry.character, entry.code_point))
                    .collect();
                println!("{}", line.join("  "));
            }
        }
    }

    Ok(())
}
