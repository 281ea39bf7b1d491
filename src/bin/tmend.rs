//! Tablemend CLI - reconcile pasted HTML tables into table deltas

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::Path;
#[cfg(feature = "cli")]
use tablemend::{
    diagnostics::{check_html, format_diagnostics},
    html_to_delta_with_diagnostics, paste_into, ConversionError, ConversionOutput,
    ConversionResult, ConversionWarning, DocumentHost, ReconcileOptions,
};
#[cfg(feature = "cli")]
use tracing::debug;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tmend")]
#[command(version)]
#[command(about = "Tablemend - reconcile pasted HTML tables into table deltas", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input HTML file (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Options file (.json, or .toml/.yaml with the data-loading feature)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Pretty print the delta JSON
    #[arg(short, long, global = true)]
    pretty: bool,

    /// Strict mode: exit with error if any repair warnings occur
    #[arg(long, global = true)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert HTML to a delta (default action)
    Convert {
        /// Input file path
        input: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Convert HTML as if pasted at a caret inside a document
    Paste {
        /// HTML document receiving the paste
        #[arg(short, long)]
        document: String,

        /// Caret offset in the document's text
        #[arg(long)]
        caret: usize,

        /// Pasted HTML file
        input: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Report the table repairs HTML would need, without converting
    Check {
        /// Input file to check
        input: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> ConversionResult<()> {
    let options = match cli.config {
        Some(ref path) => load_options(path)?,
        None => ReconcileOptions::default(),
    };
    let flags = OutputFlags {
        pretty: cli.pretty,
        strict: cli.strict,
        quiet: cli.quiet,
    };

    match cli.command {
        None => {
            let html = read_input(cli.input_file.as_deref())?;
            let output = html_to_delta_with_diagnostics(&html, &options);
            emit(output, cli.output.as_deref(), &flags)
        }
        Some(Commands::Convert { input, output }) => {
            let html = read_input(input.as_deref())?;
            let result = html_to_delta_with_diagnostics(&html, &options);
            emit(result, output.as_deref(), &flags)
        }
        Some(Commands::Paste {
            document,
            caret,
            input,
            output,
        }) => {
            let doc = fs::read_to_string(&document)?;
            let host = DocumentHost::parse(&doc, options).with_caret(caret);
            let html = read_input(input.as_deref())?;
            let result = paste_into(&host, &html);
            emit(result, output.as_deref(), &flags)
        }
        Some(Commands::Check { input, no_color }) => {
            let html = read_input(input.as_deref())?;
            let result = check_html(&html);
            println!("{}", format_diagnostics(&result, !no_color));

            if result.has_errors() || (cli.strict && result.warnings > 0) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Info) => {
            print_info();
            Ok(())
        }
    }
}

#[cfg(feature = "cli")]
struct OutputFlags {
    pretty: bool,
    strict: bool,
    quiet: bool,
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> ConversionResult<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn load_options(path: &str) -> ConversionResult<ReconcileOptions> {
    let content = fs::read_to_string(path)?;
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("json");
    debug!(path, ext, "loading options");

    match ext {
        "json" => ReconcileOptions::from_json_str(&content),
        #[cfg(feature = "data-loading")]
        "toml" => ReconcileOptions::from_toml_str(&content),
        #[cfg(feature = "data-loading")]
        "yaml" | "yml" => ReconcileOptions::from_yaml_str(&content),
        other => Err(ConversionError::invalid(format!(
            "unsupported options format '.{}'",
            other
        ))),
    }
}

#[cfg(feature = "cli")]
fn emit(output: ConversionOutput, path: Option<&str>, flags: &OutputFlags) -> ConversionResult<()> {
    // Print warnings to stderr (unless quiet mode)
    if !flags.quiet && output.has_warnings() {
        print_warnings_to_stderr(&output.warnings);
    }

    // Check strict mode
    if flags.strict && output.has_warnings() {
        eprintln!(
            "Error: {} repair warning(s) in strict mode",
            output.warnings.len()
        );
        std::process::exit(1);
    }

    let json = if flags.pretty {
        serde_json::to_string_pretty(&output.delta)?
    } else {
        serde_json::to_string(&output.delta)?
    };

    match path {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            writeln!(file, "{}", json)?;
            if output.has_warnings() {
                eprintln!(
                    "⚠ Delta written to: {} ({} warning(s))",
                    path,
                    output.warnings.len()
                );
            } else {
                eprintln!("✓ Delta written to: {}", path);
            }
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_warnings_to_stderr(warnings: &[ConversionWarning]) {
    eprintln!();
    eprintln!("Repair Warnings ({}):", warnings.len());
    eprintln!();
    for warning in warnings {
        eprintln!("  {}", warning);
    }
    eprintln!();
}

#[cfg(feature = "cli")]
fn print_info() {
    println!("Tablemend - reconcile pasted HTML tables into table deltas");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Features:");
    println!("  ✓ Cell lines tagged with row, cell, spans and cell style");
    println!("  ✓ Missing column markers synthesized from the first row");
    println!("  ✓ Nested tables moved after their parent table");
    println!("  ✓ Paste into a table cell");
    println!("  ✓ Table diagnostics and checking");
    println!(
        "  {} TOML/YAML options files",
        if cfg!(feature = "data-loading") {
            "✓"
        } else {
            "✗"
        }
    );
    println!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install tablemend --features cli");
    eprintln!("  tmend [OPTIONS] [INPUT_FILE]");
}
