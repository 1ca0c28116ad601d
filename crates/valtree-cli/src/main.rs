//! `valtree` CLI: reformat, validate and query JSON documents with the
//! order-preserving value-tree codec.
//!
//! ## Usage
//!
//! ```sh
//! # Compact a document, keeping field order (stdin → stdout)
//! echo '{ "b": 1, "a": 2 }' | valtree format
//!
//! # Reformat a file against a schema, writing to another file
//! valtree format -i data.json -o out.json --schema schema.json
//!
//! # Mark part of the schema optional
//! valtree format -i data.json --schema schema.json --optional user.address
//!
//! # Validate a document against a schema
//! valtree validate -i data.json --schema schema.json
//!
//! # Print the node at a dotted path
//! valtree get --path user.name -i data.json
//!
//! # Debug logging
//! VALTREE_LOG=debug valtree format -i data.json
//! ```
//!
//! A schema file is an example document: its shape and leaf types form the
//! schema, and a single-element list acts as the template for every element.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Read};
use tracing::debug;
use valtree_core::{Charset, CodecOptions, Value};

#[derive(Parser)]
#[command(
    name = "valtree",
    version,
    about = "Order-preserving JSON value trees with schema matching"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace); overrides VALTREE_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Deserialize and re-serialize a document, preserving field order
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Example document used as the schema
        #[arg(long)]
        schema: Option<String>,
        /// Dotted schema path to mark optional (repeatable)
        #[arg(long, requires = "schema")]
        optional: Vec<String>,
        /// Character set every string must be representable in
        #[arg(long, default_value_t = Charset::Utf8)]
        charset: Charset,
    },
    /// Check a document against a schema
    Validate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Example document used as the schema
        #[arg(long)]
        schema: String,
        /// Dotted schema path to mark optional (repeatable)
        #[arg(long)]
        optional: Vec<String>,
    },
    /// Print the node at a dotted dictionary path
    Get {
        /// Dotted path, e.g. `user.address.zip`
        #[arg(long)]
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Format {
            input,
            output,
            schema,
            optional,
            charset,
        } => {
            let text = read_input(input.as_deref())?;
            let schema = schema
                .as_deref()
                .map(|path| load_schema(path, &optional))
                .transpose()?;
            let options = CodecOptions::with_charset(charset);

            let tree = valtree_core::deserialize_with(&text, schema.as_ref(), &options)
                .context("Failed to deserialize document")?;
            let formatted = valtree_core::serialize_with(&tree, &options)
                .context("Failed to serialize document")?;
            write_output(output.as_deref(), &formatted)?;
        }
        Commands::Validate {
            input,
            schema,
            optional,
        } => {
            let text = read_input(input.as_deref())?;
            let schema = load_schema(&schema, &optional)?;
            let tree =
                valtree_core::deserialize(&text, None).context("Failed to deserialize document")?;
            valtree_core::check(&tree, &schema)
                .context("Document does not match the schema")?;
            println!("valid");
        }
        Commands::Get { path, input } => {
            let text = read_input(input.as_deref())?;
            let tree =
                valtree_core::deserialize(&text, None).context("Failed to deserialize document")?;
            let segments = split_path(&path);
            let node = tree
                .find_path(&segments)
                .with_context(|| format!("No value at path: '{}'", path))?;
            let rendered =
                valtree_core::serialize(node).context("Failed to serialize value")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Install a stderr `fmt` subscriber. `-v` flags win over `VALTREE_LOG`,
/// which defaults to `warn`.
fn init_logging(verbose: u8) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::try_from_env("VALTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// Load an example document as a schema and mark the `--optional` paths.
///
/// - `--optional user` marks `user` and everything below it optional
/// - `--optional ""` marks the whole schema optional
/// - A path that does not exist in the schema is an error
fn load_schema(path: &str, optional: &[String]) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path))?;
    let mut schema = valtree_core::deserialize(&text, None)
        .with_context(|| format!("Failed to parse schema file: {}", path))?;

    for dotted in optional {
        let segments = split_path(dotted);
        let node = schema
            .find_path_mut(&segments)
            .with_context(|| format!("Unknown schema path for --optional: '{}'", dotted))?;
        node.set_optional(true, true);
        debug!(path = %dotted, "marked schema path optional");
    }
    Ok(schema)
}

fn split_path(dotted: &str) -> Vec<&str> {
    dotted.split('.').filter(|s| !s.is_empty()).collect()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
