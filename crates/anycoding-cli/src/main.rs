//! `anycoding` CLI: read, write and compare JSON documents by path.
//!
//! ## Usage
//!
//! ```sh
//! # Read the last item (stdin → stdout)
//! echo '{"items":[null,1,2]}' | anycoding get items.-1
//!
//! # Write a JSON literal at a path, padding sequences with null
//! anycoding set items.10 9 -i doc.json -o doc.json
//!
//! # Refuse to replace existing data of the wrong kind
//! anycoding set name.first '"Ada"' --strict -i doc.json
//!
//! # Structural comparison (exit status 0 when equal, 1 when different)
//! anycoding eq left.json right.json
//! ```
//!
//! Paths use dot syntax; segments that parse as integers address sequence
//! slots, and negative integers count from the end.

use anycoding::{Path, Value};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(
    name = "anycoding",
    version,
    about = "Read, write and compare JSON documents by path"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a path
    Get {
        /// Dot path, e.g. `items.-1.name`
        #[arg(allow_hyphen_values = true)]
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Write a JSON literal at a path and print the document
    Set {
        /// Dot path, e.g. `items.3`
        #[arg(allow_hyphen_values = true)]
        path: String,
        /// JSON literal to write, e.g. `42`, `"text"`, `{"a":1}`
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Fail instead of replacing a node of the wrong kind
        #[arg(long)]
        strict: bool,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Compare two JSON files structurally
    Eq {
        /// First JSON file
        left: String,
        /// Second JSON file
        right: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            path,
            input,
            pretty,
        } => {
            let doc = read_document(input.as_deref())?;
            let found = doc
                .get(Path::parse(&path))
                .with_context(|| format!("Failed to read path '{}'", path))?;
            write_output(None, &render(found, pretty)?)?;
        }
        Commands::Set {
            path,
            value,
            input,
            output,
            strict,
            pretty,
        } => {
            let mut doc = read_document(input.as_deref())?;
            let literal = Value::from_json_str(&value)
                .with_context(|| format!("Invalid JSON literal: {}", value))?;
            let target = Path::parse(&path);
            if strict {
                doc.try_set(&target, literal)
                    .with_context(|| format!("Failed to write path '{}'", path))?;
            } else {
                doc.set(&target, literal);
            }
            write_output(output.as_deref(), &render(&doc, pretty)?)?;
        }
        Commands::Eq { left, right } => {
            let left_doc = read_document(Some(&left))?;
            let right_doc = read_document(Some(&right))?;
            if left_doc == right_doc {
                println!("equal");
            } else {
                println!("different");
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn render(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        value.to_json_pretty()
    } else {
        value.to_json_string()
    };
    text.context("Failed to print JSON")
}

fn read_document(path: Option<&str>) -> Result<Value> {
    let text = read_input(path)?;
    Value::from_json_str(&text).with_context(|| match path {
        Some(path) => format!("Failed to parse JSON from {}", path),
        None => "Failed to parse JSON from stdin".to_string(),
    })
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
            std::fs::write(path, format!("{}\n", content))
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
