// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Rpccodec CLI
//!
//! Command-line tool for inspecting and producing wire messages.
//!
//! ## Usage
//!
//! ```sh
//! # Decode a hex dump into a readable message
//! rpccodec inspect capture.hex
//!
//! # Decode with registered type descriptors instead of dynamic records
//! rpccodec inspect capture.hex --types types.json
//!
//! # Encode a JSON message description to hex
//! rpccodec encode message.json
//! ```

use std::fs;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rpccodec::{
    DynamicMutator, Message, MutatorRegistry, RecordDescriptor, Value, WireCodec,
};

/// Rpccodec - wire message toolkit
///
/// Decode captured message buffers and encode message descriptions through
/// the same codec the server embeds.
#[derive(Parser, Clone)]
#[command(name = "rpccodec")]
#[command(about = "Inspect and produce self-describing RPC wire messages", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Decode a hex-encoded message buffer and print it
    Inspect {
        /// File holding the hex dump (whitespace is ignored)
        input: String,

        /// JSON file with record descriptors to register before decoding
        #[arg(long)]
        types: Option<String>,

        /// Print the full message as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Encode a JSON message description and print the hex bytes
    Encode {
        /// File holding the message as JSON
        input: String,
    },
}

fn build_codec(types: Option<&str>) -> Result<WireCodec> {
    let mut registry = MutatorRegistry::new();
    match types {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read descriptor file {path}"))?;
            let descriptors: Vec<RecordDescriptor> =
                serde_json::from_str(&raw).context("failed to parse descriptor file")?;
            for descriptor in descriptors {
                registry.descriptors().register(descriptor)?;
            }
        }
        None => {
            // Without descriptors, decode every record generically
            registry.register_mutator(Arc::new(DynamicMutator));
        }
    }
    Ok(WireCodec::new(Arc::new(registry)))
}

fn read_hex(path: &str) -> Result<Vec<u8>> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).context("input is not valid hex")
}

/// Rendering depth cut-off; shared records can form cycles.
const MAX_RENDER_DEPTH: usize = 8;

fn render_value(message: &Message, value: &Value, depth: usize) -> String {
    if depth >= MAX_RENDER_DEPTH {
        return "...".to_string();
    }
    match value {
        Value::Record(_) => match message.record(value) {
            Some(record) => {
                let fields: Vec<String> = record
                    .iter()
                    .map(|(name, v)| format!("{name}: {}", render_value(message, v, depth + 1)))
                    .collect();
                format!("{} {{ {} }}", record.type_name, fields.join(", "))
            }
            None => "record#?".to_string(),
        },
        Value::Array(items) | Value::List(items) | Value::Set(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|v| render_value(message, v, depth + 1))
                .collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Map(entries) => {
            let rendered: Vec<String> = entries
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{} => {}",
                        render_value(message, k, depth + 1),
                        render_value(message, v, depth + 1)
                    )
                })
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
        other => other.to_string(),
    }
}

fn inspect(input: &str, types: Option<&str>, json: bool) -> Result<()> {
    let data = read_hex(input)?;
    let codec = build_codec(types)?;
    let message = codec
        .decode(&data)
        .context("buffer does not decode as a wire message")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&message)?);
        return Ok(());
    }

    println!("kind:     {:?}", message.kind);
    println!("version:  {}", message.protocol_version);
    println!("method:   {}", message.method);
    if let Some(callback) = &message.callback {
        println!("callback: {callback}");
    }
    println!("args:     {}", message.arguments.len());
    for (index, argument) in message.arguments.iter().enumerate() {
        println!("  [{index}] {}", render_value(&message, argument, 0));
    }
    Ok(())
}

fn encode(input: &str) -> Result<()> {
    let raw = fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?;
    let message: Message = serde_json::from_str(&raw).context("failed to parse message JSON")?;
    let codec = WireCodec::default();
    let data = codec.encode(&message)?;
    println!("{}", hex::encode(data));
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { input, types, json } => inspect(&input, types.as_deref(), json),
        Commands::Encode { input } => encode(&input),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
