//! # chatvault CLI
//!
//! Command-line interface for the chatvault library. Runs one upload against
//! in-memory storage collaborators and prints the summary.

use std::fs::File;
use std::io::BufReader;
use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatvault::cli::Args;
use chatvault::ingest::Ingestor;
use chatvault::store::{MemoryAttachmentStore, MemoryEntryRepository};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(message) = run() {
        eprintln!("❌ Error: {message}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = <Args as ClapParser>::parse();
    let kind = args.source_kind();
    let limits = args.limits();

    let file = File::open(&args.input).map_err(|e| format!("cannot open {}: {e}", args.input))?;
    let reader = BufReader::new(file);

    let file_name = std::path::Path::new(&args.input)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(&args.input)
        .to_string();

    let mut repo = MemoryEntryRepository::new();
    let mut attachments = MemoryAttachmentStore::new();
    let mut ingestor = Ingestor::with_limits(&mut repo, &mut attachments, limits);

    let summary = ingestor.ingest(&args.owner, &file_name, kind, reader);

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("summary serialization failed: {e}"))?;
        println!("{json}");
    } else {
        println!("📦 chatvault v{}", env!("CARGO_PKG_VERSION"));
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("📂 Input:        {}", args.input);
        println!("📖 Kind:         {}", summary.source_kind);
        println!("🔑 Chat key:     {}", summary.chat_key);
        println!("✉️  Entries:      {}", summary.entry_count);
        println!("📎 Attachments:  {}", summary.attachment_count);
        println!("⏱️  Elapsed:      {}ms", summary.elapsed_millis);
        if !summary.warnings.is_empty() {
            println!();
            println!("⚠️  Warnings:");
            for warning in &summary.warnings {
                println!("   - {warning}");
            }
        }
        println!();
        if summary.success {
            println!("✅ Done!");
        }
    }

    if summary.success {
        Ok(())
    } else {
        Err(summary
            .error_message
            .unwrap_or_else(|| "ingestion failed".to_string()))
    }
}
