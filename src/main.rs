//! # rapport
//!
//! Analyze chat exports from Messenger, Instagram, WhatsApp, and Telegram
//! into a quantitative communication profile.
//!
//! ## Usage
//! ```bash
//! rapport <input_files...> [-o report.json] [--platform wa] [--pretty]
//! rapport message_1.json message_2.json -o report.json
//! rapport chat.txt --platform wa --pretty
//! ```

use std::path::Path;
use std::process;

use clap::Parser;

use rapport::cli::Args;
use rapport::engine::analyze_files;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !args.quiet {
        eprintln!("📊 rapport v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        for input in &args.inputs {
            eprintln!("📂 Input:   {}", input);
        }
        if let Some(platform) = args.platform {
            eprintln!("📖 Platform: {} (forced)", platform);
        }
    }

    let paths: Vec<&Path> = args.inputs.iter().map(Path::new).collect();
    let report = analyze_files(&paths, args.platform)?;

    if !args.quiet {
        eprintln!(
            "✅ Parsed {} messages from {} participants over {} days",
            report.conversation.metadata.total_messages,
            report.conversation.participants.len(),
            report.conversation.metadata.duration_days
        );
        for warning in &report.conversation.warnings {
            eprintln!("⚠️  {:?}", warning);
        }
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            if !args.quiet {
                eprintln!("💾 Report written to {}", path);
            }
        }
        None => println!("{json}"),
    }

    Ok(())
}
