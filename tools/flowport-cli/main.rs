use clap::Parser;
use flowport::guard;
use flowport::prelude::*;
use std::fs;
use std::time::Instant;

/// Imports a Make, n8n or Zapier workflow export into a canonical, laid-out graph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow export JSON file
    input: String,

    /// Optional path to an import configuration JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Write the canonical graph to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Pretty-print the canonical graph
    #[arg(short, long)]
    pretty: bool,

    /// Only detect the platform and print it
    #[arg(long)]
    detect_only: bool,

    /// Print the import summary without the canonical graph
    #[arg(short, long)]
    summary_only: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let cli = Cli::parse();

    let total_start = Instant::now();

    // --- 1. Configuration ---
    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_message(&format!("Failed to read config file '{}': {}", path, e))
            });
            ImportConfig::from_json(&text).unwrap_or_else(|e| {
                exit_with_message(&format!("Invalid config file '{}': {}", path, e))
            })
        }
        None => ImportConfig::default(),
    };
    let importer = Importer::new(config);

    // --- 2. File Loading ---
    let load_start = Instant::now();
    let size = fs::metadata(&cli.input)
        .map(|m| usize::try_from(m.len()).unwrap_or(usize::MAX))
        .unwrap_or_else(|e| {
            exit_with_message(&format!("Failed to read export file '{}': {}", cli.input, e))
        });
    // Reject oversized files before reading them into memory.
    guard::check_size(size, importer.config().max_payload_bytes)
        .unwrap_or_else(|e| exit_with_error(&e));
    let bytes = fs::read(&cli.input).unwrap_or_else(|e| {
        exit_with_message(&format!("Failed to read export file '{}': {}", cli.input, e))
    });
    let load_duration = load_start.elapsed();

    if cli.detect_only {
        let root = guard::parse_bytes(&bytes, importer.config().max_payload_bytes)
            .unwrap_or_else(|e| exit_with_error(&e));
        match detect(&root, importer.config()) {
            Some(platform) => println!("{}", platform.as_str()),
            None => exit_with_error(&ImportError::UnsupportedPlatform),
        }
        return;
    }

    // --- 3. Import ---
    let import_start = Instant::now();
    let root = guard::parse_bytes(&bytes, importer.config().max_payload_bytes)
        .unwrap_or_else(|e| exit_with_error(&e));
    let (result, summary) = importer
        .import_with_summary(&root)
        .unwrap_or_else(|e| exit_with_error(&e));
    let import_duration = import_start.elapsed();

    // --- 4. Output ---
    if !cli.summary_only {
        let rendered = if cli.pretty {
            serde_json::to_string_pretty(&result)
        } else {
            serde_json::to_string(&result)
        }
        .unwrap_or_else(|e| exit_with_message(&format!("Failed to serialize result: {}", e)));

        match &cli.output {
            Some(path) => fs::write(path, rendered).unwrap_or_else(|e| {
                exit_with_message(&format!("Failed to write output file '{}': {}", path, e))
            }),
            None => println!("{}", rendered),
        }
    }

    // Summary on stderr; stdout carries only the graph.
    let total_duration = total_start.elapsed();
    let metadata = &result.metadata;
    eprintln!("\n--- Import Summary ---");
    eprintln!("Platform:             {}", metadata.platform);
    eprintln!("Workflow:             {}", metadata.original_name);
    eprintln!(
        "Nodes:                {} ({} trigger, {} decision, {} action)",
        metadata.node_count,
        result.count_role(NodeRole::Trigger),
        result.count_role(NodeRole::Decision),
        result.count_role(NodeRole::Action)
    );
    eprintln!("Edges:                {}", result.edges.len());
    eprintln!(
        "Estimated Duration:   {} min",
        metadata.estimated_duration_minutes
    );
    eprintln!(
        "Components:           {} ({} laid out, {} sequential)",
        summary.components, summary.laid_out, summary.fallbacks
    );

    eprintln!("\n--- Performance Summary ---");
    eprintln!("File Loading:         {:?}", load_duration);
    eprintln!("Import:               {:?}", import_duration);
    eprintln!("-----------------------------");
    eprintln!("Total Execution:      {:?}", total_duration);
    eprintln!();
}

fn exit_with_error(error: &ImportError) -> ! {
    let report = serde_json::to_string_pretty(&error.to_report())
        .unwrap_or_else(|_| error.to_string());
    eprintln!("\nError [{}]: {}", error.code(), error);
    println!("{}", report);
    std::process::exit(1);
}

fn exit_with_message(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
