use clap::{Parser, ValueEnum};
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::{Value, json};
use std::fs;

/// A CLI tool to generate synthetic workflow exports for the flowport importer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The platform whose export format to generate
    #[arg(value_enum)]
    platform: PlatformCli,

    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_export.json")]
    output: String,

    /// The number of nodes (modules, nodes or steps) to generate
    #[arg(short, long, default_value_t = 25)]
    nodes: usize,

    /// Probability that a Make module becomes a router, or an n8n node an IF
    #[arg(long, default_value_t = 0.15)]
    branch_probability: f64,

    /// Number of backward n8n connections to add, creating cycles
    #[arg(long, default_value_t = 0)]
    cycles: usize,

    /// Number of zaps to spread Zapier steps over
    #[arg(long, default_value_t = 1)]
    zaps: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlatformCli {
    Make,
    N8n,
    Zapier,
}

const MAKE_ACTIONS: &[&str] = &[
    "google-sheets:addRow",
    "slack:CreateMessage",
    "http:ActionSendData",
    "json:ParseJSON",
    "util:SetVariable2",
    "email:ActionSendEmail",
];

const N8N_ACTIONS: &[&str] = &[
    "n8n-nodes-base.httpRequest",
    "n8n-nodes-base.set",
    "n8n-nodes-base.code",
    "n8n-nodes-base.slack",
    "n8n-nodes-base.googleSheets",
];

const ZAPIER_APPS: &[(&str, &str)] = &[
    ("Gmail", "Send Email"),
    ("Slack", "Send Channel Message"),
    ("Google Sheets", "Create Spreadsheet Row"),
    ("Trello", "Create Card"),
    ("Formatter", "Text"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.branch_probability) {
        eprintln!(
            "Error: --branch-probability ({}) must be between 0 and 1",
            cli.branch_probability
        );
        std::process::exit(1);
    }
    if cli.nodes == 0 {
        eprintln!("Error: --nodes must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating a {:?} export with {} node(s)...",
        cli.platform, cli.nodes
    );

    let export = match cli.platform {
        PlatformCli::Make => generate_make(&mut rng, cli.nodes, cli.branch_probability),
        PlatformCli::N8n => {
            generate_n8n(&mut rng, cli.nodes, cli.branch_probability, cli.cycles)
        }
        PlatformCli::Zapier => generate_zapier(&mut rng, cli.nodes, cli.zaps.max(1)),
    };

    let json_output = serde_json::to_string_pretty(&export)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved the export to '{}'",
        cli.output
    );

    Ok(())
}

/// A Make blueprint: a webhook trigger followed by actions, with some modules
/// turned into routers carrying two short routes.
fn generate_make(rng: &mut ThreadRng, count: usize, branch_probability: f64) -> Value {
    let mut next_id = 1u64;
    let mut remaining = count;
    let mut flow = Vec::new();

    flow.push(make_module(rng, &mut next_id, "gateway:CustomWebHook", 0));
    remaining -= 1;

    let mut column = 1;
    while remaining > 0 {
        if remaining >= 3 && rng.random_bool(branch_probability) {
            let mut router = make_module(rng, &mut next_id, "builtin:BasicRouter", column);
            remaining -= 1;
            let mut routes = Vec::new();
            for _ in 0..2 {
                let length = rng.random_range(1..=remaining.min(3));
                let route_flow: Vec<Value> = (0..length)
                    .map(|step| {
                        let module = MAKE_ACTIONS[rng.random_range(0..MAKE_ACTIONS.len())];
                        make_module(rng, &mut next_id, module, column + step + 1)
                    })
                    .collect();
                remaining -= length;
                routes.push(json!({ "flow": route_flow }));
                if remaining == 0 {
                    break;
                }
            }
            router["routes"] = Value::Array(routes);
            flow.push(router);
        } else {
            let module = MAKE_ACTIONS[rng.random_range(0..MAKE_ACTIONS.len())];
            flow.push(make_module(rng, &mut next_id, module, column));
            remaining -= 1;
        }
        column += 1;
    }

    println!("-> Generated {} top-level Make module(s).", flow.len());
    json!({
        "name": format!("Generated scenario ({} modules)", count),
        "flow": flow,
        "metadata": { "version": 1 }
    })
}

fn make_module(rng: &mut ThreadRng, next_id: &mut u64, module: &str, column: usize) -> Value {
    let id = *next_id;
    *next_id += 1;
    json!({
        "id": id,
        "module": module,
        "version": 1,
        "parameters": {},
        "mapper": {},
        "metadata": {
            "designer": {
                "x": column as f64 * 300.0,
                "y": rng.random_range(-150.0..150.0f64).round()
            }
        }
    })
}

/// An n8n workflow: a manual trigger followed by a chain, where IF nodes split
/// into a true and a false branch that rejoin the chain.
fn generate_n8n(
    rng: &mut ThreadRng,
    count: usize,
    branch_probability: f64,
    cycles: usize,
) -> Value {
    let mut nodes = Vec::with_capacity(count);
    let mut connections = serde_json::Map::new();

    nodes.push(n8n_node("Start", "n8n-nodes-base.manualTrigger", 0, 0.0));
    let mut previous = vec!["Start".to_string()];

    for index in 1..count {
        let is_if = rng.random_bool(branch_probability);
        let (name, node_type) = if is_if {
            (format!("IF {}", index), "n8n-nodes-base.if")
        } else {
            let node_type = N8N_ACTIONS[rng.random_range(0..N8N_ACTIONS.len())];
            let short = node_type.rsplit('.').next().unwrap_or(node_type);
            (format!("{} {}", short, index), node_type)
        };
        let y = rng.random_range(-200.0..200.0f64).round();
        nodes.push(n8n_node(&name, node_type, index, y));

        for source in &previous {
            add_n8n_connection(&mut connections, source, 0, &name);
        }
        previous = vec![name];
    }

    // IF nodes get their false branch wired to the node after next, when there is one.
    let names: Vec<String> = nodes
        .iter()
        .filter_map(|n| n["name"].as_str().map(str::to_string))
        .collect();
    for (i, name) in names.iter().enumerate() {
        if name.starts_with("IF ") && i + 2 < names.len() {
            add_n8n_connection(&mut connections, name, 1, &names[i + 2]);
        }
    }

    for _ in 0..cycles.min(names.len().saturating_sub(1)) {
        let from = rng.random_range(1..names.len());
        let to = rng.random_range(0..from);
        add_n8n_connection(&mut connections, &names[from], 0, &names[to]);
    }

    println!(
        "-> Generated {} n8n node(s) with {} backward connection(s).",
        nodes.len(),
        cycles
    );
    json!({
        "name": format!("Generated workflow ({} nodes)", count),
        "nodes": nodes,
        "connections": connections,
        "settings": {},
        "active": false
    })
}

fn n8n_node(name: &str, node_type: &str, index: usize, y: f64) -> Value {
    json!({
        "id": format!("node-{}", index),
        "name": name,
        "type": node_type,
        "typeVersion": 1,
        "position": [index as f64 * 250.0, y],
        "parameters": {}
    })
}

fn add_n8n_connection(
    connections: &mut serde_json::Map<String, Value>,
    source: &str,
    output: usize,
    target: &str,
) {
    let entry = connections
        .entry(source.to_string())
        .or_insert_with(|| json!({ "main": [] }));
    let Some(outputs) = entry["main"].as_array_mut() else {
        return;
    };
    while outputs.len() <= output {
        outputs.push(json!([]));
    }
    if let Some(targets) = outputs[output].as_array_mut() {
        targets.push(json!({ "node": target, "type": "main", "index": 0 }));
    }
}

/// A Zapier export: steps spread over `zaps`, each starting with a trigger,
/// with the occasional filter. Positions are shuffled within each zap.
fn generate_zapier(rng: &mut ThreadRng, count: usize, zaps: usize) -> Value {
    let per_zap = count.div_ceil(zaps);
    let mut next_id = 1u64;
    let mut generated = Vec::new();

    for zap_index in 0..zaps {
        let size = per_zap.min(count.saturating_sub(zap_index * per_zap));
        if size == 0 {
            break;
        }
        let mut positions: Vec<usize> = (0..size).collect();
        // Keep the trigger first; shuffle only the positions the rest are exported with.
        for i in (2..size).rev() {
            let j = rng.random_range(1..=i);
            positions.swap(i, j);
        }

        let steps: Vec<Value> = (0..size)
            .map(|i| {
                let id = next_id;
                next_id += 1;
                let position = positions[i];
                if position == 0 {
                    json!({
                        "id": id,
                        "type": "trigger",
                        "app": "Webhooks by Zapier",
                        "action": "Catch Hook",
                        "position": 0
                    })
                } else if rng.random_bool(0.1) {
                    json!({
                        "id": id,
                        "type": "filter",
                        "title": "Only continue if...",
                        "position": position
                    })
                } else {
                    let (app, action) = ZAPIER_APPS[rng.random_range(0..ZAPIER_APPS.len())];
                    json!({
                        "id": id,
                        "type": "action",
                        "app": app,
                        "action": action,
                        "position": position
                    })
                }
            })
            .collect();

        generated.push(json!({
            "name": format!("Generated zap {}", zap_index + 1),
            "steps": steps
        }));
    }

    println!("-> Generated {} zap(s).", generated.len());
    json!({ "zaps": generated })
}
