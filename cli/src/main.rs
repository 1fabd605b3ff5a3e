//! concierge binary: run a configured graph, list graphs or tools, or start the dev server.

mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cli::{build_registry, format_tools, list_tools, load_graphs_config, run_turn, Setup, Turn};
use repl::run_repl_loop;

#[derive(Parser, Debug)]
#[command(name = "concierge")]
#[command(about = "Run tool-calling agents and a supervisor over sub-agents")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Graph config file (default: ./concierge.json when present, else built-in graphs)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Load the demo database from a local SQL script instead of downloading it
    /// (env CHINOOK_SQL_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    chinook_sql: Option<PathBuf>,

    /// Log graph progress at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one turn of a graph and print the reply
    Run(RunArgs),
    /// List configured graphs
    Graphs,
    /// List the tools a graph's top-level model can call
    Tools {
        /// Graph name from the config
        graph: String,
        /// Print tool specs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve every configured graph over HTTP
    Serve {
        /// Listen address (default 127.0.0.1:2024)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Graph name from the config
    graph: String,

    /// User message (or pass it as trailing words)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Thread ID for conversation continuity
    #[arg(long, value_name = "ID")]
    thread_id: Option<String>,

    /// Customer id to verify against the demo database instead of asking
    #[arg(long, value_name = "ID")]
    customer_id: Option<String>,

    /// Keep reading messages from stdin after the first reply
    #[arg(short, long)]
    interactive: bool,
}

impl RunArgs {
    fn message(&self) -> Option<String> {
        self.message.clone().or_else(|| {
            (!self.rest.is_empty()).then(|| self.rest.join(" "))
        })
    }
}

fn generate_repl_thread_id() -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("thread-repl-{}", millis)
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let setup = Setup {
        config: args.config,
        chinook_sql: args.chinook_sql,
    };
    let graphs = load_graphs_config(&setup)?;

    if let Command::Graphs = args.cmd {
        for (name, builder) in &graphs.graphs {
            println!("{}\t{}", name, builder.as_str());
        }
        return Ok(());
    }

    let registry = build_registry(&graphs, &setup, cli::llm_factory_from_env()).await?;

    match args.cmd {
        Command::Graphs => {}
        Command::Tools { graph, json } => {
            let tools = list_tools(&registry, &graph).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tools)?);
            } else {
                println!("{}", format_tools(&tools));
            }
        }
        Command::Serve { addr } => {
            serve::run_serve(addr.as_deref(), Arc::new(registry))
                .await
                .map_err(|e| e.to_string())?;
        }
        Command::Run(run_args) => {
            let message = run_args.message();
            if !run_args.interactive && message.is_none() {
                return Err("provide a message via -m/--message or trailing words".into());
            }
            let mut turn = Turn {
                graph: run_args.graph,
                message: message.unwrap_or_default(),
                thread_id: run_args.thread_id,
                customer_id: run_args.customer_id,
            };
            if run_args.interactive && turn.thread_id.is_none() {
                turn.thread_id = Some(generate_repl_thread_id());
            }
            if !turn.message.trim().is_empty() {
                println!("{}", run_turn(&registry, &turn).await?);
            }
            if run_args.interactive {
                run_repl_loop(&registry, &turn).await?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let env = cli::load_env();
    if let Err(e) = cli::logging::init(args.verbose) {
        eprintln!("concierge: logging: {}", e);
    }
    match env {
        Ok(applied) => tracing::debug!(keys = applied.keys.len(), "environment loaded"),
        Err(e) => {
            eprintln!("concierge: {}", e);
            std::process::exit(1);
        }
    }
    if let Err(e) = run(args).await {
        eprintln!("concierge: {}", e);
        std::process::exit(1);
    }
}
