//! Binary entry point for the graph inspector.
#![forbid(unsafe_code)]

mod config;
mod ui;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use odgi_ffi::ffi::{
    as_handle_t, version, GraphRef, EDGE_HANDLE_I_SIZE, HANDLE_I_SIZE, LONG_LONG_SIZE,
    NO_PATH, STEP_HANDLE_I_SIZE, TEST_UINT128,
};
use odgi_ffi::logging::init_logging;
use odgi_ffi::storage::{GraphStats, LoadOptions};
use odgi_ffi::types::GraphError;

use config::{CliConfig, ConfigError};
use ui::Ui;

#[derive(Parser, Debug)]
#[command(
    name = "odgi-inspect",
    version,
    about = "Inspect a variation graph through its handle interface",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "ODGI_INSPECT_CONFIG",
        help = "Config file (defaults to the user config directory)"
    )]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        value_name = "GFA",
        help = "Graph file; falls back to default_graph from the config"
    )]
    graph: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        help = "Output format for structured responses [default: text]"
    )]
    format: Option<OutputFormat>,

    #[arg(long, global = true, value_name = "FILTER", help = "Log filter, e.g. info or odgi_ffi=debug")]
    log_level: Option<String>,

    #[arg(long, global = true, help = "Reject unsupported GFA records")]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Summary counters of the graph")]
    Stats,

    #[command(about = "List embedded paths with their step counts")]
    Paths,

    #[command(about = "Walk the steps of one path")]
    Walk(WalkCmd),

    #[command(about = "Show one node with its neighbors")]
    Node(NodeCmd),

    #[command(about = "Report boundary integer widths")]
    Abi,

    #[command(about = "Print a shell completion script")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct WalkCmd {
    #[arg(value_name = "PATH")]
    path: String,

    #[arg(long, value_name = "N", help = "Stop after N steps")]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct NodeCmd {
    #[arg(value_name = "ID")]
    id: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no graph given; pass --graph or set default_graph in the config")]
    NoGraph,
    #[error("path '{0}' not found")]
    UnknownPath(String),
    #[error("node {0} not found")]
    UnknownNode(u64),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    if let Command::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "odgi-inspect", &mut io::stdout());
        return Ok(());
    }

    let config = CliConfig::load(cli.config.clone())?;
    init_logging(cli.log_level.as_deref().or(config.log_level()))?;
    debug!(config = ?config.path(), "resolved config");
    let format = cli.format.or(config.format()).unwrap_or(OutputFormat::Text);
    let ui = Ui::detect();

    if let Command::Abi = cli.command {
        let report = AbiReport::current();
        return emit(format, &report, || print_abi_text(&ui, &report));
    }

    let graph_path = cli
        .graph
        .clone()
        .or_else(|| config.default_graph().map(PathBuf::from))
        .ok_or(CliError::NoGraph)?;
    let opts = LoadOptions::new()
        .strict(cli.strict || config.strict().unwrap_or(false))
        .infer_path_edges(config.infer_path_edges().unwrap_or(true));
    let graph = GraphRef::load_with(&graph_path, &opts)?;

    match cli.command {
        Command::Stats => {
            let report = StatsReport {
                graph: graph_path.display().to_string(),
                version: version(),
                stats: graph.graph().stats(),
            };
            emit(format, &report, || print_stats_text(&ui, &report))
        }
        Command::Paths => {
            let report = paths_report(&graph);
            emit(format, &report, || print_paths_text(&ui, &report))
        }
        Command::Walk(cmd) => {
            let report = walk_report(&graph, &cmd)?;
            emit(format, &report, || print_walk_text(&ui, &report))
        }
        Command::Node(cmd) => {
            let report = node_report(&graph, cmd.id)?;
            emit(format, &report, || print_node_text(&ui, &report))
        }
        Command::Abi | Command::Completions { .. } => Ok(()),
    }
}

fn emit<T, F>(format: OutputFormat, value: &T, printer: F) -> Result<(), CliError>
where
    T: Serialize,
    F: Fn(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}

// ===== Reports =====

#[derive(Serialize)]
struct StatsReport {
    graph: String,
    version: &'static str,
    #[serde(flatten)]
    stats: GraphStats,
}

#[derive(Serialize)]
struct PathReport {
    name: String,
    handle: u64,
    steps: usize,
}

#[derive(Serialize)]
struct StepReport {
    node_id: u64,
    is_reverse: bool,
    rank: i64,
}

#[derive(Serialize)]
struct WalkReport {
    path: String,
    total_steps: usize,
    steps: Vec<StepReport>,
    truncated: bool,
}

#[derive(Serialize)]
struct NodeReport {
    id: u64,
    length: usize,
    sequence: String,
    step_count: usize,
    left: Vec<String>,
    right: Vec<String>,
}

#[derive(Serialize)]
struct AbiReport {
    long_long_size: usize,
    handle_i_size: usize,
    edge_handle_i_size: usize,
    step_handle_i_size: usize,
    test_uint128: String,
    ok: bool,
}

impl AbiReport {
    fn current() -> Self {
        Self {
            long_long_size: LONG_LONG_SIZE,
            handle_i_size: HANDLE_I_SIZE,
            edge_handle_i_size: EDGE_HANDLE_I_SIZE,
            step_handle_i_size: STEP_HANDLE_I_SIZE,
            test_uint128: format!("{TEST_UINT128:#034x}"),
            ok: (LONG_LONG_SIZE, HANDLE_I_SIZE, EDGE_HANDLE_I_SIZE, STEP_HANDLE_I_SIZE)
                == (8, 8, 16, 16),
        }
    }
}

fn paths_report(graph: &GraphRef) -> Vec<PathReport> {
    graph
        .path_handles()
        .map(|p| PathReport {
            name: graph.path_name(p).unwrap_or_default().to_string(),
            handle: p,
            steps: graph.path_step_count(p),
        })
        .collect()
}

fn walk_report(graph: &GraphRef, cmd: &WalkCmd) -> Result<WalkReport, CliError> {
    let path = graph.path_handle(&cmd.path);
    if path == NO_PATH {
        return Err(CliError::UnknownPath(cmd.path.clone()));
    }
    let limit = cmd.limit.unwrap_or(usize::MAX);
    let end = graph.path_end(path);
    let mut step = graph.path_begin(path);
    let mut steps = Vec::new();
    while !graph.step_eq(step, end) && steps.len() < limit {
        let handle = graph.handle_of_step(step);
        steps.push(StepReport {
            node_id: graph.id(handle),
            is_reverse: graph.is_reverse(handle),
            rank: graph.step_rank(step),
        });
        step = graph.next_step(step);
    }
    Ok(WalkReport {
        path: cmd.path.clone(),
        total_steps: graph.path_step_count(path),
        truncated: !graph.step_eq(step, end),
        steps,
    })
}

fn node_report(graph: &GraphRef, id: u64) -> Result<NodeReport, CliError> {
    if !graph.has_node(id) {
        return Err(CliError::UnknownNode(id));
    }
    let handle = graph.handle(id, false);
    let sequence = graph
        .sequence(handle)
        .map(|seq| String::from_utf8_lossy(&seq).into_owned())
        .unwrap_or_default();
    let side = |go_left: bool| -> Vec<String> {
        graph
            .neighbors(handle, go_left)
            .map(|h| as_handle_t(h).to_string())
            .collect()
    };
    Ok(NodeReport {
        id,
        length: graph.length(handle),
        sequence,
        step_count: graph.step_count(handle),
        left: side(true),
        right: side(false),
    })
}

// ===== Text output =====

fn print_stats_text(ui: &Ui, report: &StatsReport) {
    let s = &report.stats;
    ui.fields(
        "Graph",
        [
            ("file", report.graph.clone()),
            ("version", report.version.to_string()),
        ],
    );
    ui.fields(
        "Counts",
        [
            ("nodes", s.nodes),
            ("edges", s.edges),
            ("paths", s.paths),
            ("steps", s.steps),
            ("min_node_id", s.min_node_id as usize),
            ("max_node_id", s.max_node_id as usize),
            ("total_length", s.total_length),
        ],
    );
}

fn print_paths_text(ui: &Ui, report: &[PathReport]) {
    ui.numbered(
        "Paths",
        report
            .iter()
            .map(|p| format!("{} ({} steps)", p.name, p.steps)),
    );
}

fn print_walk_text(ui: &Ui, report: &WalkReport) {
    ui.numbered(
        &format!("Path {} ({} steps)", report.path, report.total_steps),
        report
            .steps
            .iter()
            .map(|s| format!("{}  rank {}", ui.handle(s.node_id, s.is_reverse), s.rank)),
    );
    if report.truncated {
        ui.note(&format!(
            "output truncated after {} of {} steps",
            report.steps.len(),
            report.total_steps
        ));
    }
}

fn print_node_text(ui: &Ui, report: &NodeReport) {
    ui.fields(
        &format!("Node {}", report.id),
        [
            ("length", report.length.to_string()),
            ("sequence", report.sequence.clone()),
            ("steps", report.step_count.to_string()),
            ("left", report.left.join(", ")),
            ("right", report.right.join(", ")),
        ],
    );
}

fn print_abi_text(ui: &Ui, report: &AbiReport) {
    ui.fields(
        "Boundary widths",
        [
            ("long long", report.long_long_size.to_string()),
            ("handle_i", report.handle_i_size.to_string()),
            ("edge_handle_i", report.edge_handle_i_size.to_string()),
            ("step_handle_i", report.step_handle_i_size.to_string()),
            ("test_uint128", report.test_uint128.clone()),
        ],
    );
    if !report.ok {
        ui.note("boundary widths differ from 8/8/16/16");
    }
}
