//! jscallgraph CLI
//!
//! Builds a call graph for a JavaScript program already lowered to the JSON IR and writes
//! one tab-separated line per edge.
//!
//! # Usage
//!
//! ```bash
//! # 0-1-CFA with the default two-hour timeout
//! cargo run --bin jscallgraph --release -- --scripts app.ir.json -o callgraph.tsv
//!
//! # 1-CFA, at most 50k nodes, IR instruction names instead of source positions
//! cargo run --bin jscallgraph --release -- --scripts app.ir.json -o cg.tsv \
//!     --cgalgo one-cfa --max-number-of-nodes 50000 --no-source-numbers
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use jscallgraph_core::config::{
    AnalysisOptions, CallGraphAlgorithm, ConfigError, ConfigFileV1, ConfigResult, InstanceKeyMode,
    ReflectionMode,
};
use jscallgraph_core::features::driver::{write_dot, AnalysisDriver, EdgeListWriter, OutputOptions};
use jscallgraph_core::features::program::JsonProgramLoader;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jscallgraph")]
#[command(about = "Context-sensitive call graph construction for JavaScript IR", long_about = None)]
struct Cli {
    /// JSON IR document of the program to analyze
    #[arg(long)]
    scripts: PathBuf,

    /// Where to write the edge listing
    #[arg(short = 'o', long = "cgoutput")]
    cg_output: PathBuf,

    /// YAML configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Computed property access handling: none, string-only, full
    #[arg(long = "reflection-setting")]
    reflection_setting: Option<ReflectionMode>,

    /// Wall-clock budget in milliseconds
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Print call instructions as IR (JSCall@pc) instead of file:line:column
    #[arg(long)]
    no_source_numbers: bool,

    /// Rewrite f.call(..) / f.apply(..) into direct dispatch on f
    #[arg(long)]
    handle_call_apply: Option<bool>,

    /// Distinct instance keys per constant value
    #[arg(long)]
    use_constant_specific_keys: bool,

    /// Qualify allocation sites by the allocating node's context
    #[arg(long)]
    context_allocations: bool,

    /// Node ceiling; -1 for unbounded (other negative values are rejected)
    #[arg(long, allow_negative_numbers = true)]
    max_number_of_nodes: Option<i64>,

    /// Call-graph algorithm: zero-cfa, zero-one-cfa, one-cfa
    #[arg(long)]
    cgalgo: Option<CallGraphAlgorithm>,

    /// Also write the call graph in Graphviz format
    #[arg(long)]
    dot: Option<PathBuf>,
}

impl Cli {
    /// File (or default) options with flag overrides applied
    fn options(&self) -> Result<AnalysisOptions> {
        let mut options = match &self.config {
            Some(path) => ConfigFileV1::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AnalysisOptions::default(),
        };

        if let Some(algorithm) = self.cgalgo {
            options = options.algorithm(algorithm);
        }
        if let Some(reflection) = self.reflection_setting {
            options = options.reflection(reflection);
        }
        if let Some(timeout) = self.timeout {
            options = options.timeout_ms(Some(timeout));
        }
        if let Some(handle) = self.handle_call_apply {
            options = options.handle_call_apply(handle);
        }
        if self.use_constant_specific_keys {
            options = options.use_constant_specific_keys(true);
        }
        if self.context_allocations {
            options = options.instance_keys(InstanceKeyMode::ContextAllocations);
        }
        if let Some(max) = self.max_number_of_nodes {
            options = options.max_nodes(node_ceiling(max)?);
        }
        Ok(options)
    }
}

/// `--max-number-of-nodes`: `-1` means unbounded, any other negative value is rejected
fn node_ceiling(value: i64) -> ConfigResult<Option<usize>> {
    match value {
        -1 => Ok(None),
        v if v < 0 => Err(ConfigError::range_with_hint(
            "max-number-of-nodes",
            v,
            -1,
            i64::MAX,
            "Pass -1 for an unbounded analysis",
        )),
        v => Ok(usize::try_from(v).ok()),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let options = cli.options()?;
    let driver = AnalysisDriver::new(options).context("invalid analysis options")?;

    let loader = JsonProgramLoader::new(cli.scripts.clone());
    let report = driver
        .run(&loader)
        .with_context(|| format!("analyzing {}", cli.scripts.display()))?;
    println!("{}", report.stats);

    let output = OutputOptions {
        source_numbers: !cli.no_source_numbers,
    };
    EdgeListWriter::new(&report.program, output)
        .write_file(&report.result.call_graph, &cli.cg_output)
        .with_context(|| format!("writing {}", cli.cg_output.display()))?;

    if let Some(path) = &cli.dot {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_dot(&report.result.call_graph, &report.program, file)?;
        info!("Wrote DOT graph to {}", path.display());
    }

    println!("Wrote callgraph to {}", cli.cg_output.display());
    Ok(())
}
