//! Call-graph writers
//!
//! Edge listing, one line per resolved edge:
//! `caller-method \t call-instruction \t caller-context \t callee-signature \t callee-context`
//!
//! Lines come out in node-id, program-counter, callee-id order, so equal graphs produce
//! byte-identical files.

use crate::errors::Result;
use crate::features::call_graph::{CallGraph, CallGraphNode, CallSiteReference};
use crate::features::program::Program;
use petgraph::dot::{Config, Dot};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// How the edge listing renders call instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    /// `file:line:column` where known instead of `JSCall@pc`
    pub source_numbers: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            source_numbers: true,
        }
    }
}

/// Tab-separated edge listing
#[derive(Debug, Clone, Copy)]
pub struct EdgeListWriter<'a> {
    program: &'a Program,
    options: OutputOptions,
}

impl<'a> EdgeListWriter<'a> {
    pub fn new(program: &'a Program, options: OutputOptions) -> Self {
        Self { program, options }
    }

    fn instruction(&self, caller: &CallGraphNode, site: CallSiteReference) -> String {
        if self.options.source_numbers {
            let located = caller
                .method
                .function()
                .and_then(|f| self.program.function(f))
                .and_then(|function| {
                    let position = function.position(site.pc)?;
                    let file = match &function.file {
                        Some(file) => file.as_str(),
                        None => script_of(&function.name),
                    };
                    Some(format!("{}:{}", file, position))
                });
            if let Some(located) = located {
                return located;
            }
        }
        site.to_string()
    }

    /// One line per edge, without the trailing newline
    pub fn lines(&self, graph: &CallGraph) -> Vec<String> {
        graph
            .edges()
            .filter_map(|edge| {
                let caller = graph.node(edge.caller)?;
                let callee = graph.node(edge.callee)?;
                Some(format!(
                    "{}\t{}\t{}\t{}\t{}",
                    caller.method.render(self.program),
                    self.instruction(caller, edge.site),
                    caller.context.render(self.program),
                    callee.method.signature(self.program),
                    callee.context.render(self.program)
                ))
            })
            .collect()
    }

    /// Write the listing, returning the number of lines written
    pub fn write<W: Write>(&self, graph: &CallGraph, out: W) -> io::Result<usize> {
        let mut out = BufWriter::new(out);
        let lines = self.lines(graph);
        for line in &lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        Ok(lines.len())
    }

    pub fn write_file(&self, graph: &CallGraph, path: &Path) -> Result<usize> {
        let file = File::create(path)?;
        let written = self.write(graph, file)?;
        info!("Wrote {} edges to {}", written, path.display());
        Ok(written)
    }
}

/// `Lapp.js/f/g` → `app.js`
fn script_of(name: &str) -> &str {
    let name = name.strip_prefix('L').unwrap_or(name);
    name.split('/').next().unwrap_or(name)
}

/// Graphviz rendering of the call graph
pub fn write_dot<W: Write>(graph: &CallGraph, program: &Program, mut out: W) -> io::Result<()> {
    let labeled = graph.to_petgraph().map(
        |_, node| format!("{} | {}", node.method.signature(program), node.context.render(program)),
        |_, site| site.to_string(),
    );
    writeln!(out, "digraph callgraph {{")?;
    write!(
        out,
        "{}",
        Dot::with_config(&labeled, &[Config::GraphContentOnly])
    )?;
    writeln!(out, "}}")
}
