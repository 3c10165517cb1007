use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};

use crate::checker::strongly_connected_dependencies;
use crate::model::{Target, TargetModel};
use crate::{EXIT_FAILURE, EXIT_SUCCESS};

#[derive(Parser, Debug)]
#[command(name = "graph", disable_help_flag = true)]
struct GraphToolArgs {
    /// Print this help message.
    #[arg(short = 'h', long)]
    help: bool,

    /// Path to the output graphviz dot file to create. An additional file for
    /// each strongly connected component will also be created based on this
    /// name.
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// `graph -o FILE`: emit one DOT file with the SCCs clumped into single
/// nodes, plus one DOT file per non-trivial component.
#[must_use]
pub fn run(model: &TargetModel, selected_targets: &[Target], args: &[String]) -> i32 {
    let options = match GraphToolArgs::try_parse_from(args) {
        Ok(options) => options,
        Err(err) => {
            println!("{err}");
            return EXIT_FAILURE;
        }
    };

    if options.help {
        let _ = GraphToolArgs::command().print_help();
        return EXIT_FAILURE;
    }
    let Some(output_path) = options.output else {
        println!("An output file is required.");
        let _ = GraphToolArgs::command().print_help();
        return EXIT_FAILURE;
    };

    let pruned;
    let model = if selected_targets.is_empty() {
        model
    } else {
        pruned = model.create_pruned(selected_targets);
        &pruned
    };

    let components = strongly_connected_dependencies(model);

    // targets inside a non-trivial component are represented by its index
    let component_node = |target: &Target| -> String {
        components
            .iter()
            .position(|component| component.contains(target))
            .map_or_else(|| target.name.clone(), |index| index.to_string())
    };

    let mut edges: BTreeSet<(String, String)> = BTreeSet::new();
    for (target, target_data) in model.targets() {
        let from = component_node(target);
        for dep in &target_data.dependencies {
            edges.insert((from.clone(), component_node(dep)));
        }
    }

    let directory = output_path.parent().unwrap_or_else(|| Path::new(""));
    let stem = output_path.file_stem().map_or(String::new(), |s| s.to_string_lossy().into_owned());
    let extension = output_path
        .extension()
        .map_or(String::new(), |e| format!(".{}", e.to_string_lossy()));

    let graph_path = directory.join(format!("{stem}{extension}"));
    if let Err(code) = write_main_graph(&graph_path, &components, &edges) {
        return code;
    }

    for (index, component) in components.iter().enumerate() {
        let component_path = directory.join(format!("{stem}_scc_{index}{extension}"));
        if let Err(code) = write_component_graph(&component_path, index, component, model) {
            return code;
        }
    }

    EXIT_SUCCESS
}

fn open_output(path: &Path) -> Result<BufWriter<File>, i32> {
    File::create(path).map(BufWriter::new).map_err(|_| {
        println!("Failed to open file {}", path.display());
        EXIT_FAILURE
    })
}

fn write_main_graph(
    path: &Path,
    components: &[BTreeSet<Target>],
    edges: &BTreeSet<(String, String)>,
) -> Result<(), i32> {
    let mut file = open_output(path)?;

    let _ = writeln!(file, "digraph dependencies {{");
    for (index, component) in components.iter().enumerate() {
        let label = component
            .iter()
            .map(|target| target.name.clone())
            .collect::<Vec<_>>()
            .join("\\n");
        let _ = writeln!(file, "  {index} [shape=box label=\"{label}\"]");
    }
    for (from, to) in edges {
        let _ = writeln!(file, "  {from} -> {to};");
    }
    let _ = writeln!(file, "}}");
    Ok(())
}

fn write_component_graph(
    path: &Path,
    index: usize,
    component: &BTreeSet<Target>,
    model: &TargetModel,
) -> Result<(), i32> {
    let mut file = open_output(path)?;

    let _ = writeln!(file, "digraph {index} {{");
    for target in component {
        if let Some(target_data) = model.get_target_data(target) {
            for dep in &target_data.dependencies {
                if component.contains(dep) {
                    let _ = writeln!(file, "  {target} -> {dep};");
                }
            }
        }
    }
    let _ = writeln!(file, "}}");
    Ok(())
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
