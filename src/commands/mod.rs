pub mod check;
pub mod graph;
pub mod tidy;

use crate::model::{Target, TargetModel};
use crate::{EXIT_FAILURE, EXIT_SUCCESS};

const TOOL_MENU: &str = "tools:
  list                      Print this help message.
  tidy                      Check that the dependency graph is a DAG.
  graph                     Generate a graphviz dot graph of the dependencies.";

/// Dispatch a `--tool` invocation. The first token names the tool; the rest
/// is handed to it verbatim.
#[must_use]
pub fn run_tool(model: &TargetModel, selected_targets: &[Target], args: &[String]) -> i32 {
    let Some(tool) = args.first() else {
        println!("{TOOL_MENU}");
        return EXIT_FAILURE;
    };

    match tool.as_str() {
        "list" => {
            println!("{TOOL_MENU}");
            EXIT_SUCCESS
        }
        "graph" => graph::run(model, selected_targets, args),
        "tidy" => tidy::run(model, args),
        unknown => {
            println!("Unknown tool {unknown}");
            EXIT_FAILURE
        }
    }
}
