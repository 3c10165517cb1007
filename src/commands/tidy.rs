use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::model::{Target, TargetModel};
use crate::output;
use crate::tidy::{DagDiagnosticKind, load_config, tidy};
use crate::{EXIT_FAILURE, EXIT_SUCCESS};

#[derive(Parser, Debug)]
#[command(name = "tidy", disable_help_flag = true)]
struct TidyToolArgs {
    /// Print this help message.
    #[arg(short = 'h', long)]
    help: bool,

    /// Path to config file.
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// `tidy -c FILE`: check the dependency graph against the policy config.
/// Cluster growth, new clusters and forbidden edges fail the run; cluster
/// shrinkage is only a warning.
#[must_use]
pub fn run(model: &TargetModel, args: &[String]) -> i32 {
    let options = match TidyToolArgs::try_parse_from(args) {
        Ok(options) => options,
        Err(err) => {
            println!("{err}");
            return EXIT_FAILURE;
        }
    };

    if options.help {
        let _ = TidyToolArgs::command().print_help();
        return EXIT_FAILURE;
    }
    let Some(config_path) = options.config else {
        println!("A config file is required.");
        let _ = TidyToolArgs::command().print_help();
        return EXIT_FAILURE;
    };

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(err) => {
            println!("Failed to load config file.\n{err}");
            return EXIT_FAILURE;
        }
    };

    let diagnostics = tidy(&config, model);

    let mut failed = false;
    for diagnostic in &diagnostics {
        match diagnostic.kind {
            DagDiagnosticKind::AddedToCluster => {
                output::print_error(&format!(
                    "a known target cluster increased in size with the addition of {}",
                    render_targets(&diagnostic.targets)
                ));
                println!();
                failed = true;
            }
            DagDiagnosticKind::RemovedFromCluster => {
                output::print_warning(&format!(
                    "a known target cluster decreased in size with the removal of {}",
                    render_targets(&diagnostic.targets)
                ));
                println!();
            }
            DagDiagnosticKind::NewCluster => {
                output::print_error(&format!(
                    "a new target cluster was introduced with {}",
                    render_targets(&diagnostic.targets)
                ));
                println!();
                failed = true;
            }
            DagDiagnosticKind::ForbiddenDependency => {
                output::print_error(&format!(
                    "{} is forbidden to depend on {}",
                    diagnostic.targets[0], diagnostic.targets[1]
                ));
                failed = true;
            }
        }
    }

    if failed { EXIT_FAILURE } else { EXIT_SUCCESS }
}

/// "a", "a and b", "a, b, and c"
fn render_targets(targets: &[Target]) -> String {
    let mut rendered = String::new();
    for (index, target) in targets.iter().enumerate() {
        if index != 0 {
            if targets.len() > 2 {
                rendered.push(',');
            }
            rendered.push(' ');
        }
        if index + 1 == targets.len() && targets.len() > 1 {
            rendered.push_str("and ");
        }
        rendered.push_str(&target.name);
    }
    rendered
}
