use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use lwyi::cli::Cli;
use lwyi::commands;
use lwyi::model::{Target, TargetModelLoader};
use lwyi::{BUILD_INFO_FILE, EXIT_FAILURE, LwyiError, output};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders the message together with the usage text
            let _ = err.print();
            return EXIT_FAILURE;
        }
    };

    if cli.help {
        let _ = Cli::command().print_help();
        return EXIT_FAILURE;
    }

    match run_impl(&cli) {
        Ok(exit_code) => exit_code,
        Err(err) => {
            output::print_error(&err.to_string());
            EXIT_FAILURE
        }
    }
}

fn run_impl(cli: &Cli) -> lwyi::Result<i32> {
    let binary_dir = resolve_binary_dir(cli)?;

    let info_file = binary_dir.join(BUILD_INFO_FILE);
    if !info_file.is_file() {
        return Err(LwyiError::Usage(format!("{} is not a file", info_file.display())));
    }

    println!("# Loading build system info from {}", info_file.display());

    let mut loader = TargetModelLoader::new();
    loader.load_json(&info_file)?;
    let model = loader.make_target_model();
    model.validate().map_err(LwyiError::ModelValidation)?;

    let selected_targets: Vec<Target> =
        cli.targets.iter().map(|name| Target::new(name.clone())).collect();

    if !cli.tool.is_empty() {
        return Ok(commands::run_tool(&model, &selected_targets, &cli.tool));
    }

    let thread_count = if cli.parallel > 0 {
        cli.parallel as usize
    } else {
        std::thread::available_parallelism().map_or(1, |count| count.get())
    };

    Ok(commands::check::run_check(
        &model,
        &binary_dir,
        &selected_targets,
        thread_count,
    ))
}

fn resolve_binary_dir(cli: &Cli) -> lwyi::Result<PathBuf> {
    match &cli.binary_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(LwyiError::Usage(format!("{} is not a directory", dir.display())));
            }
            Ok(dir.clone())
        }
        None => Ok(std::env::current_dir()?),
    }
}
