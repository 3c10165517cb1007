mod clang;
mod compile_db;
mod include;
mod merge;
mod preprocessor;
mod recorder;

pub use clang::ClangPreprocessor;
pub use compile_db::{CompilationDatabase, CompileCommand, split_command_line};
pub use include::{Include, IncludeData, IncludeSet, IntransitiveIncludes, SourceLine};
pub use preprocessor::{PpEvent, Preprocessor};
pub use recorder::Recorder;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::COMPILE_COMMANDS_FILE;
use crate::error::{LwyiError, Result};
use crate::model::TargetData;
use crate::output::ScanProgress;
use crate::parallel::WorkerPool;
use crate::path_utils::normalize_path;

use merge::merge_includes;

/// Drives the preprocessor over every translation unit of a target and merges
/// the recorded includes. The pool and the preprocessor are reused across
/// targets; the compilation database is reloaded per scan and shared
/// read-only with the workers.
pub struct Scanner {
    pool: WorkerPool,
    preprocessor: Arc<dyn Preprocessor>,
}

impl Scanner {
    #[must_use]
    pub fn new(thread_count: usize, preprocessor: Arc<dyn Preprocessor>) -> Self {
        Self {
            pool: WorkerPool::new(thread_count),
            preprocessor,
        }
    }

    /// Scan all of `target_data`'s translation units (private sources plus
    /// the verify-interface sources). Sources without a compile command are
    /// tallied and skipped; every failing translation unit contributes its
    /// own error.
    pub fn scan(
        &self,
        binary_dir: &Path,
        target_data: &TargetData,
    ) -> std::result::Result<IntransitiveIncludes, Vec<LwyiError>> {
        self.collect_compile_commands(binary_dir, target_data)
            .map_err(|error| vec![error])
            .and_then(|commands| self.run(commands, target_data))
    }

    fn collect_compile_commands(
        &self,
        binary_dir: &Path,
        target_data: &TargetData,
    ) -> Result<Vec<CompileCommand>> {
        let database = CompilationDatabase::load(&binary_dir.join(COMPILE_COMMANDS_FILE))?;

        let source_paths = target_data
            .sources
            .iter()
            .chain(&target_data.verify_interface_header_sets_sources);

        let mut processed_file_count = 0_usize;
        let mut skipped_file_types: BTreeMap<String, usize> = BTreeMap::new();
        let mut commands = Vec::new();
        for source in source_paths {
            if !source.is_absolute() {
                return Err(LwyiError::scan(
                    source.clone(),
                    "unexpected relative path in target data",
                ));
            }

            let found = database.commands_for(&normalize_path(source));
            if found.is_empty() {
                let extension = source
                    .extension()
                    .map_or(String::new(), |e| format!(".{}", e.to_string_lossy()));
                *skipped_file_types.entry(extension).or_default() += 1;
                continue;
            }
            commands.extend(found.iter().cloned());
            processed_file_count += 1;
        }

        println!("Processed {processed_file_count} source files");
        for (extension, count) in &skipped_file_types {
            let noun = if *count == 1 { "file" } else { "files" };
            println!("Skipped {count} *{extension} {noun}");
        }

        Ok(commands)
    }

    fn run(
        &self,
        commands: Vec<CompileCommand>,
        target_data: &TargetData,
    ) -> std::result::Result<IntransitiveIncludes, Vec<LwyiError>> {
        let progress = ScanProgress::new(commands.len() as u64);
        let preprocessor = Arc::clone(&self.preprocessor);
        let target_data = Arc::new(target_data.clone());

        let results = {
            let progress = progress.clone();
            self.pool.transform(commands, move |command| {
                let result = scan_translation_unit(preprocessor.as_ref(), &target_data, command);
                progress.inc();
                result
            })
        };
        progress.finish();

        merge_includes(results)
    }
}

fn scan_translation_unit(
    preprocessor: &dyn Preprocessor,
    target_data: &TargetData,
    command: &CompileCommand,
) -> Result<IncludeData> {
    let events = preprocessor
        .preprocess(command)
        .map_err(|message| LwyiError::scan(command.file.clone(), message))?;

    let mut recorder = Recorder::new(target_data);
    for event in &events {
        recorder.record(event);
    }
    Ok(recorder.into_include_data())
}

#[cfg(test)]
pub(crate) mod sim;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
