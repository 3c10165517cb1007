use std::path::{Path, PathBuf};

use crate::model::TargetData;
use crate::path_utils::normalize_path;

use super::include::{Include, IncludeData, SourceLine};
use super::preprocessor::PpEvent;

/// What kind of file the preprocessor is currently lexing, relative to the
/// target under scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    ArbitraryFile,
    SourceFile,
    InterfaceHeader,
}

/// Where dependencies are recorded: the TU-wide private set, one interface
/// header's bucket, or nowhere.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CurrentSet {
    None,
    Private,
    Interface(PathBuf),
}

/// Replays preprocessor events for one translation unit into an
/// [`IncludeData`].
///
/// Ingress into foreign headers is attributed to the innermost first-party
/// stack frame that caused it; egress from interface headers re-exports their
/// accumulated findings into the enclosing context. The result is exactly the
/// set of headers reachable from the target without crossing another
/// first-party target boundary.
pub struct Recorder<'a> {
    target_data: &'a TargetData,
    data: IncludeData,
    context: Context,
    current_set: CurrentSet,
    current_source_file: PathBuf,
    include_chain: Vec<SourceLine>,
    last_include_loc: Option<SourceLine>,
}

impl<'a> Recorder<'a> {
    #[must_use]
    pub fn new(target_data: &'a TargetData) -> Self {
        Self {
            target_data,
            data: IncludeData::default(),
            context: Context::ArbitraryFile,
            current_set: CurrentSet::None,
            current_source_file: PathBuf::new(),
            include_chain: Vec::new(),
            last_include_loc: None,
        }
    }

    pub fn record(&mut self, event: &PpEvent) {
        match event {
            PpEvent::Enter { file } => self.on_enter(file),
            PpEvent::Exit { left, returned_to } => self.on_exit(left, returned_to),
            PpEvent::Directive { line } => self.on_directive(*line),
            PpEvent::Skipped { file } => self.on_skipped(file),
        }
    }

    #[must_use]
    pub fn into_include_data(self) -> IncludeData {
        self.data
    }

    fn on_enter(&mut self, file: &str) {
        if is_pseudo_file(file) {
            self.context = Context::ArbitraryFile;
            return;
        }

        let previous_set = self.current_set.clone();

        self.rebind(&normalize_path(Path::new(file)));

        if let Some(loc) = self.last_include_loc.take() {
            self.include_chain.push(loc);
        }

        if previous_set != CurrentSet::None && self.context == Context::ArbitraryFile {
            let include = Include {
                path: self.current_source_file.clone(),
                include_chain: self.include_chain.clone(),
            };
            self.insert_into(&previous_set, include);
        }
    }

    fn on_exit(&mut self, left: &str, returned_to: &str) {
        if is_pseudo_file(left) {
            self.context = Context::ArbitraryFile;
            return;
        }

        let previous_context = self.context;
        let previous_set = self.current_set.clone();

        self.include_chain.pop();
        self.rebind(&normalize_path(Path::new(returned_to)));

        if previous_context == Context::InterfaceHeader && self.context != Context::ArbitraryFile
        {
            self.propagate(&previous_set);
        }
    }

    fn on_directive(&mut self, line: u32) {
        self.last_include_loc = Some(SourceLine {
            source: self.current_source_file.clone(),
            line,
        });
    }

    fn on_skipped(&mut self, file: &str) {
        let filename = normalize_path(Path::new(file));

        if self.context == Context::ArbitraryFile {
            return;
        }

        if self.target_data.is_interface_header(&filename)
            || self.target_data.is_private_source(&filename)
        {
            // The file was fully processed on a prior entry; reuse its
            // recorded transitive contribution.
            let recorded = CurrentSet::Interface(filename);
            self.propagate(&recorded);
            self.last_include_loc = None;
        } else {
            let mut include_chain = self.include_chain.clone();
            if let Some(loc) = self.last_include_loc.take() {
                include_chain.push(loc);
            }
            let include = Include {
                path: filename,
                include_chain,
            };
            let target_set = self.current_set.clone();
            self.insert_into(&target_set, include);
        }
    }

    /// Recompute the lexing context and the recording set for `file`.
    fn rebind(&mut self, file: &Path) {
        self.current_source_file = file.to_path_buf();
        if self.target_data.is_interface_header(file) {
            self.context = Context::InterfaceHeader;
            // materialize the bucket even when the header includes nothing
            self.data
                .interface_header_includes
                .entry(self.current_source_file.clone())
                .or_default();
            self.current_set = CurrentSet::Interface(self.current_source_file.clone());
        } else if self.target_data.is_private_source(file) {
            self.context = Context::SourceFile;
            self.current_set = CurrentSet::Private;
        } else {
            self.context = Context::ArbitraryFile;
            self.current_set = CurrentSet::None;
        }
    }

    fn insert_into(&mut self, set: &CurrentSet, include: Include) {
        match set {
            CurrentSet::None => {}
            CurrentSet::Private => {
                self.data.includes.insert(include);
            }
            CurrentSet::Interface(header) => {
                self.data
                    .interface_header_includes
                    .entry(header.clone())
                    .or_default()
                    .insert(include);
            }
        }
    }

    /// Copy every include recorded under `from` into the current set.
    fn propagate(&mut self, from: &CurrentSet) {
        let CurrentSet::Interface(header) = from else {
            return;
        };
        let Some(source) = self.data.interface_header_includes.get(header) else {
            return;
        };
        let includes: Vec<Include> = source.iter().cloned().collect();
        let target_set = self.current_set.clone();
        for include in includes {
            self.insert_into(&target_set, include);
        }
    }
}

/// Compiler-internal pseudo files such as `<built-in>` and `<command line>`.
fn is_pseudo_file(file: &str) -> bool {
    file.starts_with('<')
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
