use super::compile_db::CompileCommand;

/// One observation from a preprocess-only run over a translation unit.
///
/// File names are reported as spelled by the preprocessor; the recorder
/// normalizes them. Compiler-internal regions (predefined macros) appear as
/// pseudo files spelled `<...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PpEvent {
    /// A new file has been entered.
    Enter { file: String },
    /// The current file was left; lexing resumes in `returned_to`.
    Exit { left: String, returned_to: String },
    /// An `#include` directive was seen at `line` of the file being lexed.
    Directive { line: u32 },
    /// An include resolved to `file` but the preprocessor chose not to
    /// re-enter it (include guard hit).
    Skipped { file: String },
}

/// Drives some preprocessor over one compile command and reports the
/// inclusion, file-change and file-skip observations.
///
/// Which preprocessor backs this is a deployment concern; the production
/// implementation shells out to the compiler named by the compile command.
pub trait Preprocessor: Send + Sync {
    fn preprocess(&self, command: &CompileCommand) -> Result<Vec<PpEvent>, String>;
}
