use std::path::{Path, PathBuf};
use std::process::Command;

use crate::path_utils::normalize_path;

use super::compile_db::CompileCommand;
use super::preprocessor::{PpEvent, Preprocessor};

/// Production preprocessor driver: shells out to the compiler named by the
/// compile command in preprocess-only mode and reconstructs the event stream
/// from GNU linemarkers plus the `#include` directives preserved by `-dI`.
pub struct ClangPreprocessor {
    resource_dir: Option<PathBuf>,
}

impl ClangPreprocessor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            resource_dir: locate_resource_dir(),
        }
    }
}

impl Default for ClangPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for ClangPreprocessor {
    fn preprocess(&self, command: &CompileCommand) -> Result<Vec<PpEvent>, String> {
        let mut arguments = adjust_arguments(&command.arguments);
        if arguments.is_empty() {
            return Err("empty compile command".to_string());
        }
        if let Some(dir) = &self.resource_dir {
            arguments.push(format!("-resource-dir={}", dir.display()));
        }

        let output = Command::new(&arguments[0])
            .args(&arguments[1..])
            .current_dir(&command.directory)
            .output()
            .map_err(|err| format!("failed to run {}: {err}", arguments[0]))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} exited with {}\n{}",
                arguments[0],
                output.status,
                stderr.trim_end()
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let search = HeaderSearch::from_arguments(&arguments, &command.directory);
        Ok(parse_preprocessed_output(&stdout, &command.directory, &search))
    }
}

/// Resource directory shipped next to the executable, when present. Probing
/// the executable location keeps relocatable installs working without any
/// environment configuration.
fn locate_resource_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.join("clang-resources");
    dir.is_dir().then_some(dir)
}

/// Rewrite a compile command for preprocess-only operation: drop the output
/// and dependency-file options, replace compilation with `-E`, keep the
/// `#include` directives in the output (`-dI`) and silence warnings.
pub(crate) fn adjust_arguments(arguments: &[String]) -> Vec<String> {
    let mut adjusted = Vec::with_capacity(arguments.len() + 4);
    let mut iter = arguments.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" | "-MF" | "-MT" | "-MQ" => {
                iter.next();
            }
            "-c" | "-S" | "-E" | "-M" | "-MM" | "-MD" | "-MMD" | "-MG" | "-MP" | "-MV" => {}
            _ if arg.starts_with("--output=") => {}
            _ if arg.len() > 3 && (arg.starts_with("-MF") || arg.starts_with("-MT") || arg.starts_with("-MQ")) => {}
            _ => adjusted.push(arg.clone()),
        }
    }

    adjusted.push("-E".to_string());
    adjusted.push("-dI".to_string());
    adjusted.push("-w".to_string());
    if cfg!(windows) {
        adjusted.push("-Wno-error".to_string());
        adjusted.push("-Wno-unused-command-line-argument".to_string());
    }

    adjusted
}

/// Include search directories extracted from a compile command, used to
/// re-resolve includes the preprocessor reported only by their spelling.
#[derive(Debug, Default)]
pub(crate) struct HeaderSearch {
    quote_dirs: Vec<PathBuf>,
    angle_dirs: Vec<PathBuf>,
}

impl HeaderSearch {
    pub(crate) fn from_arguments(arguments: &[String], directory: &Path) -> Self {
        let mut search = Self::default();
        let absolute = |dir: &str| {
            let dir = Path::new(dir);
            if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                directory.join(dir)
            }
        };

        let mut iter = arguments.iter();
        while let Some(arg) = iter.next() {
            let (flag, value) = match arg.as_str() {
                "-I" | "-iquote" | "-isystem" | "-idirafter" => {
                    let Some(value) = iter.next() else { break };
                    (arg.as_str(), value.as_str())
                }
                _ if arg.starts_with("-I") && arg.len() > 2 => ("-I", &arg[2..]),
                _ if arg.starts_with("-isystem") && arg.len() > 8 => ("-isystem", &arg[8..]),
                _ if arg.starts_with("-iquote") && arg.len() > 7 => ("-iquote", &arg[7..]),
                _ if arg.starts_with("-idirafter") && arg.len() > 10 => {
                    ("-idirafter", &arg[10..])
                }
                _ => continue,
            };
            match flag {
                "-iquote" => search.quote_dirs.push(absolute(value)),
                _ => search.angle_dirs.push(absolute(value)),
            }
        }

        search
    }

    /// Resolve a spelled include against the search path. Quoted includes try
    /// the including file's directory first, then `-iquote`, then the angle
    /// directories; angled includes skip the first two. Purely existence
    /// based: the first candidate that is a file on disk wins.
    pub(crate) fn resolve(
        &self,
        spelled: &str,
        angled: bool,
        includer_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        let quote_candidates = (!angled)
            .then(|| includer_dir.into_iter().map(Path::to_path_buf).chain(self.quote_dirs.iter().cloned()))
            .into_iter()
            .flatten();

        for dir in quote_candidates.chain(self.angle_dirs.iter().cloned()) {
            let candidate = dir.join(spelled);
            if candidate.is_file() {
                return Some(normalize_path(&candidate));
            }
        }
        None
    }
}

/// A GNU linemarker: `# LINE "FILE" FLAGS...`. Flag 1 marks entry into the
/// file, flag 2 the return to it; a marker without either resyncs the line
/// counter.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LineMarker {
    pub line: u32,
    pub file: String,
    pub enter: bool,
    pub leave: bool,
}

pub(crate) fn parse_line_marker(line: &str) -> Option<LineMarker> {
    let rest = line.strip_prefix('#')?.trim_start();
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let (number, rest) = rest.split_at(rest.find(|c: char| !c.is_ascii_digit())?);
    let line_number: u32 = number.parse().ok()?;

    let rest = rest.trim_start();
    let rest = rest.strip_prefix('"')?;
    let mut file = String::new();
    let mut chars = rest.chars();
    loop {
        match chars.next()? {
            '"' => break,
            '\\' => file.push(chars.next()?),
            c => file.push(c),
        }
    }

    let flags: Vec<&str> = chars.as_str().split_whitespace().collect();
    Some(LineMarker {
        line: line_number,
        file,
        enter: flags.contains(&"1"),
        leave: flags.contains(&"2"),
    })
}

/// An `#include` directive preserved in the output by `-dI`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct IncludeDirective {
    pub spelled: String,
    pub angled: bool,
}

pub(crate) fn parse_include_directive(line: &str) -> Option<IncludeDirective> {
    let rest = line.trim_start().strip_prefix('#')?.trim_start();
    let rest = ["include_next", "include", "import"]
        .iter()
        .find_map(|keyword| rest.strip_prefix(keyword))?;
    let rest = rest.trim_start();

    let (closing, angled) = match rest.chars().next()? {
        '<' => ('>', true),
        '"' => ('"', false),
        _ => return None,
    };
    let body = &rest[1..];
    let end = body.find(closing)?;
    Some(IncludeDirective {
        spelled: body[..end].to_string(),
        angled,
    })
}

struct PendingInclude {
    spelled: String,
    angled: bool,
    includer_dir: Option<PathBuf>,
}

/// Reconstruct the event stream from preprocessed output.
///
/// A directive is consumed by the enter marker that follows it; a directive
/// followed by anything else was a skipped include (guard hit) and its target
/// is re-resolved through the header search path. Unresolvable skips are
/// dropped.
pub(crate) fn parse_preprocessed_output(
    output: &str,
    directory: &Path,
    search: &HeaderSearch,
) -> Vec<PpEvent> {
    let mut events = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut current_line: u32 = 1;
    let mut pending: Option<PendingInclude> = None;

    let absolute_name = |file: &str| -> String {
        let path = Path::new(file);
        if file.starts_with('<') || path.is_absolute() {
            file.to_string()
        } else {
            directory.join(path).display().to_string()
        }
    };

    let flush_pending = |pending: &mut Option<PendingInclude>, events: &mut Vec<PpEvent>| {
        if let Some(include) = pending.take()
            && let Some(resolved) =
                search.resolve(&include.spelled, include.angled, include.includer_dir.as_deref())
        {
            events.push(PpEvent::Skipped {
                file: resolved.display().to_string(),
            });
        }
    };

    for line in output.lines() {
        if let Some(marker) = parse_line_marker(line) {
            let file = absolute_name(&marker.file);
            if marker.enter {
                // the pending directive opened this file
                pending = None;
                events.push(PpEvent::Enter { file: file.clone() });
                stack.push(file);
            } else if marker.leave {
                flush_pending(&mut pending, &mut events);
                if let Some(left) = stack.pop() {
                    events.push(PpEvent::Exit {
                        left,
                        returned_to: file,
                    });
                }
            } else if stack.is_empty() {
                // the very first marker names the main file
                events.push(PpEvent::Enter { file: file.clone() });
                stack.push(file);
            } else {
                flush_pending(&mut pending, &mut events);
            }
            current_line = marker.line;
        } else if let Some(directive) = parse_include_directive(line) {
            flush_pending(&mut pending, &mut events);
            events.push(PpEvent::Directive { line: current_line });
            let includer_dir = stack
                .last()
                .map(|file| absolute_name(file))
                .and_then(|file| Path::new(&file).parent().map(Path::to_path_buf));
            pending = Some(PendingInclude {
                spelled: directive.spelled,
                angled: directive.angled,
                includer_dir,
            });
            current_line += 1;
        } else {
            if !line.trim().is_empty() {
                flush_pending(&mut pending, &mut events);
            }
            current_line += 1;
        }
    }
    flush_pending(&mut pending, &mut events);

    events
}

#[cfg(test)]
#[path = "clang_tests.rs"]
mod tests;
