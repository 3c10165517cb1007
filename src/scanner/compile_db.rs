use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LwyiError, Result};
use crate::path_utils::normalize_path;

/// One compiler invocation, ready to hand to a [`super::Preprocessor`].
#[derive(Debug, Clone)]
pub struct CompileCommand {
    /// Working directory of the invocation.
    pub directory: PathBuf,
    /// The translation unit, absolute and normalized.
    pub file: PathBuf,
    /// Full argument vector including the compiler itself.
    pub arguments: Vec<String>,
}

/// Raw entry as produced by build tools: either a single `command` string or
/// an `arguments` vector.
#[derive(Debug, Deserialize)]
struct RawEntry {
    directory: String,
    file: String,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    arguments: Option<Vec<String>>,
}

/// Compile commands indexed by source file, loaded from
/// `compile_commands.json`. Read-only after loading; shared across scanner
/// workers.
#[derive(Debug, Default)]
pub struct CompilationDatabase {
    commands: HashMap<PathBuf, Vec<CompileCommand>>,
}

impl CompilationDatabase {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| LwyiError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<RawEntry> =
            serde_json::from_str(&raw).map_err(|err| LwyiError::parse(path, &err))?;

        let mut commands: HashMap<PathBuf, Vec<CompileCommand>> = HashMap::new();
        for entry in entries {
            let directory = PathBuf::from(&entry.directory);
            let arguments = match (entry.arguments, entry.command) {
                (Some(arguments), _) => arguments,
                (None, Some(command)) => split_command_line(&command),
                (None, None) => {
                    return Err(LwyiError::Parse {
                        path: path.to_path_buf(),
                        message: format!(
                            "entry for {} has neither \"command\" nor \"arguments\"",
                            entry.file
                        ),
                    });
                }
            };

            let file = PathBuf::from(&entry.file);
            let file = if file.is_absolute() {
                normalize_path(&file)
            } else {
                normalize_path(&directory.join(file))
            };

            commands.entry(file.clone()).or_default().push(CompileCommand {
                directory,
                file,
                arguments,
            });
        }

        Ok(Self { commands })
    }

    /// All invocations compiling `source` (absolute, normalized), in file
    /// order. Empty when the database has none.
    #[must_use]
    pub fn commands_for(&self, source: &Path) -> &[CompileCommand] {
        self.commands.get(source).map_or(&[], Vec::as_slice)
    }
}

/// Split a `command` string the way a POSIX shell tokenizes it: whitespace
/// separates words, single quotes are literal, double quotes honor `\"` and
/// `\\`, a bare backslash escapes the next character.
#[must_use]
pub fn split_command_line(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\n' => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                for c in chars.by_ref() {
                    if c == '\'' {
                        break;
                    }
                    current.push(c);
                }
            }
            '"' => {
                in_word = true;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => current.push('\\'),
                        },
                        _ => current.push(c),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }

    words
}

#[cfg(test)]
#[path = "compile_db_tests.rs"]
mod tests;
