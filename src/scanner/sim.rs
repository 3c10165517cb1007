//! Scripted preprocessor over an in-memory file tree, for tests.
//!
//! Emulates the observable behavior of a real preprocessor: files are entered
//! depth-first in directive order, a file is entered at most once per
//! translation unit (include guards), later includes of it are reported as
//! skipped. Mirrors the in-memory-filesystem scan tests of the reference
//! implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::path_utils::normalize_path;

use super::compile_db::CompileCommand;
use super::preprocessor::{PpEvent, Preprocessor};

pub(crate) struct SimulatedPreprocessor {
    files: BTreeMap<PathBuf, String>,
}

impl SimulatedPreprocessor {
    pub(crate) fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, content)| (PathBuf::from(path), (*content).to_string()))
                .collect(),
        }
    }

    fn process(
        &self,
        file: &Path,
        visited: &mut BTreeSet<PathBuf>,
        events: &mut Vec<PpEvent>,
    ) -> Result<(), String> {
        let content = self
            .files
            .get(file)
            .ok_or_else(|| format!("no such file: {}", file.display()))?;

        for (index, line) in content.lines().enumerate() {
            let Some(spelled) = parse_include(line) else {
                continue;
            };
            let line_number = u32::try_from(index + 1).expect("line count fits u32");
            events.push(PpEvent::Directive { line: line_number });

            let resolved = resolve(file, &spelled);
            if !self.files.contains_key(&resolved) {
                return Err(format!("unresolved include: {spelled}"));
            }

            if visited.contains(&resolved) {
                events.push(PpEvent::Skipped {
                    file: resolved.display().to_string(),
                });
            } else {
                visited.insert(resolved.clone());
                events.push(PpEvent::Enter {
                    file: resolved.display().to_string(),
                });
                self.process(&resolved, visited, events)?;
                events.push(PpEvent::Exit {
                    left: resolved.display().to_string(),
                    returned_to: file.display().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Preprocessor for SimulatedPreprocessor {
    fn preprocess(&self, command: &CompileCommand) -> Result<Vec<PpEvent>, String> {
        let main = normalize_path(&command.file);
        let mut events = vec![
            PpEvent::Enter {
                file: main.display().to_string(),
            },
            PpEvent::Enter {
                file: "<built-in>".to_string(),
            },
            PpEvent::Exit {
                left: "<built-in>".to_string(),
                returned_to: main.display().to_string(),
            },
        ];

        let mut visited = BTreeSet::from([main.clone()]);
        self.process(&main, &mut visited, &mut events)?;
        Ok(events)
    }
}

fn parse_include(line: &str) -> Option<String> {
    let rest = line.trim_start().strip_prefix("#include")?.trim_start();
    let rest = rest.strip_prefix('"').or_else(|| rest.strip_prefix('<'))?;
    let end = rest.find(['"', '>'])?;
    Some(rest[..end].to_string())
}

fn resolve(includer: &Path, spelled: &str) -> PathBuf {
    let spelled_path = Path::new(spelled);
    if spelled_path.is_absolute() {
        normalize_path(spelled_path)
    } else {
        let dir = includer.parent().unwrap_or_else(|| Path::new("/"));
        normalize_path(&dir.join(spelled_path))
    }
}
