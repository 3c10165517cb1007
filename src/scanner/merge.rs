use crate::error::LwyiError;

use super::include::{IncludeData, IncludeSet, IntransitiveIncludes};

/// Merge per-TU results into the target's intransitive includes.
///
/// An interface header's contribution counts for both interface and private;
/// a private source contributes only to private. Union is by path, first
/// chain wins. All per-TU failures are collected so one bad translation unit
/// does not hide the rest.
pub(crate) fn merge_includes(
    results: Vec<Result<IncludeData, LwyiError>>,
) -> Result<IntransitiveIncludes, Vec<LwyiError>> {
    let mut errors = Vec::new();
    let mut interface_includes = IncludeSet::default();
    let mut includes = IncludeSet::default();

    for result in results {
        match result {
            Err(error) => errors.push(error),
            Ok(data) => {
                includes.merge_from(&data.includes);
                for header_includes in data.interface_header_includes.values() {
                    interface_includes.merge_from(header_includes);
                    includes.merge_from(header_includes);
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(IntransitiveIncludes {
        interface_includes: interface_includes.into_vec(),
        includes: includes.into_vec(),
    })
}
