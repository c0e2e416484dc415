// WHY: Rendered documents hold text in styled runs; replacing inside each run and
// returning patches leaves the structure of untouched runs alone

use serde::Serialize;
use tracing::warn;

use super::rename::rename_pattern;
use super::{compile_spec, CompiledPattern, SearchSpec};
use crate::position::{char_to_byte, BytePos, CharPos, CharTracker};

/// Replace `start..end` (character offsets) of run `run_index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPatch {
    pub run_index: usize,
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReplaceOutcome {
    pub success: bool,
    pub patches: Vec<RunPatch>,
    pub replacements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReplaceOutcome {
    fn empty() -> Self {
        Self {
            success: true,
            patches: Vec::new(),
            replacements: 0,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..Self::empty()
        }
    }
}

/// Collect patches run by run; matches never span runs
fn collect_patches<S: AsRef<str>>(
    pattern: &CompiledPattern,
    runs: &[S],
    template: &str,
    limit: Option<usize>,
) -> Vec<RunPatch> {
    let mut patches = Vec::new();

    'runs: for (run_index, run) in runs.iter().enumerate() {
        let run = run.as_ref();
        let mut tracker = CharTracker::new(run);

        for caps in pattern.regex().captures_iter(run) {
            if limit.is_some_and(|max| patches.len() >= max) {
                break 'runs;
            }
            let Some(m) = caps.get_match() else {
                continue;
            };
            let mut replacement = String::new();
            caps.interpolate_string_into(run, template, &mut replacement);

            patches.push(RunPatch {
                run_index,
                start: tracker.advance_to(BytePos(m.start())).0,
                end: tracker.advance_to(BytePos(m.end())).0,
                replacement,
            });
        }
    }

    patches
}

/// Compute replacement patches for each text run independently
pub fn replace_in_runs<S: AsRef<str>>(runs: &[S], spec: &SearchSpec, replacement: &str) -> RunReplaceOutcome {
    if spec.query.is_empty() {
        return RunReplaceOutcome::empty();
    }

    let pattern = match compile_spec(spec, spec.replace_all) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!(query = %spec.query, error = %e, "Rejected run replace pattern");
            return RunReplaceOutcome::failed(format!("{e:#}"));
        }
    };

    let limit = if spec.replace_all { None } else { Some(1) };
    let patches = collect_patches(&pattern, runs, replacement, limit);

    RunReplaceOutcome {
        success: true,
        replacements: patches.len(),
        patches,
        error: None,
    }
}

/// Patch the cue names that `pattern` finds in the flattened run text.
///
/// Only the name (between group 1 and group 2) is patched. A name spread over
/// several runs gets the replacement in its first run and empty patches in the rest.
fn cue_patches<S: AsRef<str>>(pattern: &CompiledPattern, runs: &[S], new_name: &str) -> (Vec<RunPatch>, usize) {
    let flattened: String = runs.iter().map(AsRef::as_ref).collect();

    let mut bounds = Vec::with_capacity(runs.len());
    let mut offset = 0;
    for run in runs {
        let len = run.as_ref().len();
        bounds.push(offset..offset + len);
        offset += len;
    }

    let mut patches = Vec::new();
    let mut renamed = 0;
    for caps in pattern.regex().captures_iter(&flattened) {
        let (Some(lead), Some(tail)) = (caps.get_group(1), caps.get_group(2)) else {
            continue;
        };
        renamed += 1;
        let mut replacement = Some(new_name.to_string());

        for (run_index, (run, range)) in runs.iter().zip(&bounds).enumerate() {
            let start = lead.end.max(range.start);
            let end = tail.start.min(range.end);
            if start >= end {
                continue;
            }
            let mut tracker = CharTracker::new(run.as_ref());
            patches.push(RunPatch {
                run_index,
                start: tracker.advance_to(BytePos(start - range.start)).0,
                end: tracker.advance_to(BytePos(end - range.start)).0,
                replacement: replacement.take().unwrap_or_default(),
            });
        }
    }

    (patches, renamed)
}

/// Rename a character cue inside runs. The runs are read as one flattened text
/// with lines broken at `\n`, so a name counts only when it is its whole line.
pub fn rename_character_in_runs<S: AsRef<str>>(runs: &[S], old_name: &str, new_name: &str) -> RunReplaceOutcome {
    if old_name.trim().is_empty() || new_name.trim().is_empty() {
        return RunReplaceOutcome::empty();
    }

    match rename_pattern(old_name.trim()) {
        Ok(pattern) => {
            let (patches, replacements) = cue_patches(&pattern, runs, new_name.trim());
            RunReplaceOutcome {
                success: true,
                replacements,
                patches,
                error: None,
            }
        }
        Err(e) => {
            warn!(old_name, error = %e, "Rename pattern failed to compile");
            RunReplaceOutcome::failed(format!("{e:#}"))
        }
    }
}

/// Apply patches to their runs. Patches within a run are applied in offset
/// order; an overlapping or out-of-range patch is skipped.
pub fn apply_patches<S: AsRef<str>>(runs: &[S], patches: &[RunPatch]) -> Vec<String> {
    let mut per_run: Vec<Vec<&RunPatch>> = vec![Vec::new(); runs.len()];
    for patch in patches {
        match per_run.get_mut(patch.run_index) {
            Some(bucket) => bucket.push(patch),
            None => warn!(run_index = patch.run_index, runs = runs.len(), "Patch targets a missing run"),
        }
    }

    runs.iter()
        .zip(per_run.iter_mut())
        .map(|(run, bucket)| {
            let run = run.as_ref();
            bucket.sort_by_key(|patch| patch.start);

            let mut result = String::with_capacity(run.len());
            let mut last = 0;
            for patch in bucket.iter() {
                let start = usize::from(char_to_byte(run, CharPos(patch.start)));
                let end = usize::from(char_to_byte(run, CharPos(patch.end)));
                if start < last || end < start {
                    warn!(run_index = patch.run_index, start = patch.start, "Skipping overlapping patch");
                    continue;
                }
                result.push_str(&run[last..start]);
                result.push_str(&patch.replacement);
                last = end;
            }
            result.push_str(&run[last..]);
            result
        })
        .collect()
}
