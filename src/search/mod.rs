// WHY: User-controlled search text is compiled through one place that escapes it
// unless regex mode is explicit; the engine returns outcome values and never errors upward

use anyhow::{Context, Result};
use regex_automata::meta::{self, Regex};
use regex_automata::util::syntax;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::position::{BytePos, CharTracker};

pub mod rename;
pub mod runs;

pub use rename::{rename_character, RenameOutcome};
pub use runs::{apply_patches, rename_character_in_runs, replace_in_runs, RunPatch, RunReplaceOutcome};

/// Upper bound on compiled NFA size for user patterns
const PATTERN_SIZE_LIMIT: usize = 2 * (1 << 20);

/// Search options as sent by the editor; missing fields take their defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSpec {
    pub query: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub use_regex: bool,
    pub replace_all: bool,
}

impl Default for SearchSpec {
    fn default() -> Self {
        Self {
            query: String::new(),
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            replace_all: true,
        }
    }
}

impl SearchSpec {
    pub fn literal(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// A compiled search pattern plus the source and flags a renderer needs to
/// reproduce it against its own text runs
#[derive(Debug)]
pub struct CompiledPattern {
    regex: Regex,
    pub source: String,
    pub flags: String,
}

impl CompiledPattern {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// All matches in `line` with character offsets
    pub fn find_spans(&self, line: &str) -> Vec<MatchSpan> {
        let mut tracker = CharTracker::new(line);
        self.regex
            .find_iter(line)
            .filter(|m| !m.is_empty())
            .map(|m| {
                let start = tracker.advance_to(BytePos(m.start()));
                let end = tracker.advance_to(BytePos(m.end()));
                MatchSpan {
                    text: line[m.range()].to_string(),
                    index: start.0,
                    length: end.0 - start.0,
                }
            })
            .collect()
    }

    /// Substitute matches in `text` with an interpolated template.
    /// Returns the new text and the number of substitutions performed.
    pub fn substitute(&self, text: &str, template: &str, limit: Option<usize>) -> (String, usize) {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;

        for caps in self.regex.captures_iter(text) {
            if limit.is_some_and(|max| count >= max) {
                break;
            }
            let Some(m) = caps.get_match() else {
                continue;
            };
            result.push_str(&text[last..m.start()]);
            caps.interpolate_string_into(text, template, &mut result);
            last = m.end();
            count += 1;
        }

        result.push_str(&text[last..]);
        (result, count)
    }
}

fn build_regex(source: &str, case_insensitive: bool, multi_line: bool) -> Result<Regex> {
    Regex::builder()
        .syntax(
            syntax::Config::new()
                .case_insensitive(case_insensitive)
                .multi_line(multi_line),
        )
        .configure(meta::Config::new().nfa_size_limit(Some(PATTERN_SIZE_LIMIT)))
        .build(source)
        .with_context(|| format!("Invalid search pattern: {source}"))
}

fn flag_letters(global: bool, case_insensitive: bool) -> String {
    let mut flags = String::new();
    if global {
        flags.push('g');
    }
    if case_insensitive {
        flags.push('i');
    }
    flags
}

/// Compile a search spec. Literal queries are escaped before compilation.
pub fn compile_spec(spec: &SearchSpec, global: bool) -> Result<CompiledPattern> {
    let mut source = if spec.use_regex {
        spec.query.clone()
    } else {
        regex_syntax::escape(&spec.query)
    };

    if spec.whole_word {
        source = if spec.use_regex {
            format!(r"\b(?:{source})\b")
        } else {
            format!(r"\b{source}\b")
        };
    }

    let case_insensitive = !spec.case_sensitive;
    let regex = build_regex(&source, case_insensitive, false)?;

    Ok(CompiledPattern {
        regex,
        flags: flag_letters(global, case_insensitive),
        source,
    })
}

/// One match inside a line; offsets count characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    pub text: String,
    pub index: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 1-based
    pub line_number: usize,
    pub content: String,
    pub matches: Vec<MatchSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub success: bool,
    pub query: String,
    pub total_matches: usize,
    pub results: Vec<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    fn failed(query: &str, error: String) -> Self {
        Self {
            success: false,
            query: query.to_string(),
            total_matches: 0,
            results: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutcome {
    pub success: bool,
    pub new_text: String,
    pub replacements: usize,
    pub pattern_source: String,
    pub pattern_flags: String,
    pub replace_text: String,
    pub replace_all: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Find every match, line by line
pub fn search(text: &str, spec: &SearchSpec) -> SearchOutcome {
    if spec.query.is_empty() {
        return SearchOutcome {
            success: true,
            query: String::new(),
            total_matches: 0,
            results: Vec::new(),
            error: None,
        };
    }

    let pattern = match compile_spec(spec, true) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!(query = %spec.query, error = %e, "Rejected search pattern");
            return SearchOutcome::failed(&spec.query, format!("{e:#}"));
        }
    };

    let mut results = Vec::new();
    let mut total_matches = 0;

    for (index, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let matches = pattern.find_spans(line);
        if matches.is_empty() {
            continue;
        }
        total_matches += matches.len();
        results.push(MatchResult {
            line_number: index + 1,
            content: line.to_string(),
            matches,
        });
    }

    debug!(query = %spec.query, total_matches, lines = results.len(), "Search complete");

    SearchOutcome {
        success: true,
        query: spec.query.clone(),
        total_matches,
        results,
        error: None,
    }
}

/// Replace matches across the whole text (not line by line)
pub fn replace(text: &str, spec: &SearchSpec, replacement: &str) -> ReplaceOutcome {
    let unchanged = |source: String, flags: String, error: Option<String>| ReplaceOutcome {
        success: error.is_none(),
        new_text: text.to_string(),
        replacements: 0,
        pattern_source: source,
        pattern_flags: flags,
        replace_text: replacement.to_string(),
        replace_all: spec.replace_all,
        error,
    };

    if spec.query.is_empty() {
        return unchanged(String::new(), String::new(), None);
    }

    let pattern = match compile_spec(spec, spec.replace_all) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!(query = %spec.query, error = %e, "Rejected replace pattern");
            return unchanged(String::new(), String::new(), Some(format!("{e:#}")));
        }
    };

    let limit = if spec.replace_all { None } else { Some(1) };
    let (new_text, replacements) = pattern.substitute(text, replacement, limit);

    debug!(query = %spec.query, replacements, "Replace complete");

    ReplaceOutcome {
        success: true,
        new_text,
        replacements,
        pattern_source: pattern.source,
        pattern_flags: pattern.flags,
        replace_text: replacement.to_string(),
        replace_all: spec.replace_all,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole_word(query: &str) -> SearchSpec {
        SearchSpec {
            query: query.to_string(),
            whole_word: true,
            ..SearchSpec::default()
        }
    }

    #[test]
    fn test_search_reports_char_offsets() {
        let outcome = search("سطر أول\nهذا مثال مثال آخر", &whole_word("مثال"));
        assert!(outcome.success);
        assert_eq!(outcome.total_matches, 2);
        assert_eq!(outcome.results.len(), 1);

        let result = &outcome.results[0];
        assert_eq!(result.line_number, 2);
        assert_eq!(result.matches[0], MatchSpan { text: "مثال".to_string(), index: 4, length: 4 });
        assert_eq!(result.matches[1].index, 9);
    }

    #[test]
    fn test_literal_query_is_escaped() {
        let outcome = search("a.b axb (x)", &SearchSpec::literal("a.b"));
        assert_eq!(outcome.total_matches, 1);

        let parens = search("a.b axb (x)", &SearchSpec::literal("(x)"));
        assert_eq!(parens.total_matches, 1);
    }

    #[test]
    fn test_whole_word_rejects_partial_words() {
        let outcome = search("مثالي مثال", &whole_word("مثال"));
        assert_eq!(outcome.total_matches, 1);
        assert_eq!(outcome.results[0].matches[0].index, 6);
    }

    #[test]
    fn test_case_sensitivity() {
        let insensitive = search("Cut cut CUT", &SearchSpec::literal("cut"));
        assert_eq!(insensitive.total_matches, 3);

        let sensitive = SearchSpec {
            case_sensitive: true,
            ..SearchSpec::literal("cut")
        };
        assert_eq!(search("Cut cut CUT", &sensitive).total_matches, 1);
    }

    #[test]
    fn test_invalid_regex_is_an_outcome() {
        let spec = SearchSpec {
            use_regex: true,
            ..SearchSpec::literal("(unclosed")
        };
        let outcome = search("text", &spec);
        assert!(!outcome.success);
        assert!(outcome.error.is_some());

        let replaced = replace("text", &spec, "x");
        assert!(!replaced.success);
        assert_eq!(replaced.new_text, "text");
        assert_eq!(replaced.replacements, 0);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let outcome = search("anything", &SearchSpec::default());
        assert!(outcome.success);
        assert_eq!(outcome.total_matches, 0);
    }

    #[test]
    fn test_replace_all_whole_word() {
        let outcome = replace("هذا مثال مثال آخر", &whole_word("مثال"), "كلمة");
        assert!(outcome.success);
        assert_eq!(outcome.replacements, 2);
        assert_eq!(outcome.new_text, "هذا كلمة كلمة آخر");
        assert_eq!(outcome.pattern_source, r"\bمثال\b");
        assert_eq!(outcome.pattern_flags, "gi");
    }

    #[test]
    fn test_replace_first_only_counts_one() {
        let spec = SearchSpec {
            replace_all: false,
            ..SearchSpec::literal("مثال")
        };
        let outcome = replace("مثال مثال", &spec, "كلمة");
        assert_eq!(outcome.new_text, "كلمة مثال");
        assert_eq!(outcome.replacements, 1);
        assert_eq!(outcome.pattern_flags, "i");
    }

    #[test]
    fn test_regex_replacement_groups() {
        let spec = SearchSpec {
            use_regex: true,
            case_sensitive: true,
            ..SearchSpec::literal(r"(\d+)-(\d+)")
        };
        let outcome = replace("12-34 and 5-6", &spec, "$2-$1 $$");
        assert_eq!(outcome.new_text, "34-12 $ and 6-5 $");
        assert_eq!(outcome.replacements, 2);
    }

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let spec: SearchSpec = serde_json::from_str(r#"{"query": "قطع", "wholeWord": true}"#).unwrap();
        assert_eq!(spec.query, "قطع");
        assert!(spec.whole_word);
        assert!(spec.replace_all);
        assert!(!spec.case_sensitive);
    }
}
