// WHY: Status-bar counters and the cast list, derived from text and blocks only

use regex_automata::meta::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::warn;

use crate::classifier::cue_name;
use crate::format::{Block, FormatKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DocumentStats {
    /// Unicode scalar values, newlines included
    pub characters: usize,
    pub words: usize,
    /// Occurrences of "مشهد N" anywhere in the text
    pub scenes: usize,
}

static SCENE_MARKER: OnceLock<Option<Regex>> = OnceLock::new();

fn scene_marker() -> Option<&'static Regex> {
    SCENE_MARKER
        .get_or_init(|| match Regex::new(r"مشهد\s*\d+") {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(error = %e, "Scene marker pattern failed to compile");
                None
            }
        })
        .as_ref()
}

pub fn document_stats(text: &str) -> DocumentStats {
    DocumentStats {
        characters: text.chars().count(),
        words: text.split_whitespace().count(),
        scenes: scene_marker().map_or(0, |regex| regex.find_iter(text).count()),
    }
}

/// Distinct speaker names in order of first appearance
pub fn character_names(blocks: &[Block]) -> Vec<String> {
    let mut seen = HashSet::new();
    blocks
        .iter()
        .filter(|block| block.format == FormatKind::Character)
        .map(|block| cue_name(block.text()))
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_stats() {
        let stats = document_stats("مشهد 1 - ليل\nأحمد:\nمرحبا\nمشهد2");
        assert_eq!(stats.scenes, 2);
        assert_eq!(stats.words, 7);
        assert_eq!(stats.characters, "مشهد 1 - ليل\nأحمد:\nمرحبا\nمشهد2".chars().count());
        assert_eq!(document_stats(""), DocumentStats::default());
    }

    #[test]
    fn test_character_names_in_first_appearance_order() {
        let blocks = vec![
            Block::new(FormatKind::Character, "سارة:"),
            Block::new(FormatKind::Dialogue, "أحمد:"),
            Block::new(FormatKind::Character, "أحمد :"),
            Block::new(FormatKind::Character, "سارة:"),
        ];
        assert_eq!(character_names(&blocks), vec!["سارة", "أحمد"]);
    }
}
