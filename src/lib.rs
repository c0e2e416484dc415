pub mod classifier;
pub mod corrector;
pub mod format;
pub mod format_state;
pub mod position;
pub mod reader;
pub mod search;
pub mod stats;

// Re-export main types for convenient access
pub use classifier::{
    shared_classifier, ClassificationContext, ClassifierRules, LineClassifier, SceneHeaderClassifier,
};
pub use corrector::{CorrectorRules, PostProcessCorrector};
pub use format::{Block, FormatKind};
pub use format_state::{next_format_on_enter, next_format_on_tab, FormatKey, FormatStateMachine};
pub use search::{
    apply_patches, rename_character, rename_character_in_runs, replace, replace_in_runs, search,
    MatchResult, RenameOutcome, ReplaceOutcome, RunPatch, SearchOutcome, SearchSpec,
};
pub use stats::{character_names, document_stats, DocumentStats};

/// Full paste pipeline: line classification followed by the corrector.
///
/// Never fails; without a usable classifier every line becomes an action block.
pub fn classify_pasted_text(raw_text: &str) -> Vec<Block> {
    match shared_classifier() {
        Some(classifier) => classifier.classify_pasted_text(raw_text),
        None => classifier::fallback_blocks(raw_text),
    }
}
