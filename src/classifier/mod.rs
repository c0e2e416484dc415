// WHY: Line classifier with an explicit context threaded through one paste operation
// Rules are an ordered table evaluated by a single dispatch loop; the first match wins

use anyhow::Result;
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::{debug, warn};

pub mod action_verbs;
pub mod normalization;
pub mod rules;
pub mod scene_header;

pub use action_verbs::ActionVerbChecker;
pub use rules::{BulletCue, CharacterCueRules, ClassifierRules};
pub use scene_header::{DetailRule, SceneHeader, SceneHeaderClassifier};

use crate::corrector::PostProcessCorrector;
use crate::format::{Block, FormatKind};

/// State threaded line-by-line through one paste operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationContext {
    pub last_format: FormatKind,
    pub in_dialogue_block: bool,
    /// A bulleted "name: text" line was emitted as action for the corrector to split
    pub pending_character_line: bool,
    pub current_character_name: String,
}

impl Default for ClassificationContext {
    fn default() -> Self {
        Self {
            last_format: FormatKind::Action,
            in_dialogue_block: false,
            pending_character_line: false,
            current_character_name: String::new(),
        }
    }
}

impl ClassificationContext {
    /// Context after emitting `block`
    fn advance(&self, block: &Block, pending_cue: bool) -> Self {
        let mut next = self.clone();
        next.last_format = block.format;
        next.pending_character_line = false;

        match block.format {
            FormatKind::Character => {
                next.in_dialogue_block = true;
                next.current_character_name = cue_name(block.text()).to_string();
            }
            FormatKind::Parenthetical | FormatKind::Dialogue => {}
            FormatKind::Action => {
                next.in_dialogue_block = false;
                next.pending_character_line = pending_cue;
            }
            FormatKind::Basmala
            | FormatKind::SceneHeaderFull
            | FormatKind::SceneHeaderSolo
            | FormatKind::SceneHeaderAlt
            | FormatKind::Transition => {
                next.in_dialogue_block = false;
            }
        }

        next
    }
}

/// Speaker name of a cue line: trailing colon and surrounding spaces removed
pub fn cue_name(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed.strip_suffix(':').unwrap_or(trimmed).trim_end()
}

/// One raw line prepared for the rule table
struct LineInput<'a> {
    /// Line as emitted (line terminator removed, bullet marker stripped)
    text: Cow<'a, str>,
    /// Trimmed form used by the predicates
    trimmed: &'a str,
}

type RuleFn = fn(&LineClassifier, &LineInput<'_>, &ClassificationContext) -> Option<Block>;

struct LineRule {
    name: &'static str,
    apply: RuleFn,
}

/// Precedence order: blank, basmala, scene header, transition, character,
/// parenthetical, dialogue continuation, action
const LINE_RULES: &[LineRule] = &[
    LineRule { name: "blank", apply: LineClassifier::blank_rule },
    LineRule { name: "basmala", apply: LineClassifier::basmala_rule },
    LineRule { name: "scene-header", apply: LineClassifier::scene_header_rule },
    LineRule { name: "transition", apply: LineClassifier::transition_rule },
    LineRule { name: "character", apply: LineClassifier::character_rule },
    LineRule { name: "parenthetical", apply: LineClassifier::parenthetical_rule },
    LineRule { name: "dialogue", apply: LineClassifier::dialogue_rule },
    LineRule { name: "action", apply: LineClassifier::action_rule },
];

/// Paste-time classifier: single-line rules plus the second-pass corrector
pub struct LineClassifier {
    rules: ClassifierRules,
    scene_headers: SceneHeaderClassifier,
    corrector: PostProcessCorrector,
}

impl LineClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: ClassifierRules::new()?,
            scene_headers: SceneHeaderClassifier::new()?,
            corrector: PostProcessCorrector::new()?,
        })
    }

    pub fn with_parts(
        rules: ClassifierRules,
        scene_headers: SceneHeaderClassifier,
        corrector: PostProcessCorrector,
    ) -> Self {
        Self {
            rules,
            scene_headers,
            corrector,
        }
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    pub fn scene_headers(&self) -> &SceneHeaderClassifier {
        &self.scene_headers
    }

    pub fn corrector(&self) -> &PostProcessCorrector {
        &self.corrector
    }

    /// Classify one line against the context before it.
    ///
    /// Pure: the same `(line, context)` always yields the same
    /// `(block, context_after)`.
    pub fn classify_line(&self, line: &str, context: &ClassificationContext) -> (Block, ClassificationContext) {
        let line = line.strip_suffix('\r').unwrap_or(line);

        // A bulleted "name: text" stays whole so the corrector can split it
        if let Some(stripped) = ClassifierRules::strip_bullet(line) {
            if self.bullet_cue_for_corrector(line).is_some() {
                let block = Block::new(FormatKind::Action, line);
                let next = context.advance(&block, true);
                return (block, next);
            }

            let input = LineInput {
                text: Cow::Owned(stripped.to_string()),
                trimmed: stripped.trim(),
            };
            return self.dispatch(&input, context);
        }

        let input = LineInput {
            text: Cow::Borrowed(line),
            trimmed: line.trim(),
        };
        self.dispatch(&input, context)
    }

    /// Classify every line of a pasted text without the corrector pass
    pub fn classify_lines(&self, text: &str) -> Vec<Block> {
        let mut context = ClassificationContext::default();
        let mut blocks = Vec::new();

        for line in text.split('\n') {
            let (block, next) = self.classify_line(line, &context);
            blocks.push(block);
            context = next;
        }

        blocks
    }

    /// Full paste pipeline: classify line by line, then run the corrector
    pub fn classify_pasted_text(&self, text: &str) -> Vec<Block> {
        let blocks = self.classify_lines(text);
        let raw_count = blocks.len();
        let corrected = self.corrector.correct(&self.rules, blocks);

        debug!(
            lines = raw_count,
            blocks = corrected.len(),
            "Classified pasted text"
        );
        corrected
    }

    fn bullet_cue_for_corrector(&self, line: &str) -> Option<BulletCue> {
        self.rules
            .bullet_cue(line)
            .filter(|cue| self.rules.is_character_line(&format!("{}:", cue.name), None))
    }

    fn dispatch(&self, input: &LineInput<'_>, context: &ClassificationContext) -> (Block, ClassificationContext) {
        for rule in LINE_RULES {
            if let Some(block) = (rule.apply)(self, input, context) {
                let next = context.advance(&block, false);
                return (block, next);
            }
        }

        // The action rule always matches; reaching here means the table was edited badly
        debug_assert!(false, "no line rule matched");
        warn!(line = input.trimmed, "No line rule matched, falling back to action");
        let block = Block::new(FormatKind::Action, input.text.as_ref());
        let next = context.advance(&block, false);
        (block, next)
    }

    fn blank_rule(&self, input: &LineInput<'_>, _context: &ClassificationContext) -> Option<Block> {
        ClassifierRules::is_blank(input.trimmed).then(|| Block::new(FormatKind::Action, ""))
    }

    fn basmala_rule(&self, input: &LineInput<'_>, _context: &ClassificationContext) -> Option<Block> {
        self.rules
            .is_basmala(input.trimmed)
            .then(|| Block::new(FormatKind::Basmala, input.text.as_ref()))
    }

    fn scene_header_rule(&self, input: &LineInput<'_>, _context: &ClassificationContext) -> Option<Block> {
        self.scene_headers.classify(input.trimmed).map(SceneHeader::into_block)
    }

    fn transition_rule(&self, input: &LineInput<'_>, _context: &ClassificationContext) -> Option<Block> {
        self.rules
            .is_transition(input.trimmed)
            .then(|| Block::new(FormatKind::Transition, input.text.as_ref()))
    }

    fn character_rule(&self, input: &LineInput<'_>, context: &ClassificationContext) -> Option<Block> {
        self.rules
            .is_character_line(input.trimmed, Some(context))
            .then(|| Block::new(FormatKind::Character, input.text.as_ref()))
    }

    fn parenthetical_rule(&self, input: &LineInput<'_>, context: &ClassificationContext) -> Option<Block> {
        (context.in_dialogue_block && ClassifierRules::is_paren_shaped(input.trimmed))
            .then(|| Block::new(FormatKind::Parenthetical, input.text.as_ref()))
    }

    fn dialogue_rule(&self, input: &LineInput<'_>, context: &ClassificationContext) -> Option<Block> {
        if !context.in_dialogue_block || input.trimmed.contains(':') {
            return None;
        }
        // Action wins the tie so a stage direction can interrupt dialogue without a blank line
        if self.rules.is_likely_action(input.trimmed) {
            return None;
        }
        Some(Block::new(FormatKind::Dialogue, input.text.as_ref()))
    }

    fn action_rule(&self, input: &LineInput<'_>, _context: &ClassificationContext) -> Option<Block> {
        let cleaned = self.rules.strip_leading_dash(input.text.as_ref());
        Some(Block::new(FormatKind::Action, cleaned))
    }

    /// Rule names in evaluation order, for diagnostics
    pub fn rule_names() -> impl Iterator<Item = &'static str> {
        LINE_RULES.iter().map(|rule| rule.name)
    }
}

static SHARED_CLASSIFIER: OnceLock<Option<LineClassifier>> = OnceLock::new();

/// Process-wide classifier built from the built-in pattern tables.
///
/// None only if the built-in patterns failed to compile; callers degrade to
/// plain action blocks in that case.
pub fn shared_classifier() -> Option<&'static LineClassifier> {
    SHARED_CLASSIFIER
        .get_or_init(|| match LineClassifier::new() {
            Ok(classifier) => Some(classifier),
            Err(e) => {
                warn!(error = %e, "Built-in screenplay patterns failed to compile");
                None
            }
        })
        .as_ref()
}

/// Degraded pipeline used when no classifier is available: every line is action
pub fn fallback_blocks(text: &str) -> Vec<Block> {
    text.split('\n')
        .map(|line| Block::new(FormatKind::Action, line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_classifier() -> &'static LineClassifier {
        shared_classifier().unwrap()
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = LineClassifier::rule_names().collect();
        assert_eq!(
            names,
            ["blank", "basmala", "scene-header", "transition", "character", "parenthetical", "dialogue", "action"]
        );
    }

    #[test]
    fn test_character_opens_dialogue_block() {
        let classifier = get_classifier();
        let (block, ctx) = classifier.classify_line("أحمد:", &ClassificationContext::default());
        assert_eq!(block, Block::new(FormatKind::Character, "أحمد:"));
        assert!(ctx.in_dialogue_block);
        assert_eq!(ctx.current_character_name, "أحمد");
        assert_eq!(ctx.last_format, FormatKind::Character);

        let (block, ctx) = classifier.classify_line("مرحبا", &ctx);
        assert_eq!(block, Block::new(FormatKind::Dialogue, "مرحبا"));
        assert!(ctx.in_dialogue_block);
    }

    #[test]
    fn test_blank_and_headers_close_dialogue() {
        let classifier = get_classifier();
        let (_, in_dialogue) = classifier.classify_line("سارة:", &ClassificationContext::default());

        for line in ["", "مشهد 3", "قطع"] {
            let (_, ctx) = classifier.classify_line(line, &in_dialogue);
            assert!(!ctx.in_dialogue_block, "{line:?} should close the dialogue block");
            assert!(!ctx.pending_character_line);
        }
    }

    #[test]
    fn test_parenthetical_only_inside_dialogue() {
        let classifier = get_classifier();
        let (_, in_dialogue) = classifier.classify_line("سارة:", &ClassificationContext::default());

        let (block, ctx) = classifier.classify_line("(بهدوء)", &in_dialogue);
        assert_eq!(block.format, FormatKind::Parenthetical);
        assert!(ctx.in_dialogue_block);

        let (block, _) = classifier.classify_line("(بهدوء)", &ClassificationContext::default());
        assert_eq!(block.format, FormatKind::Action);
    }

    #[test]
    fn test_action_interrupts_dialogue() {
        let classifier = get_classifier();
        let (_, in_dialogue) = classifier.classify_line("سارة:", &ClassificationContext::default());
        let (block, ctx) = classifier.classify_line("تقف سارة وتخرج", &in_dialogue);
        assert_eq!(block.format, FormatKind::Action);
        assert!(!ctx.in_dialogue_block);
    }

    #[test]
    fn test_bullet_cue_left_for_corrector() {
        let classifier = get_classifier();
        let (block, ctx) = classifier.classify_line("• أحمد: مرحبا كيف حالك", &ClassificationContext::default());
        assert_eq!(block, Block::new(FormatKind::Action, "• أحمد: مرحبا كيف حالك"));
        assert!(ctx.pending_character_line);
    }

    #[test]
    fn test_plain_bullet_is_stripped() {
        let classifier = get_classifier();
        let (block, _) = classifier.classify_line("- يدخل أحمد", &ClassificationContext::default());
        assert_eq!(block, Block::new(FormatKind::Action, "يدخل أحمد"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let classifier = get_classifier();
        let blocks = classifier.classify_lines("أحمد:\r\nمرحبا\r");
        assert_eq!(blocks[0], Block::new(FormatKind::Character, "أحمد:"));
        assert_eq!(blocks[1], Block::new(FormatKind::Dialogue, "مرحبا"));
    }

    #[test]
    fn test_fallback_blocks() {
        let blocks = fallback_blocks("a\r\nb");
        assert_eq!(blocks, vec![Block::new(FormatKind::Action, "a"), Block::new(FormatKind::Action, "b")]);
    }
}
