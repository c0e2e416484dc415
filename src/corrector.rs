// WHY: Second pass repairing two known misclassification shapes after line classification
// Works on a worklist so a rewritten block is re-examined until stable (idempotent)

use anyhow::Result;
use regex_automata::meta::Regex;
use std::collections::VecDeque;
use tracing::debug;

use crate::classifier::normalization::{char_len, word_count};
use crate::classifier::ClassifierRules;
use crate::format::{Block, FormatKind};

/// Thresholds for turning an unmarked long dialogue block into action
#[derive(Debug, Clone)]
pub struct CorrectorRules {
    /// Dialogue must be longer than this many characters
    pub min_chars: usize,
    /// and have more than this many words
    pub min_words: usize,
}

impl Default for CorrectorRules {
    fn default() -> Self {
        Self {
            min_chars: 20,
            min_words: 5,
        }
    }
}

enum Rewrite {
    Keep(Block),
    /// Bulleted cue split into a character block and the dialogue that followed it
    Split { character: Block, dialogue: Block },
    Reclassified(Block),
}

pub struct PostProcessCorrector {
    action_start: Regex,
    dashed: Regex,
    observation_start: Regex,
    narrated_verb: Regex,
    rules: CorrectorRules,
}

impl PostProcessCorrector {
    pub fn new() -> Result<Self> {
        Self::with_rules(CorrectorRules::default())
    }

    pub fn with_rules(rules: CorrectorRules) -> Result<Self> {
        let action_start = r"^\s*[-–—]?\s*(?:[يت][\x{0600}-\x{06FF}]+|نرى|ننظر|نسمع|نلاحظ|يبدو|يظهر|يبدأ|ينتهي|يستمر|يتوقف|يتحرك|يحدث|يكون|يوجد|توجد|تظهر)";
        let dashed = r"^\s*[-–—]\s*.+";
        let observation_start = r"^\s*(?:نرى|ننظر|نسمع|نلاحظ|نشهد|نشاهد|نلمس|نشعر|نصدق|نفهم|نشك|نتمنى|نأمل|نخشى|نخاف|نحب|نكره|نحسد|نغبط)";
        // Verb between spaces anywhere in the line; the list is kept verbatim, odd spellings included
        let narrated_verb = concat!(
            r"\s+(?:يقول|تقول|قال|قالت|يقوم|تقوم|يبدأ|تبدأ|ينتهي|تنتهي|يذهب|تذهب|يكتب|تكتب|ينظر|تنظر|",
            r"يبتسم|تبتسم|يقف|تقف|يجلس|تجلس|يدخل|تدخل|يخرج|تخرج|يركض|تركض|يمشي|تمشي|يجري|تجرى|",
            r"يصرخ|اصرخ|يبكي|تبكي|يضحك|تضحك|يغني|تغني|يرقص|ترقص|يأكل|تأكل|يشرب|تشرب|ينام|تنام|",
            r"يستيقظ|تستيقظ|يقرأ|تقرأ|يسمع|تسمع|يشم|تشم|يلمس|تلمس|يأخذ|تأخذ|يعطي|تعطي|يفتح|تفتح|",
            r"يغلق|تغلق|يعود|تعود|يأتي|تأتي|يموت|تموت|يحيا|تحيا|يقاتل|تقاتل|ينصر|تنتصر|يخسر|تخسر|",
            r"يرسم|ترسم|يصمم|تخطط|يقرر|تقرر|يفكر|تفكر|يتذكر|تذكر|يحاول|تحاول|يستطيع|تستطيع|يريد|تريد|",
            r"يحتاج|تحتاج|يبحث|تبحث|يجد|تجد|يفقد|تفقد|يحمي|تحمي|يراقب|تراقب|يخفي|تخفي|يكشف|تكشف|",
            r"يكتشف|تكتشف|يعرف|تعرف|يتعلم|تعلن|يعلم)\s+",
        );

        Ok(Self {
            action_start: Regex::new(action_start)?,
            dashed: Regex::new(dashed)?,
            observation_start: Regex::new(observation_start)?,
            narrated_verb: Regex::new(narrated_verb)?,
            rules,
        })
    }

    pub fn rules(&self) -> &CorrectorRules {
        &self.rules
    }

    /// Correct a classified block sequence. Order is preserved and no text is
    /// dropped except the bullet marker and cue colon of a split line.
    pub fn correct(&self, classifier: &ClassifierRules, blocks: Vec<Block>) -> Vec<Block> {
        let mut pending: VecDeque<Block> = blocks.into();
        let mut corrected = Vec::with_capacity(pending.len());
        let mut splits = 0usize;
        let mut reclassified = 0usize;

        while let Some(block) = pending.pop_front() {
            match self.rewrite(classifier, block) {
                Rewrite::Keep(block) => corrected.push(block),
                Rewrite::Split { character, dialogue } => {
                    splits += 1;
                    corrected.push(character);
                    pending.push_front(dialogue);
                }
                Rewrite::Reclassified(block) => {
                    reclassified += 1;
                    pending.push_front(block);
                }
            }
        }

        if splits > 0 || reclassified > 0 {
            debug!(splits, reclassified, "Corrected classified blocks");
        }
        corrected
    }

    fn rewrite(&self, classifier: &ClassifierRules, block: Block) -> Rewrite {
        match block.format {
            FormatKind::Action => match self.split_bullet_cue(classifier, block.text()) {
                Some((character, dialogue)) => Rewrite::Split { character, dialogue },
                None => Rewrite::Keep(block),
            },
            FormatKind::Dialogue if self.is_misplaced_action(block.text()) => {
                let text = classifier.strip_leading_dash(block.text());
                Rewrite::Reclassified(Block::new(FormatKind::Action, text))
            }
            _ => Rewrite::Keep(block),
        }
    }

    fn split_bullet_cue(&self, classifier: &ClassifierRules, text: &str) -> Option<(Block, Block)> {
        let cue = classifier.bullet_cue(text)?;
        let cue_line = format!("{}:", cue.name);
        if !classifier.is_character_line(&cue_line, None) {
            return None;
        }
        Some((
            Block::new(FormatKind::Character, cue_line),
            Block::new(FormatKind::Dialogue, cue.dialogue),
        ))
    }

    /// Dialogue that reads as stage action: opens with a verb or dash, narrates
    /// a verb mid-line, or is long
    pub fn is_misplaced_action(&self, text: &str) -> bool {
        let patterns = [&self.action_start, &self.dashed, &self.observation_start, &self.narrated_verb];
        if patterns.iter().any(|regex| regex.is_match(text)) {
            return true;
        }
        char_len(text) > self.rules.min_chars && word_count(text) > self.rules.min_words
    }
}
