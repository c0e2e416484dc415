// WHY: Single-line predicates evaluated in a fixed precedence order by the line classifier
// Each predicate looks at one trimmed line; only the cue test consults the context

use anyhow::Result;
use regex_automata::meta::Regex;

use super::action_verbs::{ActionVerbChecker, OBSERVATION_VERBS};
use super::normalization::{has_sentence_punctuation, normalize_line, text_inside_parens, word_count};
use super::ClassificationContext;

/// Arabic script blocks accepted in a bare character cue
const ARABIC_SCRIPT: &str = r"\x{0600}-\x{06FF}\x{0750}-\x{077F}\x{08A0}-\x{08FF}\x{FB50}-\x{FDFF}\x{FE70}-\x{FEFF}";

/// Core Arabic block used by the action heuristics
const ARABIC_CORE: &str = r"\x{0600}-\x{06FF}";

/// Leading markers that turn a line into a bulleted item
pub const BULLET_MARKERS: &[char] = &[
    '•', '·', '●', '○', '■', '▪', '▫', '\u{2013}', '\u{2014}', '‣', '⁃', '-',
];

/// Thresholds for accepting a line as a character cue
#[derive(Debug, Clone)]
pub struct CharacterCueRules {
    /// Cues longer than this many words are never names
    pub max_words: usize,
    /// Word limit for a cue written without a trailing colon
    pub max_bare_words: usize,
}

impl Default for CharacterCueRules {
    fn default() -> Self {
        Self {
            max_words: 7,
            max_bare_words: 3,
        }
    }
}

/// A bulleted "name: text" line, e.g. "• أحمد: مرحبا"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletCue {
    pub name: String,
    pub dialogue: String,
}

/// Compiled single-line predicates
pub struct ClassifierRules {
    basmala: Regex,
    scene_start: Regex,
    transition: Regex,
    arabic_cue: Regex,
    observation_start: Regex,
    verb_then_foreign: Regex,
    bullet_cue: Regex,
    leading_dash: Regex,
    verbs: ActionVerbChecker,
    cue_rules: CharacterCueRules,
}

impl ClassifierRules {
    pub fn new() -> Result<Self> {
        Self::with_cue_rules(CharacterCueRules::default())
    }

    pub fn with_cue_rules(cue_rules: CharacterCueRules) -> Result<Self> {
        let basmala = r"^[{}]*\s*بسم\s+الله\s+الرحمن\s+الرحيم\s*[{}]*$";
        let scene_start = r"^\s*(?:مشهد|م\.)\s*\d+";
        let transition = r"(?i)^\s*(?:قطع|قطع\s+إلى|إلى|مزج|ذوبان|خارج\s+المشهد|CUT\s+TO:?|FADE\s+IN:|FADE\s+OUT:)\s*$";
        let arabic_cue = format!(r"^[\s{ARABIC_SCRIPT}]+[:\s]*$");

        let observation_verbs = OBSERVATION_VERBS.join("|");
        let observation_start = format!(r"^\s*[-–—]?\s*(?:{observation_verbs})");
        // A ي/ت-initial word followed by non-Arabic content ("يرفع 3 أصابع" counts, "يرفع يده" does not)
        let verb_then_foreign = format!(
            r"^\s*[-–—]?\s*[يت][{ARABIC_CORE}]+\s+(?:[^\s{ARABIC_CORE}]*\s*)*[^\s{ARABIC_CORE}]"
        );
        let bullet_cue = r"^\s*[•·●○■▪▫–—‣⁃-]([^:]+):(.*)$";
        let leading_dash = r"^\s*[-–—]\s*";

        Ok(Self {
            basmala: Regex::new(basmala)?,
            scene_start: Regex::new(scene_start)?,
            transition: Regex::new(transition)?,
            arabic_cue: Regex::new(&arabic_cue)?,
            observation_start: Regex::new(&observation_start)?,
            verb_then_foreign: Regex::new(&verb_then_foreign)?,
            bullet_cue: Regex::new(bullet_cue)?,
            leading_dash: Regex::new(leading_dash)?,
            verbs: ActionVerbChecker::new(),
            cue_rules,
        })
    }

    pub fn cue_rules(&self) -> &CharacterCueRules {
        &self.cue_rules
    }

    pub fn verbs(&self) -> &ActionVerbChecker {
        &self.verbs
    }

    pub fn is_blank(line: &str) -> bool {
        line.trim().is_empty()
    }

    pub fn is_basmala(&self, line: &str) -> bool {
        self.basmala.is_match(line.trim())
    }

    /// "مشهد N" or "م. N" at the start of the line
    pub fn is_scene_header_start(&self, line: &str) -> bool {
        self.scene_start.is_match(line)
    }

    pub fn is_transition(&self, line: &str) -> bool {
        self.transition.is_match(line)
    }

    pub fn is_paren_shaped(line: &str) -> bool {
        text_inside_parens(line).is_some()
    }

    /// Character cue test.
    ///
    /// A line ending in ':' is a cue when it is short and does not open with an
    /// action verb. A bare line of a few Arabic words is a cue only outside a
    /// dialogue block; inside one it reads as dialogue.
    pub fn is_character_line(&self, line: &str, context: Option<&ClassificationContext>) -> bool {
        if self.is_scene_header_start(line) || self.is_transition(line) || Self::is_paren_shaped(line) {
            return false;
        }

        if word_count(line) > self.cue_rules.max_words {
            return false;
        }

        let trimmed = line.trim();
        let normalized = normalize_line(trimmed.trim_end_matches(':'));
        if self.verbs.starts_with_action_verb(&normalized) {
            return false;
        }

        if let Some(name) = trimmed.strip_suffix(':') {
            return !name.trim().is_empty();
        }

        if trimmed.contains(':') {
            return false;
        }

        if context.is_some_and(|ctx| ctx.in_dialogue_block) {
            return false;
        }

        if word_count(trimmed) > self.cue_rules.max_bare_words || self.observation_start.is_match(trimmed) {
            return false;
        }

        self.arabic_cue.is_match(trimmed)
    }

    /// Heuristic action test; never true for a line matching a stronger shape
    pub fn is_likely_action(&self, line: &str) -> bool {
        if Self::is_blank(line)
            || self.is_basmala(line)
            || self.is_scene_header_start(line)
            || self.is_transition(line)
            || self.is_character_line(line, None)
            || Self::is_paren_shaped(line)
        {
            return false;
        }

        if self.observation_start.is_match(line) || self.verb_then_foreign.is_match(line) {
            return true;
        }

        let normalized = normalize_line(self.strip_leading_dash(line));
        if self.verbs.starts_with_action_verb(&normalized) {
            return true;
        }

        let has_colon = line.contains(':');
        if has_sentence_punctuation(line) && !has_colon {
            return self.verbs.contains_action_verb(&normalized);
        }

        if word_count(line) > 5 && !has_colon {
            return self.verbs.contains_action_verb(&normalized);
        }

        false
    }

    /// Split a bulleted "name: text" line. Returns None when the shape does
    /// not match or the name part is blank.
    pub fn bullet_cue(&self, line: &str) -> Option<BulletCue> {
        let mut caps = self.bullet_cue.create_captures();
        self.bullet_cue.captures(line, &mut caps);
        if !caps.is_match() {
            return None;
        }

        let name = caps.get_group(1).map(|span| line[span.range()].trim())?;
        let dialogue = caps.get_group(2).map(|span| line[span.range()].trim()).unwrap_or("");
        if name.is_empty() {
            return None;
        }

        Some(BulletCue {
            name: name.to_string(),
            dialogue: dialogue.to_string(),
        })
    }

    /// Strip one leading bullet marker; None when the line has none
    pub fn strip_bullet(line: &str) -> Option<&str> {
        let trimmed = line.trim_start();
        let rest = trimmed.strip_prefix(BULLET_MARKERS)?;
        Some(rest.trim_start())
    }

    /// Strip a leading dash (and the spaces around it) from an action line
    pub fn strip_leading_dash<'a>(&self, line: &'a str) -> &'a str {
        match self.leading_dash.find(line) {
            Some(mat) => &line[mat.end()..],
            None => line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatKind;
    use std::sync::OnceLock;

    static SHARED_RULES: OnceLock<ClassifierRules> = OnceLock::new();

    fn get_rules() -> &'static ClassifierRules {
        SHARED_RULES.get_or_init(|| ClassifierRules::new().unwrap())
    }

    fn in_dialogue() -> ClassificationContext {
        ClassificationContext {
            last_format: FormatKind::Character,
            in_dialogue_block: true,
            pending_character_line: false,
            current_character_name: "أحمد".to_string(),
        }
    }

    #[test]
    fn test_basmala_variants() {
        let rules = get_rules();
        assert!(rules.is_basmala("بسم الله الرحمن الرحيم"));
        assert!(rules.is_basmala("}بسم الله الرحمن الرحيم{"));
        assert!(rules.is_basmala("  بسم  الله الرحمن   الرحيم  "));
        assert!(!rules.is_basmala("مرحباً بك"));
    }

    #[test]
    fn test_scene_header_start() {
        let rules = get_rules();
        assert!(rules.is_scene_header_start("مشهد 1"));
        assert!(rules.is_scene_header_start("م. 1"));
        assert!(rules.is_scene_header_start("مشهد 1 - ليل-داخلي"));
        assert!(!rules.is_scene_header_start("المشهد الأول"));
    }

    #[test]
    fn test_transitions_whole_line() {
        let rules = get_rules();
        for line in ["قطع", "قطع إلى", "مزج", "ذوبان", "خارج المشهد", "CUT TO:", "cut to", "FADE OUT:"] {
            assert!(rules.is_transition(line), "Should detect transition: {line}");
        }
        assert!(!rules.is_transition("قطع الحبل"));
    }

    #[test]
    fn test_character_line_shapes() {
        let rules = get_rules();
        assert!(rules.is_character_line("محمد:", None));
        assert!(rules.is_character_line("فاطمة:", None));
        assert!(rules.is_character_line("صوت أحمد", None));
        assert!(!rules.is_character_line("يدخل محمد", None));
        assert!(!rules.is_character_line("يدخل:", None));
        assert!(!rules.is_character_line("محمد: مرحباً بك", None));
        assert!(!rules.is_character_line(":", None));
        assert!(!rules.is_character_line("(بهدوء)", None));
        assert!(!rules.is_character_line("مشهد 3", None));
        assert!(!rules.is_character_line("الرجل العجوز يفتح النافذة ببطء", None));
        assert!(!rules.is_character_line("نرى البحر", None));
    }

    #[test]
    fn test_bare_cue_needs_context_outside_dialogue() {
        let rules = get_rules();
        let ctx = in_dialogue();
        assert!(rules.is_character_line("مرحبا", None));
        assert!(!rules.is_character_line("مرحبا", Some(&ctx)));
        // A colon cue still interrupts dialogue
        assert!(rules.is_character_line("سارة:", Some(&ctx)));
    }

    #[test]
    fn test_likely_action() {
        let rules = get_rules();
        assert!(rules.is_likely_action("يدخل محمد"));
        assert!(rules.is_likely_action("تبتسم فاطمة"));
        assert!(rules.is_likely_action("نرى الباب مفتوحا"));
        assert!(rules.is_likely_action("- يخرج علي"));
        assert!(!rules.is_likely_action("مرحباً بك"));
        assert!(!rules.is_likely_action(""));
        assert!(!rules.is_likely_action("محمد:"));
    }

    #[test]
    fn test_bullet_cue() {
        let rules = get_rules();
        let cue = rules.bullet_cue("• أحمد: مرحبا كيف حالك").unwrap();
        assert_eq!(cue.name, "أحمد");
        assert_eq!(cue.dialogue, "مرحبا كيف حالك");

        assert!(rules.bullet_cue("• : نص").is_none());
        assert!(rules.bullet_cue("أحمد: مرحبا").is_none());
        assert!(rules.bullet_cue("• يدخل أحمد").is_none());
    }

    #[test]
    fn test_strip_markers() {
        let rules = get_rules();
        assert_eq!(ClassifierRules::strip_bullet("• يدخل أحمد"), Some("يدخل أحمد"));
        assert_eq!(ClassifierRules::strip_bullet("  — نرى البحر"), Some("نرى البحر"));
        assert_eq!(ClassifierRules::strip_bullet("يدخل"), None);
        assert_eq!(rules.strip_leading_dash(" – يدخل"), "يدخل");
        assert_eq!(rules.strip_leading_dash("يدخل"), "يدخل");
    }
}
