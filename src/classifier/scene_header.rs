// WHY: Scene headers carry two display segments (head + time/place detail) and need
// their own splitter; everything else in the classifier is one segment per line

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::warn;

use crate::format::{Block, FormatKind};

/// Which rule accepted the detail segment of a full header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailRule {
    /// Time of day or interior/exterior vocabulary ("ليل/داخلي")
    TimePlace,
    /// Any detail containing a dash separator
    Dashed,
    /// Any other trailing text
    Freeform,
}

/// A recognized scene header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHeader {
    pub format: FormatKind,
    pub head: String,
    pub detail: Option<String>,
    pub detail_rule: Option<DetailRule>,
}

impl SceneHeader {
    pub fn into_block(self) -> Block {
        match self.detail {
            Some(detail) => Block::scene_header_full(self.head, detail),
            None => Block::new(self.format, self.head),
        }
    }
}

pub struct SceneHeaderClassifier {
    numbered: Regex,
    time: Regex,
    in_out: Regex,
    place: Regex,
}

impl SceneHeaderClassifier {
    pub fn new() -> Result<Self> {
        let numbered = r"^((?:مشهد|م\.)\s*\d+)\s*[-–—:،]?\s*(.*)$";
        let time = r"(?i)ليل|نهار|صباح|مساء|فجر|ظهر|عصر|المغرب|الغروب|الفجر";
        let in_out = r"(?i)داخلي|خارجي|د\.|خ\.";

        // Place nouns that open a standalone location line ("scene-header-3")
        let places = [
            "مسجد", "بيت", "منزل", "شارع", "حديقة", "مدرسة", "جامعة", "مكتب", "محل", "مستشفى",
            "مطعم", "فندق", "سيارة", "غرفة", "قاعة", "ممر", "سطح", "ساحة", "مقبرة", "مخبز",
            "مكتبة", "نهر", "بحر", "جبل", "غابة", "سوق", "مصنع", "بنك", "محكمة", "سجن",
            "موقف", "محطة", "مطار", "ميناء", "كوبرى", "نفق", "مبنى", "قصر", "نادي", "ملعب",
            "ملهى", "بار", "كازينو", "متحف", "مسرح", "سينما", "معرض", "مزرعة", "مختبر", "مستودع",
            "مقهى", "شركة", "كهف", "الكهف",
        ];
        let place = format!("(?i)^(?:{})", places.join("|"));

        Ok(Self {
            numbered: Regex::new(numbered)?,
            time: Regex::new(time)?,
            in_out: Regex::new(in_out)?,
            place: Regex::new(&place)?,
        })
    }

    /// Recognize a scene header. Returns None for every other line.
    pub fn classify(&self, line: &str) -> Option<SceneHeader> {
        let trimmed = line.trim();

        if let Some(header) = self.classify_numbered(trimmed) {
            return Some(header);
        }

        if self.place.is_match(trimmed) {
            return Some(SceneHeader {
                format: FormatKind::SceneHeaderAlt,
                head: trimmed.to_string(),
                detail: None,
                detail_rule: None,
            });
        }

        None
    }

    fn classify_numbered(&self, trimmed: &str) -> Option<SceneHeader> {
        let mut caps = self.numbered.create_captures();
        self.numbered.captures(trimmed, &mut caps);
        if !caps.is_match() {
            return None;
        }

        let Some(head) = caps.get_group(1).map(|span| trimmed[span.range()].trim()) else {
            warn!(line = trimmed, "Scene header matched without a head group");
            return None;
        };
        let rest = caps
            .get_group(2)
            .map(|span| trimmed[span.range()].trim())
            .unwrap_or("");

        if rest.is_empty() {
            return Some(SceneHeader {
                format: FormatKind::SceneHeaderSolo,
                head: head.to_string(),
                detail: None,
                detail_rule: None,
            });
        }

        let detail_rule = if self.time.is_match(rest) || self.in_out.is_match(rest) {
            DetailRule::TimePlace
        } else if rest.contains(['-', '\u{2013}']) {
            DetailRule::Dashed
        } else {
            DetailRule::Freeform
        };

        Some(SceneHeader {
            format: FormatKind::SceneHeaderFull,
            head: head.to_string(),
            detail: Some(rest.to_string()),
            detail_rule: Some(detail_rule),
        })
    }
}
