// WHY: Shared vocabulary between the classifier, corrector, state machine and renderer
// Block sequences are plain data so any renderer can consume them

use serde::Serialize;
use std::fmt;

/// Closed set of screenplay element formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    Basmala,
    /// Scene head plus time/place detail
    SceneHeaderFull,
    /// Scene head only ("مشهد 2")
    SceneHeaderSolo,
    /// Standalone place line ("scene-header-3")
    SceneHeaderAlt,
    Character,
    Parenthetical,
    Dialogue,
    Transition,
    Action,
}

impl FormatKind {
    pub const ALL: [FormatKind; 9] = [
        FormatKind::Basmala,
        FormatKind::SceneHeaderFull,
        FormatKind::SceneHeaderSolo,
        FormatKind::SceneHeaderAlt,
        FormatKind::Character,
        FormatKind::Parenthetical,
        FormatKind::Dialogue,
        FormatKind::Transition,
        FormatKind::Action,
    ];

    /// CSS class name used by the editor for this format
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Basmala => "basmala",
            FormatKind::SceneHeaderFull => "scene-header-full",
            FormatKind::SceneHeaderSolo => "scene-header-solo",
            FormatKind::SceneHeaderAlt => "scene-header-alt",
            FormatKind::Character => "character",
            FormatKind::Parenthetical => "parenthetical",
            FormatKind::Dialogue => "dialogue",
            FormatKind::Transition => "transition",
            FormatKind::Action => "action",
        }
    }

    pub fn is_scene_header(&self) -> bool {
        matches!(
            self,
            FormatKind::SceneHeaderFull | FormatKind::SceneHeaderSolo | FormatKind::SceneHeaderAlt
        )
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified element of a screenplay.
///
/// Most formats carry a single segment. `SceneHeaderFull` carries two: the
/// scene head ("مشهد 1") and the time/place detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub format: FormatKind,
    pub segments: Vec<String>,
}

impl Block {
    pub fn new(format: FormatKind, text: impl Into<String>) -> Self {
        Self {
            format,
            segments: vec![text.into()],
        }
    }

    pub fn scene_header_full(head: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            format: FormatKind::SceneHeaderFull,
            segments: vec![head.into(), detail.into()],
        }
    }

    /// Text of the first segment (empty for a blank action line)
    pub fn text(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// All segments joined with a single space, as the line reads on the page
    pub fn display_text(&self) -> String {
        self.segments.join(" ")
    }
}
