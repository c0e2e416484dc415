// WHY: Renaming must only touch lines that are exactly a character cue;
// dialogue that merely mentions the name stays as written

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use super::{build_regex, flag_letters, CompiledPattern};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    pub success: bool,
    pub new_text: String,
    pub replacements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Whole-line cue pattern for `old_name`. Group 1 keeps the leading
/// whitespace, group 2 the optional colon and trailing whitespace.
pub fn rename_pattern(old_name: &str) -> Result<CompiledPattern> {
    let source = format!(
        r"^([^\S\n]*){}([^\S\n]*:?[^\S\n]*)$",
        regex_syntax::escape(old_name)
    );
    let regex = build_regex(&source, true, true)?;

    Ok(CompiledPattern {
        regex,
        flags: format!("{}m", flag_letters(true, true)),
        source,
    })
}

/// Replacement template inserting `new_name` literally between the kept groups
pub fn rename_template(new_name: &str) -> String {
    format!("${{1}}{}${{2}}", new_name.replace('$', "$$"))
}

/// Rename a character cue everywhere it stands alone on a line
pub fn rename_character(old_name: &str, new_name: &str, text: &str) -> RenameOutcome {
    let (old_name, new_name) = (old_name.trim(), new_name.trim());
    if old_name.is_empty() || new_name.is_empty() {
        return RenameOutcome {
            success: true,
            new_text: text.to_string(),
            replacements: 0,
            error: None,
        };
    }

    let pattern = match rename_pattern(old_name) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!(old_name, error = %e, "Rename pattern failed to compile");
            return RenameOutcome {
                success: false,
                new_text: text.to_string(),
                replacements: 0,
                error: Some(format!("{e:#}")),
            };
        }
    };

    let (new_text, replacements) = pattern.substitute(text, &rename_template(new_name), None);
    debug!(old_name, new_name, replacements, "Renamed character");

    RenameOutcome {
        success: true,
        new_text,
        replacements,
        error: None,
    }
}
