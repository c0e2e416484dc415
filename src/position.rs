// WHY: Type-safe position wrappers to prevent byte/char confusion in match offsets
// Regex engines report byte offsets; callers outside the core count characters

/// 0-based byte position in a line or run
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct BytePos(pub usize);

/// 0-based character position in a line or run
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct CharPos(pub usize);

impl From<BytePos> for usize {
    fn from(pos: BytePos) -> Self {
        pos.0
    }
}

impl From<CharPos> for usize {
    fn from(pos: CharPos) -> Self {
        pos.0
    }
}

/// Incremental byte-to-char converter over one string.
///
/// Match offsets arrive in ascending order, so each conversion only scans the
/// bytes between the previous position and the new one.
#[derive(Debug)]
pub struct CharTracker<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> CharTracker<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte_pos: 0,
            char_pos: 0,
        }
    }

    /// Advance to `target` and return its character position.
    ///
    /// Seeking backwards restarts from the beginning of the text. Offsets past
    /// the end clamp to the end.
    pub fn advance_to(&mut self, target: BytePos) -> CharPos {
        let target = target.0.min(self.text.len());
        if target < self.byte_pos {
            self.byte_pos = 0;
            self.char_pos = 0;
        }

        for &byte in &self.text.as_bytes()[self.byte_pos..target] {
            // Continuation bytes (10xxxxxx) don't start a character
            if (byte & 0xC0) != 0x80 {
                self.char_pos += 1;
            }
        }
        self.byte_pos = target;
        CharPos(self.char_pos)
    }
}

/// Convert a character position back to a byte offset, clamping to the end
pub fn char_to_byte(text: &str, pos: CharPos) -> BytePos {
    BytePos(
        text.char_indices()
            .nth(pos.0)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len()),
    )
}
