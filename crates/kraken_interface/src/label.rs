//! Button label storage
//!
//! Labels up to [`MAX_NAME_STR`] bytes live inline in the button; longer ones
//! spill to the heap. [`ButtonLabel`] owns its bytes either way, so moving or
//! swapping labels between buttons never aliases a buffer.

use std::fmt;

use smallvec::SmallVec;

/// Inline label capacity in bytes
pub const MAX_NAME_STR: usize = 128;

/// Separates a label from its shortcut text, e.g. `"Save|Ctrl S"`
pub const SEP_CHAR: char = '|';

/// Small-string-optimized, always valid UTF-8 label
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ButtonLabel {
    bytes: SmallVec<[u8; MAX_NAME_STR]>,
}

impl ButtonLabel {
    pub fn new(text: &str) -> Self {
        Self {
            bytes: SmallVec::from_slice(text.as_bytes()),
        }
    }

    pub fn as_str(&self) -> &str {
        // Only ever filled from `&str`.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    /// Replace the contents; short text goes back inline
    pub fn set(&mut self, text: &str) {
        self.bytes = SmallVec::from_slice(text.as_bytes());
    }

    /// True when the text lives on the heap
    pub fn spilled(&self) -> bool {
        self.bytes.spilled()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Text before the last shortcut separator.
    ///
    /// Splits unconditionally; use [`Button::label_without_sep_char`] when the
    /// label may contain the separator as plain text.
    ///
    /// [`Button::label_without_sep_char`]: crate::button::Button::label_without_sep_char
    pub fn without_shortcut(&self) -> &str {
        let s = self.as_str();
        match s.rfind(SEP_CHAR) {
            Some(pos) => &s[..pos],
            None => s,
        }
    }

    /// Shortcut text after the separator
    pub fn shortcut(&self) -> Option<&str> {
        let s = self.as_str();
        s.rfind(SEP_CHAR).map(|pos| &s[pos + SEP_CHAR.len_utf8()..])
    }
}

impl From<&str> for ButtonLabel {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Debug for ButtonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for ButtonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
