//! Protocol text in engine and host form.
//!
//! The engine hands out [`StringView`]s whose code units are either 8-bit
//! (Latin-1) or 16-bit (UTF-16). [`ScriptText`] is the host-side owned form
//! and keeps whichever width the view had, so conversion in either direction
//! never loses a code unit.

use std::borrow::Cow;
use std::fmt;

/// Borrowed engine text tagged with its code unit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringView<'a> {
    /// Latin-1 code units.
    OneByte(&'a [u8]),
    /// UTF-16 code units, possibly with unpaired surrogates.
    TwoByte(&'a [u16]),
}

impl<'a> StringView<'a> {
    /// An empty 8-bit view.
    pub fn empty() -> Self {
        StringView::OneByte(&[])
    }

    /// Whether the view holds 8-bit code units.
    pub fn is_8bit(&self) -> bool {
        matches!(self, StringView::OneByte(_))
    }

    /// Length in code units.
    pub fn len(&self) -> usize {
        match self {
            StringView::OneByte(units) => units.len(),
            StringView::TwoByte(units) => units.len(),
        }
    }

    /// Whether the view has no code units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The 8-bit code units, if this is an 8-bit view.
    pub fn characters8(&self) -> Option<&'a [u8]> {
        match *self {
            StringView::OneByte(units) => Some(units),
            StringView::TwoByte(_) => None,
        }
    }

    /// The 16-bit code units, if this is a 16-bit view.
    pub fn characters16(&self) -> Option<&'a [u16]> {
        match *self {
            StringView::OneByte(_) => None,
            StringView::TwoByte(units) => Some(units),
        }
    }
}

impl<'a> From<&'a [u8]> for StringView<'a> {
    fn from(units: &'a [u8]) -> Self {
        StringView::OneByte(units)
    }
}

impl<'a> From<&'a [u16]> for StringView<'a> {
    fn from(units: &'a [u16]) -> Self {
        StringView::TwoByte(units)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Latin1(Vec<u8>),
    Utf16(Vec<u16>),
}

/// Owned protocol text as the host sees it.
///
/// Text built from a `&str` is stored as Latin-1 when every character fits
/// in one byte, as UTF-16 otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptText {
    repr: Repr,
}

impl ScriptText {
    /// Create text from Latin-1 code units.
    pub fn from_latin1(units: Vec<u8>) -> Self {
        Self {
            repr: Repr::Latin1(units),
        }
    }

    /// Create text from UTF-16 code units.
    pub fn from_utf16(units: Vec<u16>) -> Self {
        Self {
            repr: Repr::Utf16(units),
        }
    }

    /// Copy an engine view, keeping its code unit width.
    pub fn from_view(view: StringView<'_>) -> Self {
        match view {
            StringView::OneByte(units) => Self::from_latin1(units.to_vec()),
            StringView::TwoByte(units) => Self::from_utf16(units.to_vec()),
        }
    }

    /// Borrow as an engine view.
    pub fn as_view(&self) -> StringView<'_> {
        match &self.repr {
            Repr::Latin1(units) => StringView::OneByte(units),
            Repr::Utf16(units) => StringView::TwoByte(units),
        }
    }

    /// Whether the text is stored as Latin-1.
    pub fn is_one_byte(&self) -> bool {
        matches!(self.repr, Repr::Latin1(_))
    }

    /// Length in code units.
    pub fn len(&self) -> usize {
        self.as_view().len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text as UTF-16 code units, widening Latin-1.
    pub fn to_utf16(&self) -> Vec<u16> {
        match &self.repr {
            Repr::Latin1(units) => units.iter().map(|&b| u16::from(b)).collect(),
            Repr::Utf16(units) => units.clone(),
        }
    }

    /// The text as a Rust string.
    ///
    /// Unpaired surrogates become U+FFFD; everything else is exact.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        match &self.repr {
            Repr::Latin1(units) if units.is_ascii() => {
                // ASCII is valid UTF-8 as is
                Cow::Borrowed(std::str::from_utf8(units).unwrap_or_default())
            }
            Repr::Latin1(units) => Cow::Owned(units.iter().map(|&b| char::from(b)).collect()),
            Repr::Utf16(units) => Cow::Owned(
                char::decode_utf16(units.iter().copied())
                    .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ScriptText {
    fn from(s: &str) -> Self {
        if s.chars().all(|c| u32::from(c) <= 0xFF) {
            Self::from_latin1(s.chars().map(|c| c as u8).collect())
        } else {
            Self::from_utf16(s.encode_utf16().collect())
        }
    }
}

impl From<String> for ScriptText {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl PartialEq<str> for ScriptText {
    fn eq(&self, other: &str) -> bool {
        match &self.repr {
            Repr::Latin1(units) => units
                .iter()
                .map(|&b| char::from(b))
                .eq(other.chars()),
            Repr::Utf16(units) => units.iter().copied().eq(other.encode_utf16()),
        }
    }
}

impl PartialEq<&str> for ScriptText {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for ScriptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Owned engine text handed to a [`Channel`](crate::inspector::Channel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringBuffer {
    text: ScriptText,
}

impl StringBuffer {
    /// Copy a view into a new buffer.
    pub fn create(view: StringView<'_>) -> Self {
        Self {
            text: ScriptText::from_view(view),
        }
    }

    /// Borrow the buffer contents.
    pub fn string(&self) -> StringView<'_> {
        self.text.as_view()
    }
}

impl From<&str> for StringBuffer {
    fn from(s: &str) -> Self {
        Self {
            text: ScriptText::from(s),
        }
    }
}
