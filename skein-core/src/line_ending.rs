use ropey::RopeSlice;

/// The line endings recognized by the display crates.
///
/// Ropey is built without its unicode-lines feature, so these are the
/// only endings the buffer will ever report.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,

  /// U+000A -- LineFeed
  Lf,
}

impl LineEnding {
  #[inline]
  pub const fn len_chars(&self) -> usize {
    match self {
      Self::Crlf => 2,
      Self::Lf => 1,
    }
  }

  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Crlf => "\u{000D}\u{000A}",
      Self::Lf => "\u{000A}",
    }
  }

  // Not the FromStr trait: that would force a different return type
  // than from_rope_slice, which would be weird.
  #[allow(clippy::should_implement_trait)]
  #[inline]
  pub fn from_str(g: &str) -> Option<LineEnding> {
    match g {
      "\u{000D}\u{000A}" => Some(LineEnding::Crlf),
      "\u{000A}" => Some(LineEnding::Lf),
      _ => None,
    }
  }
}

/// Returns the passed line's line ending, if any.
pub fn get_line_ending(line: &RopeSlice) -> Option<LineEnding> {
  // Last char as str.
  let g1 = line
    .slice(line.len_chars().saturating_sub(1)..)
    .as_str()
    .unwrap_or("");

  // Last 2 chars as str, or empty str if they're not contiguous.
  // It's fine to punt on the non-contiguous case, because Ropey
  // guarantees that CRLF is always contiguous.
  let g2 = line
    .slice(line.len_chars().saturating_sub(2)..)
    .as_str()
    .unwrap_or("");

  // Check the 2-character case for CRLF before the single-character
  // case.
  LineEnding::from_str(g2).or_else(|| LineEnding::from_str(g1))
}

/// Returns the passed line's line ending, if any.
pub fn get_line_ending_of_str(line: &str) -> Option<LineEnding> {
  if line.ends_with("\u{000D}\u{000A}") {
    Some(LineEnding::Crlf)
  } else if line.ends_with('\u{000A}') {
    Some(LineEnding::Lf)
  } else {
    None
  }
}

/// Returns the char index of the end of the given line, not including
/// its line ending.
pub fn line_end_char_index(slice: &RopeSlice, line: usize) -> usize {
  slice.line_to_char(line + 1)
    - get_line_ending(&slice.line(line))
      .map(|le| le.len_chars())
      .unwrap_or(0)
}

/// Get line `line_idx` from the passed rope slice, sans any line
/// ending.
pub fn line_without_line_ending(slice: RopeSlice<'_>, line_idx: usize) -> RopeSlice<'_> {
  let start = slice.line_to_char(line_idx);
  let end = line_end_char_index(&slice, line_idx);
  slice.slice(start..end)
}
