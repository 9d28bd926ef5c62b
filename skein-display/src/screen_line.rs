//! The output record of a build pass.

use std::{
  fmt,
  num::NonZeroUsize,
};

use thiserror::Error;

use crate::tags::{
  close_code_for_open,
  is_close_tag_code,
  is_open_tag_code,
};

/// Identifies one produced screen line. Ids increase strictly in
/// emission order for the builder that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenLineId(NonZeroUsize);

impl ScreenLineId {
  pub(crate) fn new(value: NonZeroUsize) -> Self {
    Self(value)
  }

  pub fn value(&self) -> usize {
    self.0.get()
  }
}

impl fmt::Display for ScreenLineId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A structural violation in a [`ScreenLine`]'s tag stream.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScreenLineError {
  #[error("tag codes are empty")]
  EmptyTagCodes,
  #[error("length prefixes sum to {prefix_sum} but the text is {text_len} units long")]
  LengthMismatch { prefix_sum: usize, text_len: usize },
  #[error("close code {code} does not match the innermost open tag")]
  MisnestedCloseTag { code: i32 },
  #[error("tag code {code} is still open at end of line")]
  UnclosedTag { code: i32 },
}

/// One rendered screen line.
///
/// `tag_codes` is a flat stream: non-negative elements are length
/// prefixes counting rendered char units under the currently open
/// tags, negative elements open or close a tag (see
/// [`crate::tags`]). An empty line still carries a single `0` prefix
/// so consumers need not special-case it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
  pub id: ScreenLineId,
  pub line_text: String,
  pub tag_codes: Vec<i32>,
}

impl ScreenLine {
  /// Rendered length in char units, the same unit length prefixes
  /// count in.
  pub fn text_len(&self) -> usize {
    self.line_text.chars().count()
  }

  /// Checks the structural invariants of the tag stream: it is
  /// non-empty, its length prefixes sum to the rendered length, and
  /// every open code is closed by its partner in LIFO order.
  pub fn verify(&self) -> Result<(), ScreenLineError> {
    if self.tag_codes.is_empty() {
      return Err(ScreenLineError::EmptyTagCodes);
    }

    let mut prefix_sum = 0usize;
    let mut open_codes = Vec::new();
    for &code in &self.tag_codes {
      if code >= 0 {
        prefix_sum += code as usize;
      } else if is_open_tag_code(code) {
        open_codes.push(code);
      } else {
        debug_assert!(is_close_tag_code(code));
        match open_codes.pop() {
          Some(open) if close_code_for_open(open) == code => {},
          _ => return Err(ScreenLineError::MisnestedCloseTag { code }),
        }
      }
    }

    if let Some(&open) = open_codes.last() {
      return Err(ScreenLineError::UnclosedTag { code: open });
    }

    let text_len = self.text_len();
    if prefix_sum != text_len {
      return Err(ScreenLineError::LengthMismatch {
        prefix_sum,
        text_len,
      });
    }

    Ok(())
  }
}
