//! Seams between the builder and its collaborators: the display layer
//! snapshot and the underlying text buffer.

use std::borrow::Cow;

use ropey::Rope;
use skein_core::{
  line_ending::{
    LineEnding,
    get_line_ending,
    line_without_line_ending,
  },
  position::Position,
};

use crate::{
  hunk::Hunk,
  options::DisplayOptions,
};

/// What the screen-line builder reads from the display layer.
///
/// The builder assumes the snapshot is internally consistent: hunks
/// are ordered ascending by `old_start` and refer to valid buffer
/// positions, and tag codes are stable negative integers (see
/// [`crate::tags`]) for the snapshot's lifetime.
pub trait DisplaySnapshot {
  fn screen_line_count(&self) -> usize;

  /// Translates a screen position to the buffer position it renders.
  fn translate_screen_position(&self, position: Position) -> Position;

  /// Fold and soft-wrap hunks overlapping `[start, end)` in screen
  /// coordinates, ordered ascending by `old_start` then stream
  /// position.
  fn hunks_in_new_range(&self, start: Position, end: Position) -> Vec<Hunk>;

  /// Leading-whitespace length of the non-empty lines around
  /// `buffer_row`, used to continue indent guides across empty lines.
  fn leading_whitespace_length_for_surrounding_lines(&self, buffer_row: usize) -> usize;

  fn options(&self) -> &DisplayOptions;

  fn code_for_open_tag(&self, name: &str) -> i32;

  fn code_for_close_tag(&self, name: &str) -> i32;
}

/// What the screen-line builder reads from the text buffer.
pub trait LineSource {
  /// The line's text without its line ending, or `None` past the end
  /// of the buffer.
  fn line_for_row(&self, row: usize) -> Option<Cow<'_, str>>;

  /// The line's ending kind, or `None` for the final line.
  fn line_ending_for_row(&self, row: usize) -> Option<LineEnding>;
}

impl LineSource for Rope {
  fn line_for_row(&self, row: usize) -> Option<Cow<'_, str>> {
    if row >= self.len_lines() {
      return None;
    }
    Some(Cow::from(line_without_line_ending(self.slice(..), row)))
  }

  fn line_ending_for_row(&self, row: usize) -> Option<LineEnding> {
    if row >= self.len_lines() {
      return None;
    }
    get_line_ending(&self.line(row))
  }
}
