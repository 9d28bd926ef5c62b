//! Spatial-index hunks and the cursor that walks them during a build.

use skein_core::position::Position;

use crate::Tendril;

/// A rewrite instruction from the display layer's spatial index.
///
/// `old_start`/`old_end` are buffer coordinates; `new_end` is the
/// screen coordinate of the rewritten region's end. The two kinds the
/// builder reacts to are distinguished by shape, not by a field:
/// a zero old extent is a soft wrap, a non-empty old extent whose
/// replacement is the fold character is a fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
  pub old_start: Position,
  pub old_end:   Position,
  pub new_end:   Position,
  pub new_text:  Tendril,
}

impl Hunk {
  /// A display-only line break starting a new screen line whose indent
  /// column is `new_end.col`.
  pub fn is_soft_wrap(&self) -> bool {
    self.old_start == self.old_end
  }

  /// Collapses `old_start..old_end` to the fold character.
  pub fn is_fold(&self, fold_character: &str) -> bool {
    self.old_end > self.old_start && &*self.new_text == fold_character
  }
}

/// Walks the ordered hunk stream for a screen range in lock-step with
/// the builder's buffer cursor.
///
/// An explicit peek/advance cursor instead of an index-and-break loop:
/// consuming hunks one at a time is what guarantees a second hunk at
/// the same buffer position is not skipped.
#[derive(Debug)]
pub struct HunkCursor {
  hunks: Vec<Hunk>,
  index: usize,
}

impl HunkCursor {
  /// `hunks` must be ordered ascending by `old_start`, then by
  /// position in the stream.
  pub fn new(hunks: Vec<Hunk>) -> Self {
    debug_assert!(
      hunks.windows(2).all(|w| w[0].old_start <= w[1].old_start),
      "hunk stream must be ordered by old_start"
    );
    Self { hunks, index: 0 }
  }

  pub fn peek(&self) -> Option<&Hunk> {
    self.hunks.get(self.index)
  }

  pub fn advance(&mut self) {
    self.index += 1;
  }

  /// Drops hunks that start on buffer rows before `buffer_row`. Folds
  /// jump the buffer cursor forward, leaving hunks inside the folded
  /// region behind; those must never fire.
  pub fn skip_rows_before(&mut self, buffer_row: usize) {
    while self
      .peek()
      .is_some_and(|hunk| hunk.old_start.row < buffer_row)
    {
      self.advance();
    }
  }

  /// Consumes and returns the next hunk iff it starts exactly at
  /// `position`.
  pub fn take_at(&mut self, position: Position) -> Option<Hunk> {
    match self.peek() {
      Some(hunk) if hunk.old_start == position => {
        let hunk = hunk.clone();
        self.advance();
        Some(hunk)
      },
      _ => None,
    }
  }
}
