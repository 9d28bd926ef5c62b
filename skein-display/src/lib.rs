//! Screen-line construction for a fold- and wrap-aware display layer.
//!
//! The display layer presents a text buffer after folds, hard-tab
//! expansion, and soft wraps are applied. This crate owns the hardest
//! piece of that presentation: turning a range of screen rows into
//! [`ScreenLine`]s, each a flat rendered string plus a stream of tag
//! codes marking where whitespace, fold, and line-ending decorations
//! open and close.
//!
//! The builder consumes three seams:
//!
//! - [`DisplaySnapshot`]: coordinate translation, the hunk stream for
//!   a screen range, surrounding-indent lookup, configuration, and the
//!   tag-code registry.
//! - [`LineSource`]: per-row line text and line-ending kind. A blanket
//!   implementation exists for [`ropey::Rope`].
//! - [`Hunk`]s from the snapshot's spatial index, which rewrite buffer
//!   regions into folds or soft wraps.
//!
//! One build call is synchronous and retains nothing except the
//! screen-line id counter; rebuilding with identical inputs yields
//! identical text and tag streams.
//!
//! ```no_run
//! use ropey::Rope;
//! use skein_core::position::Position;
//! use skein_display::{
//!   DisplayOptions,
//!   DisplaySnapshot,
//!   Hunk,
//!   ScreenLineBuilder,
//!   TagRegistry,
//! };
//!
//! struct Snapshot {
//!   options: DisplayOptions,
//!   tags: TagRegistry,
//! }
//!
//! impl DisplaySnapshot for Snapshot {
//!   fn screen_line_count(&self) -> usize {
//!     1
//!   }
//!
//!   fn translate_screen_position(&self, position: Position) -> Position {
//!     position
//!   }
//!
//!   fn hunks_in_new_range(&self, _start: Position, _end: Position) -> Vec<Hunk> {
//!     Vec::new()
//!   }
//!
//!   fn leading_whitespace_length_for_surrounding_lines(&self, _buffer_row: usize) -> usize {
//!     0
//!   }
//!
//!   fn options(&self) -> &DisplayOptions {
//!     &self.options
//!   }
//!
//!   fn code_for_open_tag(&self, name: &str) -> i32 {
//!     self.tags.code_for_open_tag(name)
//!   }
//!
//!   fn code_for_close_tag(&self, name: &str) -> i32 {
//!     self.tags.code_for_close_tag(name)
//!   }
//! }
//!
//! let snapshot = Snapshot {
//!   options: DisplayOptions::default(),
//!   tags: TagRegistry::new(),
//! };
//! let buffer = Rope::from("hello");
//! let mut builder = ScreenLineBuilder::new();
//! let lines = builder.build_screen_lines(&snapshot, &buffer, 0, 1);
//! assert_eq!(lines[0].line_text, "hello");
//! ```

use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod builder;
pub mod hunk;
pub mod options;
pub mod screen_line;
pub mod source;
pub mod tags;

pub use builder::ScreenLineBuilder;
pub use hunk::{
  Hunk,
  HunkCursor,
};
pub use options::{
  DisplayOptions,
  EolInvisibles,
  Invisibles,
};
pub use screen_line::{
  ScreenLine,
  ScreenLineError,
  ScreenLineId,
};
pub use source::{
  DisplaySnapshot,
  LineSource,
};
pub use tags::{
  DecorationFlags,
  TagRegistry,
};

pub type Tendril = SmartString<LazyCompact>;
