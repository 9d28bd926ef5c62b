//! Screen-line assembly.
//!
//! One build call walks a range of screen rows, rendering each buffer
//! line in a single pass: hunks rewrite the cursor (folds jump it,
//! soft wraps flush the line in progress), hard tabs expand to the
//! next tab stop, invisibles substitute configured glyphs, and every
//! rendered run is bracketed by open/close tag codes describing its
//! whitespace role. The pass keeps three cursors in lock-step: the
//! buffer position, the screen position, and the hunk stream.

use std::{
  mem,
  num::NonZeroUsize,
};

use skein_core::position::Position;

use crate::{
  hunk::{
    Hunk,
    HunkCursor,
  },
  options::DisplayOptions,
  screen_line::{
    ScreenLine,
    ScreenLineId,
  },
  source::{
    DisplaySnapshot,
    LineSource,
  },
  tags::{
    DecorationFlags,
    tag_name,
  },
};

/// Builds [`ScreenLine`]s for requested screen row ranges.
///
/// The builder is stateless across calls except for the screen-line
/// id counter, which is per-builder: two builders hand out overlapping
/// ids, so keep one builder per logical producer.
#[derive(Debug)]
pub struct ScreenLineBuilder {
  next_screen_line_id: NonZeroUsize,
}

impl Default for ScreenLineBuilder {
  fn default() -> Self {
    Self::new()
  }
}

impl ScreenLineBuilder {
  pub fn new() -> Self {
    Self {
      next_screen_line_id: NonZeroUsize::MIN,
    }
  }

  /// Renders screen rows `start_row..end_row`.
  ///
  /// `end_row` is clamped to the snapshot's screen line count; an
  /// empty range yields no lines. Rebuilding with identical inputs
  /// produces identical text and tag streams (ids aside).
  pub fn build_screen_lines<D, B>(
    &mut self,
    display: &D,
    buffer: &B,
    start_row: usize,
    end_row: usize,
  ) -> Vec<ScreenLine>
  where
    D: DisplaySnapshot,
    B: LineSource,
  {
    let end_row = end_row.min(display.screen_line_count());
    if start_row >= end_row {
      return Vec::new();
    }
    tracing::trace!(start_row, end_row, "building screen lines");

    Assembler::new(self, display, buffer, start_row, end_row).run()
  }

  fn next_id(&mut self) -> ScreenLineId {
    let id = ScreenLineId::new(self.next_screen_line_id);
    self.next_screen_line_id = self.next_screen_line_id.saturating_add(1);
    id
  }
}

/// Per-call state of one build pass.
struct Assembler<'a, D, B> {
  builder: &'a mut ScreenLineBuilder,
  display: &'a D,
  buffer: &'a B,
  options: &'a DisplayOptions,
  end_screen_row: usize,

  hunks: HunkCursor,
  screen_row: usize,
  screen_column: usize,
  buffer_row: usize,
  buffer_column: usize,

  // Current buffer line, sans ending.
  line_chars: Vec<char>,
  trailing_whitespace_start_column: usize,
  in_leading_whitespace: bool,
  in_trailing_whitespace: bool,

  current_token_flags: DecorationFlags,
  current_token_length: usize,
  line_text: String,
  tag_codes: Vec<i32>,
  screen_lines: Vec<ScreenLine>,
}

impl<'a, D, B> Assembler<'a, D, B>
where
  D: DisplaySnapshot,
  B: LineSource,
{
  fn new(
    builder: &'a mut ScreenLineBuilder,
    display: &'a D,
    buffer: &'a B,
    start_row: usize,
    end_row: usize,
  ) -> Self {
    let options = display.options();
    debug_assert!(options.tab_length > 0, "tab length must be positive");

    let buffer_row = display
      .translate_screen_position(Position::new(start_row, 0))
      .row;
    let hunks = HunkCursor::new(
      display.hunks_in_new_range(Position::new(start_row, 0), Position::new(end_row, 0)),
    );

    Self {
      builder,
      display,
      buffer,
      options,
      end_screen_row: end_row,
      hunks,
      screen_row: start_row,
      screen_column: 0,
      buffer_row,
      buffer_column: 0,
      line_chars: Vec::new(),
      trailing_whitespace_start_column: 0,
      in_leading_whitespace: true,
      in_trailing_whitespace: false,
      current_token_flags: DecorationFlags::empty(),
      current_token_length: 0,
      line_text: String::new(),
      tag_codes: Vec::new(),
      screen_lines: Vec::new(),
    }
  }

  fn run(mut self) -> Vec<ScreenLine> {
    while self.screen_row < self.end_screen_row {
      let Some(line) = self.buffer.line_for_row(self.buffer_row) else {
        tracing::debug!(
          buffer_row = self.buffer_row,
          screen_row = self.screen_row,
          "buffer exhausted before the requested screen range"
        );
        break;
      };
      self.begin_buffer_line(&line);
      self.assemble_buffer_line();
      self.emit_line_ending();
      self.buffer_row += 1;
    }
    self.screen_lines
  }

  fn begin_buffer_line(&mut self, line: &str) {
    self.line_chars.clear();
    self.line_chars.extend(line.chars());
    self.trailing_whitespace_start_column = trailing_whitespace_start(&self.line_chars);
    self.in_leading_whitespace = true;
    self.in_trailing_whitespace = false;
    self.buffer_column = 0;
  }

  /// Renders the current buffer line column by column. The loop runs
  /// one step past the last character so a fold starting exactly at
  /// end-of-line still fires.
  fn assemble_buffer_line(&mut self) {
    loop {
      // Drain hunks at the cursor. A fold moves the cursor, so the
      // position is rechecked after every consumed hunk.
      loop {
        self.hunks.skip_rows_before(self.buffer_row);
        let position = Position::new(self.buffer_row, self.buffer_column);
        let Some(hunk) = self.hunks.take_at(position) else {
          break;
        };
        if hunk.is_soft_wrap() {
          self.emit_soft_wrap(&hunk);
        } else if hunk.is_fold(&self.options.fold_character) {
          self.emit_fold(&hunk);
        }
        // Hunks of any other shape have no rendered effect.
      }

      let next_character = self.line_chars.get(self.buffer_column).copied();

      if self.buffer_column >= self.trailing_whitespace_start_column {
        self.in_trailing_whitespace = true;
        self.in_leading_whitespace = false;
      } else if !matches!(next_character, Some(' ') | Some('\t')) {
        self.in_leading_whitespace = false;
      }

      let previous_token_flags = self.current_token_flags;
      let force_token_boundary = self.update_current_token_flags(next_character);

      if !previous_token_flags.is_empty()
        && (self.current_token_flags != previous_token_flags || force_token_boundary)
      {
        self.emit_close_tag(previous_token_flags);
      }
      if !self.current_token_flags.is_empty()
        && (self.current_token_flags != previous_token_flags || force_token_boundary)
      {
        self.emit_open_tag(self.current_token_flags);
      }

      let Some(ch) = next_character else { break };

      if ch == '\t' {
        self.emit_hard_tab();
      } else if ch == ' ' && (self.in_leading_whitespace || self.in_trailing_whitespace) {
        let options = self.options;
        match &options.invisibles.space {
          Some(glyph) => self.emit_text(glyph),
          None => self.emit_character(' '),
        }
      } else {
        self.emit_character(ch);
      }
      self.buffer_column += 1;
    }
  }

  /// Recomputes the open-tag flags for the character about to render,
  /// returning whether a token boundary must be forced even if the
  /// flags are unchanged.
  fn update_current_token_flags(&mut self, next_character: Option<char>) -> bool {
    let options = self.options;
    let mut flags = DecorationFlags::empty();
    let mut force_token_boundary = false;

    if matches!(next_character, Some(' ') | Some('\t')) {
      // Guides cover leading whitespace and lines that are nothing
      // but whitespace.
      let show_indent_guide = options.show_indent_guides
        && (self.in_leading_whitespace || self.trailing_whitespace_start_column == 0);
      let tab_length = options.tab_length as usize;

      if self.in_leading_whitespace {
        flags |= DecorationFlags::LEADING_WHITESPACE;
      }
      if self.in_trailing_whitespace {
        flags |= DecorationFlags::TRAILING_WHITESPACE;
      }

      if next_character == Some('\t') {
        flags |= DecorationFlags::HARD_TAB;
        if options.invisibles.tab.is_some() {
          flags |= DecorationFlags::INVISIBLE_CHARACTER;
        }
        if show_indent_guide && self.screen_column % tab_length == 0 {
          flags |= DecorationFlags::INDENT_GUIDE;
        }
        // Adjacent tabs never share a token.
        force_token_boundary = true;
      } else {
        if (self.in_leading_whitespace || self.in_trailing_whitespace)
          && options.invisibles.space.is_some()
        {
          flags |= DecorationFlags::INVISIBLE_CHARACTER;
        }
        if show_indent_guide {
          flags |= DecorationFlags::INDENT_GUIDE;
          if self.screen_column % tab_length == 0 {
            force_token_boundary = true;
          }
        }
      }
    }

    self.current_token_flags = flags;
    force_token_boundary
  }

  fn emit_fold(&mut self, hunk: &Hunk) {
    self.emit_close_tag(self.current_token_flags);
    self.current_token_flags = DecorationFlags::FOLD;
    self.emit_open_tag(DecorationFlags::FOLD);

    let options = self.options;
    self.emit_text(&options.fold_character);

    self.buffer_row = hunk.old_end.row;
    self.buffer_column = hunk.old_end.col;
    self.refresh_buffer_line();
    self.in_trailing_whitespace = false;
  }

  fn emit_soft_wrap(&mut self, hunk: &Hunk) {
    self.emit_close_tag(self.current_token_flags);
    self.current_token_flags = DecorationFlags::empty();
    self.flush_screen_line();
    self.emit_indent_whitespace(hunk.new_end.col);
  }

  fn emit_line_ending(&mut self) {
    self.emit_close_tag(self.current_token_flags);
    self.current_token_flags = DecorationFlags::empty();

    let options = self.options;
    let line_is_empty = self.line_chars.is_empty();

    if let Some(glyph) = self
      .buffer
      .line_ending_for_row(self.buffer_row)
      .and_then(|ending| options.eol_invisibles.get(ending))
    {
      let mut flags = DecorationFlags::INVISIBLE_CHARACTER | DecorationFlags::LINE_ENDING;
      if line_is_empty && options.show_indent_guides {
        flags |= DecorationFlags::INDENT_GUIDE;
      }
      self.emit_open_tag(flags);
      self.emit_text(glyph);
      self.emit_close_tag(flags);
    }

    if line_is_empty && options.show_indent_guides {
      let whitespace_length = self
        .display
        .leading_whitespace_length_for_surrounding_lines(self.buffer_row);
      self.emit_indent_whitespace(whitespace_length);
    }

    self.flush_screen_line();
  }

  /// Pads the current screen line with spaces up to `end_column`.
  /// With indent guides on, each tab-stop-aligned block gets its own
  /// `indent-guide` open/close pair.
  fn emit_indent_whitespace(&mut self, end_column: usize) {
    let options = self.options;
    if options.show_indent_guides {
      let tab_length = options.tab_length as usize;
      let mut opened_indent_guide = false;
      while self.screen_column < end_column {
        if self.screen_column % tab_length == 0 {
          if opened_indent_guide {
            self.emit_close_tag(DecorationFlags::INDENT_GUIDE);
          }
          self.emit_open_tag(DecorationFlags::INDENT_GUIDE);
          opened_indent_guide = true;
        }
        self.emit_character(' ');
      }
      if opened_indent_guide {
        self.emit_close_tag(DecorationFlags::INDENT_GUIDE);
      }
    } else {
      while self.screen_column < end_column {
        self.emit_character(' ');
      }
    }
  }

  fn emit_hard_tab(&mut self) {
    let options = self.options;
    let tab_length = options.tab_length as usize;
    let distance_to_next_tab_stop = tab_length - self.screen_column % tab_length;

    match &options.invisibles.tab {
      Some(glyph) => {
        self.emit_text(glyph);
        for _ in 1..distance_to_next_tab_stop {
          self.emit_character(' ');
        }
      },
      None => {
        for _ in 0..distance_to_next_tab_stop {
          self.emit_character(' ');
        }
      },
    }
  }

  fn emit_text(&mut self, text: &str) {
    for ch in text.chars() {
      self.emit_character(ch);
    }
  }

  fn emit_character(&mut self, ch: char) {
    self.line_text.push(ch);
    self.screen_column += 1;
    self.current_token_length += 1;
  }

  fn emit_open_tag(&mut self, flags: DecorationFlags) {
    self.flush_token_length();
    if flags.is_empty() {
      return;
    }
    let name = tag_name(flags);
    self.tag_codes.push(self.display.code_for_open_tag(&name));
  }

  fn emit_close_tag(&mut self, flags: DecorationFlags) {
    self.flush_token_length();
    if flags.is_empty() {
      return;
    }
    let name = tag_name(flags);
    self.tag_codes.push(self.display.code_for_close_tag(&name));
  }

  fn flush_token_length(&mut self) {
    if self.current_token_length > 0 {
      self.tag_codes.push(self.current_token_length as i32);
      self.current_token_length = 0;
    }
  }

  /// Finalizes the screen line in progress and starts the next one.
  /// Lines past the requested end row are rendered for cursor
  /// consistency but not returned.
  fn flush_screen_line(&mut self) {
    self.flush_token_length();

    let line_text = mem::take(&mut self.line_text);
    let mut tag_codes = mem::take(&mut self.tag_codes);
    if tag_codes.is_empty() {
      tag_codes.push(0);
    }

    if self.screen_row < self.end_screen_row {
      let screen_line = ScreenLine {
        id: self.builder.next_id(),
        line_text,
        tag_codes,
      };
      #[cfg(debug_assertions)]
      if let Err(err) = screen_line.verify() {
        panic!(
          "screen line {} violates tag stream invariants: {err}",
          screen_line.id
        );
      }
      self.screen_lines.push(screen_line);
    }

    self.screen_row += 1;
    self.screen_column = 0;
  }

  fn refresh_buffer_line(&mut self) {
    match self.buffer.line_for_row(self.buffer_row) {
      Some(line) => {
        self.line_chars.clear();
        self.line_chars.extend(line.chars());
      },
      None => {
        tracing::debug!(
          buffer_row = self.buffer_row,
          "fold target row is out of range"
        );
        self.line_chars.clear();
      },
    }
    self.trailing_whitespace_start_column = trailing_whitespace_start(&self.line_chars);
  }
}

/// First column of the maximal trailing run of spaces and tabs, or the
/// line length if there is none.
fn trailing_whitespace_start(chars: &[char]) -> usize {
  let mut column = chars.len();
  while column > 0 && matches!(chars[column - 1], ' ' | '\t') {
    column -= 1;
  }
  column
}
