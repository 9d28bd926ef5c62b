//! Display-layer configuration read by the screen-line builder.

use skein_core::line_ending::LineEnding;

use crate::Tendril;

/// Glyphs rendered in place of otherwise invisible characters.
///
/// `None` leaves the character as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invisibles {
  /// Shown at the start of a hard tab's expansion.
  pub tab: Option<Tendril>,
  /// Substituted for leading and trailing spaces.
  pub space: Option<Tendril>,
  /// Shown for a line feed.
  pub eol: Option<Tendril>,
  /// Shown for the carriage return of a CRLF ending.
  pub cr: Option<Tendril>,
}

/// Per-line-ending glyph table, keyed by [`LineEnding`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EolInvisibles {
  lf: Option<Tendril>,
  crlf: Option<Tendril>,
}

impl EolInvisibles {
  pub const fn none() -> Self {
    Self {
      lf: None,
      crlf: None,
    }
  }

  /// Derives the table from an [`Invisibles`] config: a line feed
  /// shows `eol`, a CRLF ending shows `cr` followed by `eol`.
  pub fn from_invisibles(invisibles: &Invisibles) -> Self {
    let crlf = match (&invisibles.cr, &invisibles.eol) {
      (None, None) => None,
      (cr, eol) => {
        let mut glyph = Tendril::new();
        if let Some(cr) = cr {
          glyph.push_str(cr);
        }
        if let Some(eol) = eol {
          glyph.push_str(eol);
        }
        Some(glyph)
      },
    };

    Self {
      lf: invisibles.eol.clone(),
      crlf,
    }
  }

  pub fn get(&self, ending: LineEnding) -> Option<&str> {
    match ending {
      LineEnding::Lf => self.lf.as_deref(),
      LineEnding::Crlf => self.crlf.as_deref(),
    }
  }
}

/// Read-only configuration the builder consumes from the display
/// layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
  /// Distance between tab stops, in screen columns. Must be positive.
  pub tab_length: u16,
  /// Glyph a fold collapses to. Must be non-empty.
  pub fold_character: Tendril,
  pub invisibles: Invisibles,
  pub eol_invisibles: EolInvisibles,
  pub show_indent_guides: bool,
}

impl Default for DisplayOptions {
  fn default() -> Self {
    Self {
      tab_length: 4,
      fold_character: Tendril::from("\u{22EF}"),
      invisibles: Invisibles::default(),
      eol_invisibles: EolInvisibles::none(),
      show_indent_guides: false,
    }
  }
}
