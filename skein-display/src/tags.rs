//! Decoration flags, the flags→tag-name vocabulary, and the tag-code
//! registry.
//!
//! Tag codes are negative so consumers can split a tag stream by sign:
//! non-negative elements are length prefixes, negative elements are
//! codes. Open codes are odd, close codes even, which lets the
//! matching close for an open code be computed without a table lookup.

use std::{
  collections::HashMap,
  sync::Arc,
};

use bitflags::bitflags;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

bitflags! {
  /// Built-in decorations a rendered character can carry.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct DecorationFlags: u8 {
    const INVISIBLE_CHARACTER = 1 << 0;
    const HARD_TAB            = 1 << 1;
    const LEADING_WHITESPACE  = 1 << 2;
    const TRAILING_WHITESPACE = 1 << 3;
    const LINE_ENDING         = 1 << 4;
    const INDENT_GUIDE        = 1 << 5;
    const FOLD                = 1 << 6;
  }
}

// Canonical name order. Changing this changes every emitted tag name.
const TAG_NAME_PARTS: &[(DecorationFlags, &str)] = &[
  (DecorationFlags::INVISIBLE_CHARACTER, "invisible-character"),
  (DecorationFlags::HARD_TAB, "hard-tab"),
  (DecorationFlags::LEADING_WHITESPACE, "leading-whitespace"),
  (DecorationFlags::TRAILING_WHITESPACE, "trailing-whitespace"),
  (DecorationFlags::LINE_ENDING, "eol"),
  (DecorationFlags::INDENT_GUIDE, "indent-guide"),
  (DecorationFlags::FOLD, "fold-marker"),
];

// The mapping is pure, so one process-wide memo serves every builder.
static TAG_NAMES: Lazy<RwLock<HashMap<DecorationFlags, Arc<str>>>> =
  Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the canonical tag name for a set of decoration flags, e.g.
/// `"hard-tab leading-whitespace"`. Empty flags yield an empty name.
pub fn tag_name(flags: DecorationFlags) -> Arc<str> {
  if let Some(name) = TAG_NAMES.read().get(&flags) {
    return Arc::clone(name);
  }

  let mut name = String::new();
  for (bit, part) in TAG_NAME_PARTS {
    if flags.contains(*bit) {
      if !name.is_empty() {
        name.push(' ');
      }
      name.push_str(part);
    }
  }
  let name: Arc<str> = Arc::from(name);

  let mut cache = TAG_NAMES.write();
  Arc::clone(cache.entry(flags).or_insert(name))
}

/// True for codes denoting "open tag X".
#[inline]
pub fn is_open_tag_code(code: i32) -> bool {
  code < 0 && code % 2 == -1
}

/// True for codes denoting "close tag X".
#[inline]
pub fn is_close_tag_code(code: i32) -> bool {
  code < 0 && code % 2 == 0
}

/// The close code paired with an open code.
#[inline]
pub fn close_code_for_open(code: i32) -> i32 {
  debug_assert!(is_open_tag_code(code));
  code - 1
}

#[derive(Default)]
struct RegistryInner {
  names: Vec<Arc<str>>,
  ids_by_name: HashMap<Arc<str>, usize>,
}

/// Issues stable open/close codes for tag names.
///
/// A display layer embeds one registry; codes are stable for the
/// registry's lifetime, so identical builds produce identical tag
/// streams.
#[derive(Default)]
pub struct TagRegistry {
  inner: RwLock<RegistryInner>,
}

impl TagRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn code_for_open_tag(&self, name: &str) -> i32 {
    -(2 * self.id_for_name(name) as i32 + 1)
  }

  pub fn code_for_close_tag(&self, name: &str) -> i32 {
    -(2 * self.id_for_name(name) as i32 + 2)
  }

  /// Reverses a code back to its tag name.
  pub fn tag_for_code(&self, code: i32) -> Option<Arc<str>> {
    if !is_open_tag_code(code) && !is_close_tag_code(code) {
      return None;
    }
    let id = ((-code - 1) / 2) as usize;
    self.inner.read().names.get(id).map(Arc::clone)
  }

  fn id_for_name(&self, name: &str) -> usize {
    if let Some(&id) = self.inner.read().ids_by_name.get(name) {
      return id;
    }

    let mut inner = self.inner.write();
    if let Some(&id) = inner.ids_by_name.get(name) {
      return id;
    }
    let id = inner.names.len();
    let name: Arc<str> = Arc::from(name);
    inner.names.push(Arc::clone(&name));
    inner.ids_by_name.insert(name, id);
    id
  }
}
