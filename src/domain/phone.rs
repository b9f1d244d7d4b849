//! Masked phone input. Pure state transitions for the `+375 (29) 943-28-53` mask.
//!
//! The UI owns the mutable cell; this module only computes the next value.

/// Fixed country code. Never user-editable.
pub const COUNTRY_PREFIX: &str = "+375";

/// Value of an empty, focused field: prefix plus trailing space.
pub const EMPTY_VALUE: &str = "+375 ";

/// Digits required for a complete number (country code + area code + subscriber).
pub const MIN_DIGITS: usize = 12;

/// Digits of the country code; the mask skips them when grouping.
const PREFIX_DIGITS: usize = 3;

/// Re-derive the canonical mask from the digits of `raw`.
///
/// The first three digits are taken as the country code and replaced by
/// [`COUNTRY_PREFIX`]. The rest fill groups of 2, 3, 2, 2; a group opens only
/// once the previous one is full. Digits past the last group are dropped.
pub fn format(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let n = digits.len();
    let span = |from: usize, to: usize| &digits[from.min(n)..to.min(n)];

    let mut out = String::from(EMPTY_VALUE);
    if n > PREFIX_DIGITS {
        out.push('(');
        out.push_str(span(3, 5));
    }
    if n > 5 {
        out.push_str(") ");
        out.push_str(span(5, 8));
    }
    if n > 8 {
        out.push('-');
        out.push_str(span(8, 10));
    }
    if n > 10 {
        out.push('-');
        out.push_str(span(10, 12));
    }
    out
}

/// Count of ASCII digits in `text`.
pub fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}

/// True iff `text` carries at least [`MIN_DIGITS`] digits, separators ignored.
pub fn is_valid(text: &str) -> bool {
    digit_count(text) >= MIN_DIGITS
}

/// State of one phone field: what was last typed and what is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhoneEntry {
    raw: String,
    canonical: String,
}

impl PhoneEntry {
    /// Empty field, as mounted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Field pre-seeded with the bare prefix.
    pub fn seeded() -> Self {
        Self {
            raw: EMPTY_VALUE.to_string(),
            canonical: EMPTY_VALUE.to_string(),
        }
    }

    /// Build an entry from arbitrary text (e.g. a paste or a non-interactive prompt).
    pub fn from_input(raw: &str) -> Self {
        Self::seeded().on_change(raw)
    }

    /// Next state after the field text became `raw`.
    ///
    /// An edit that would cut into the prefix is rejected and the field is
    /// reset to [`EMPTY_VALUE`].
    pub fn on_change(&self, raw: &str) -> Self {
        if raw.chars().count() <= EMPTY_VALUE.len() && raw.starts_with(COUNTRY_PREFIX) {
            return Self::seeded();
        }
        Self {
            raw: raw.to_string(),
            canonical: format(raw),
        }
    }

    /// Next state when the field gains focus: seed the prefix so the caret
    /// lands after it.
    pub fn on_focus(&self) -> Self {
        if self.canonical.is_empty() || self.canonical == COUNTRY_PREFIX {
            Self::seeded()
        } else {
            self.clone()
        }
    }

    /// Displayed value.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Text as last typed, before masking.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn digit_count(&self) -> usize {
        digit_count(&self.raw)
    }

    pub fn is_valid(&self) -> bool {
        self.digit_count() >= MIN_DIGITS
    }

    /// Canonical value with whitespace removed, e.g. `+375(29)123-45-67`.
    /// This is how numbers appear inside lead messages.
    pub fn compact(&self) -> String {
        self.canonical.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

impl std::fmt::Display for PhoneEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}
