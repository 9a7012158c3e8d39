//! Text rewriting strategies for denied header and query values.
//!
//! An allow-list decides *whether* a value may be shown; a
//! [`TextRedactionPolicy`] decides *what* is shown instead when it may not.
//! Strategies are pure string transformations and never fail.

use std::borrow::Cow;

/// Marker that replaces a fully redacted value.
pub const REDACTED_MARKER: &str = "<REDACTED>";

/// Default character used to mask sensitive characters.
pub const MASK_CHAR: char = '*';

/// Configuration that keeps selected segments visible while masking the remainder.
///
/// The policy operates on Unicode scalar values. If the configuration keeps the
/// entire value visible, the output is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeepConfig {
    visible_prefix: usize,
    visible_suffix: usize,
    mask_char: char,
}

impl KeepConfig {
    /// Keeps only the first `visible_prefix` scalar values.
    #[must_use]
    pub fn first(visible_prefix: usize) -> Self {
        Self::both(visible_prefix, 0)
    }

    /// Keeps only the last `visible_suffix` scalar values.
    #[must_use]
    pub fn last(visible_suffix: usize) -> Self {
        Self::both(0, visible_suffix)
    }

    /// Keeps both leading and trailing characters visible.
    ///
    /// If `visible_prefix + visible_suffix >= total_length`, the entire value
    /// is kept visible.
    #[must_use]
    pub fn both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self {
            visible_prefix,
            visible_suffix,
            mask_char: MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();
        if total == 0 {
            return REDACTED_MARKER.to_string();
        }

        if self.visible_prefix.saturating_add(self.visible_suffix) >= total {
            return value.to_string();
        }

        for ch in &mut chars[self.visible_prefix..(total - self.visible_suffix)] {
            *ch = self.mask_char;
        }
        chars.into_iter().collect()
    }
}

/// Configuration that masks selected segments while leaving the remainder unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct MaskConfig {
    mask_prefix: usize,
    mask_suffix: usize,
    mask_char: char,
}

impl MaskConfig {
    /// Masks only the initial `mask_prefix` characters.
    #[must_use]
    pub fn first(mask_prefix: usize) -> Self {
        Self::both(mask_prefix, 0)
    }

    /// Masks only the final `mask_suffix` characters.
    #[must_use]
    pub fn last(mask_suffix: usize) -> Self {
        Self::both(0, mask_suffix)
    }

    /// Masks both leading and trailing characters.
    ///
    /// If `mask_prefix + mask_suffix >= total_length`, the entire value
    /// is masked.
    #[must_use]
    pub fn both(mask_prefix: usize, mask_suffix: usize) -> Self {
        Self {
            mask_prefix,
            mask_suffix,
            mask_char: MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();
        if total == 0 {
            return REDACTED_MARKER.to_string();
        }

        if self.mask_prefix.saturating_add(self.mask_suffix) >= total {
            chars.fill(self.mask_char);
            return chars.into_iter().collect();
        }

        for ch in &mut chars[..self.mask_prefix] {
            *ch = self.mask_char;
        }
        for ch in &mut chars[total - self.mask_suffix..] {
            *ch = self.mask_char;
        }
        chars.into_iter().collect()
    }
}

/// A rewriting strategy for a value that an allow-list rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextRedactionPolicy {
    /// Replace the entire value with a fixed placeholder.
    Full {
        /// The placeholder text to use.
        placeholder: Cow<'static, str>,
    },
    /// Keep configured segments visible while masking everything else.
    Keep(KeepConfig),
    /// Mask configured segments while leaving the remainder untouched.
    Mask(MaskConfig),
}

impl TextRedactionPolicy {
    /// Constructs [`TextRedactionPolicy::Full`] using [`REDACTED_MARKER`].
    #[must_use]
    pub fn default_full() -> Self {
        Self::Full {
            placeholder: Cow::Borrowed(REDACTED_MARKER),
        }
    }

    /// Constructs [`TextRedactionPolicy::Full`] using a custom placeholder.
    #[must_use]
    pub fn full_with<P>(placeholder: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self::Full {
            placeholder: placeholder.into(),
        }
    }

    /// Keeps only the first `visible_prefix` scalar values in clear text.
    #[must_use]
    pub fn keep_first(visible_prefix: usize) -> Self {
        Self::Keep(KeepConfig::first(visible_prefix))
    }

    /// Keeps only the last `visible_suffix` scalar values in clear text.
    ///
    /// ```
    /// use redactable_http::TextRedactionPolicy;
    ///
    /// let policy = TextRedactionPolicy::keep_last(4);
    /// assert_eq!(policy.apply_to("Bearer abcdef1234"), "*************1234");
    /// ```
    #[must_use]
    pub fn keep_last(visible_suffix: usize) -> Self {
        Self::Keep(KeepConfig::last(visible_suffix))
    }

    /// Masks the first `mask_prefix` scalar values.
    #[must_use]
    pub fn mask_first(mask_prefix: usize) -> Self {
        Self::Mask(MaskConfig::first(mask_prefix))
    }

    /// Masks the last `mask_suffix` scalar values.
    #[must_use]
    pub fn mask_last(mask_suffix: usize) -> Self {
        Self::Mask(MaskConfig::last(mask_suffix))
    }

    /// Returns `true` when the policy always emits [`REDACTED_MARKER`].
    pub(crate) fn is_marker(&self) -> bool {
        matches!(self, Self::Full { placeholder } if placeholder == REDACTED_MARKER)
    }

    /// Applies the policy to `value`.
    ///
    /// This method is total (it does not return errors).
    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        match self {
            Self::Full { placeholder } => placeholder.clone().into_owned(),
            Self::Keep(config) => config.apply_to(value),
            Self::Mask(config) => config.apply_to(value),
        }
    }
}

impl Default for TextRedactionPolicy {
    fn default() -> Self {
        Self::default_full()
    }
}

#[cfg(test)]
mod tests {
    use super::{KeepConfig, MaskConfig, REDACTED_MARKER, TextRedactionPolicy};

    #[test]
    fn full_policy_uses_marker() {
        let policy = TextRedactionPolicy::default_full();
        assert_eq!(policy.apply_to("secret"), REDACTED_MARKER);
        assert!(policy.is_marker());
        assert!(!TextRedactionPolicy::full_with("***").is_marker());
    }

    #[test]
    fn keep_policy_allows_full_visibility() {
        let policy = TextRedactionPolicy::Keep(KeepConfig::first(3));
        assert_eq!(policy.apply_to("ab"), "ab");
    }

    #[test]
    fn keep_policy_respects_mask_char() {
        let policy = TextRedactionPolicy::Keep(KeepConfig::first(2).with_mask_char('#'));
        assert_eq!(policy.apply_to("abcdef"), "ab####");
    }

    #[test]
    fn mask_policy_masks_first_and_last_segments() {
        assert_eq!(TextRedactionPolicy::mask_first(2).apply_to("abcdef"), "**cdef");
        assert_eq!(TextRedactionPolicy::mask_last(3).apply_to("abcdef"), "abc***");
        let both = TextRedactionPolicy::Mask(MaskConfig::both(2, 2));
        assert_eq!(both.apply_to("abcdef"), "**cd**");
        assert_eq!(both.apply_to("abc"), "***");
    }

    #[test]
    fn empty_values_become_marker() {
        assert_eq!(TextRedactionPolicy::keep_first(4).apply_to(""), REDACTED_MARKER);
        assert_eq!(TextRedactionPolicy::mask_first(4).apply_to(""), REDACTED_MARKER);
    }

    #[test]
    fn keep_both_overlap_keeps_entire_value() {
        let policy = TextRedactionPolicy::Keep(KeepConfig::both(usize::MAX, usize::MAX));
        assert_eq!(policy.apply_to("abcd"), "abcd");
    }
}
