//! Diff, Match, and Patch: a pure, synchronous, in-memory text algorithms
//! library. Three engines share one set of tunables held on
//! [`DiffMatchPatch`]:
//!
//! - [`diff`] computes the edit script between two texts (Myers bisection,
//!   with a line-mode speedup for large inputs) and cleans it up for either
//!   human readability or minimal operation count.
//! - [`match_`] locates an approximate occurrence of a short pattern inside
//!   a larger text (bitap), tolerating both character differences and
//!   positional drift.
//! - [`patch`] builds context-bearing patches from a diff and fuzzily
//!   reapplies them against a possibly-changed copy of the source text.
//!
//! There is no global mutable configuration: every tunable lives on a
//! `DiffMatchPatch` value, so separate callers (or separate tests) never
//! interfere with each other.

pub mod diff;
pub mod error;
pub mod match_;
pub mod patch;
mod primitives;

use std::time::Duration;

pub use diff::{Diff, Op};
pub use error::{ConfigError, DeltaError, PatchTextError};
pub use patch::Patch;

/// Holds every tunable the three engines read. Construct with
/// [`Default::default()`] for the standard behavior, then adjust fields
/// directly; methods take `&self`, so callers needing different tuning for
/// different calls can keep several instances side by side.
#[derive(Debug, Clone, Copy)]
pub struct DiffMatchPatch {
    /// Number of seconds a diff computation may run before falling back to
    /// the best edit script found so far. `Duration::ZERO` disables the
    /// deadline (diff runs to completion no matter how long it takes).
    pub diff_timeout: Duration,
    /// Cost of an empty edit operation in terms of characters, used by
    /// [`diff::cleanup_efficiency`] to decide whether eliminating a short
    /// equality is worth the extra operation count.
    pub diff_edit_cost: i32,
    /// How forgiving [`match_main`](match_::match_main) is of a fuzzy
    /// match: `0.0` requires a perfect match, `1.0` accepts almost
    /// anything.
    pub match_threshold: f64,
    /// How many characters away from the expected location a match may be
    /// before its score is penalized to the point of rejection. `0` makes
    /// location an exact requirement.
    pub match_distance: u32,
    /// Largest pattern (de)match can search for, limited by the
    /// bit-parallel bitap algorithm's working integer width.
    pub match_max_bits: u32,
    /// Chunk size for context surrounding each patch hunk.
    pub patch_margin: usize,
    /// When patch application requires a fuzzy match, the maximum fraction
    /// of the hunk that may differ from what was recorded before the patch
    /// is rejected as inapplicable.
    pub patch_delete_threshold: f64,
}

impl Default for DiffMatchPatch {
    fn default() -> Self {
        DiffMatchPatch {
            diff_timeout: Duration::from_secs(1),
            diff_edit_cost: 4,
            match_threshold: 0.5,
            match_distance: 1000,
            match_max_bits: 32,
            patch_margin: 4,
            patch_delete_threshold: 0.5,
        }
    }
}

impl DiffMatchPatch {
    /// Computes the diff between `text1` and `text2`. `checklines` enables
    /// the line-mode speedup for large texts (usually what you want; set to
    /// `false` only when a precise, line-insensitive diff matters more than
    /// speed). Fails only when `checklines` is `true` and the inputs'
    /// distinct-line count overruns the line-mode alphabet ceiling.
    pub fn diff_main(&self, text1: &str, text2: &str, checklines: bool) -> Result<Vec<Diff>, ConfigError> {
        diff::diff_main(text1, text2, checklines, self.diff_timeout)
    }

    /// Runs [`Self::diff_main`] then applies the semantic cleanup pass
    /// (which itself folds in boundary alignment), producing a diff more
    /// suited for display to a human reader than for minimal-size storage.
    pub fn diff_main_cleaned(&self, text1: &str, text2: &str) -> Result<Vec<Diff>, ConfigError> {
        let mut diffs = self.diff_main(text1, text2, true)?;
        diff::cleanup_semantic(&mut diffs);
        Ok(diffs)
    }

    pub fn diff_cleanup_semantic(&self, diffs: &mut Vec<Diff>) {
        diff::cleanup_semantic(diffs);
    }

    pub fn diff_cleanup_semantic_lossless(&self, diffs: &mut Vec<Diff>) {
        diff::cleanup_semantic_lossless(diffs);
    }

    pub fn diff_cleanup_efficiency(&self, diffs: &mut Vec<Diff>) {
        diff::cleanup_efficiency(diffs, self.diff_edit_cost);
    }

    pub fn diff_levenshtein(&self, diffs: &[Diff]) -> usize {
        diff::levenshtein(diffs)
    }

    pub fn diff_to_delta(&self, diffs: &[Diff]) -> String {
        diff::to_delta(diffs)
    }

    pub fn diff_from_delta(&self, text1: &str, delta: &str) -> Result<Vec<Diff>, DeltaError> {
        diff::from_delta(text1, delta)
    }

    /// Finds the best fuzzy match for `pattern` in `text` near `loc`.
    /// Returns `None` when nothing scores within `match_threshold` — a
    /// missing match is a normal outcome, not an error; this only returns
    /// `Err` when `pattern` itself is too long for `match_max_bits`.
    pub fn match_main(&self, text: &str, pattern: &str, loc: usize) -> Result<Option<usize>, ConfigError> {
        match_::match_main(text, pattern, loc, self.match_threshold, self.match_distance, self.match_max_bits)
    }

    /// Builds patches transforming `text1` into `text2`. Fails only when the
    /// internal diff hits the line-mode alphabet ceiling; see
    /// [`Self::diff_main`].
    pub fn patch_make(&self, text1: &str, text2: &str) -> Result<Vec<Patch>, ConfigError> {
        patch::make_from_texts(text1, text2, &self.patch_options())
    }

    /// Builds patches from `text1` and a pre-computed diff against it,
    /// skipping the internal `diff_main` call (useful when the caller
    /// already has a cleaned-up diff it wants patches to match exactly).
    pub fn patch_make_from_diffs(&self, text1: &str, diffs: &[Diff]) -> Vec<Patch> {
        patch::make_from_text_and_diffs(text1, diffs, &self.patch_options())
    }

    /// Applies `patches` to `text`, returning the patched text and, for
    /// each patch, whether it applied successfully.
    pub fn patch_apply(&self, patches: &[Patch], text: &str) -> (String, Vec<bool>) {
        patch::apply(patches, text, &self.patch_options())
    }

    pub fn patch_split_max(&self, patches: &mut Vec<Patch>) {
        patch::split_max(patches, &self.patch_options());
    }

    pub fn patch_to_text(&self, patches: &[Patch]) -> String {
        patch::to_text(patches)
    }

    pub fn patch_from_text(&self, text: &str) -> Result<Vec<Patch>, PatchTextError> {
        patch::from_text(text)
    }

    fn patch_options(&self) -> patch::PatchOptions {
        patch::PatchOptions {
            diff_timeout: self.diff_timeout,
            diff_edit_cost: self.diff_edit_cost,
            patch_margin: self.patch_margin,
            patch_delete_threshold: self.patch_delete_threshold,
            match_threshold: self.match_threshold,
            match_distance: self.match_distance,
            match_max_bits: self.match_max_bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tunables_match_documented_values() {
        let dmp = DiffMatchPatch::default();
        assert_eq!(dmp.diff_timeout, Duration::from_secs(1));
        assert_eq!(dmp.diff_edit_cost, 4);
        assert_eq!(dmp.match_threshold, 0.5);
        assert_eq!(dmp.match_distance, 1000);
        assert_eq!(dmp.match_max_bits, 32);
        assert_eq!(dmp.patch_margin, 4);
        assert_eq!(dmp.patch_delete_threshold, 0.5);
    }

    #[test]
    fn end_to_end_diff_patch_round_trip() {
        let dmp = DiffMatchPatch::default();
        let text1 = "The quick brown fox jumps over the lazy dog.";
        let text2 = "The quick brown fox leaps over the lazy dog!";
        let patches = dmp.patch_make(text1, text2).unwrap();
        let (patched, results) = dmp.patch_apply(&patches, text1);
        assert!(results.iter().all(|&r| r));
        assert_eq!(patched, text2);
    }

    #[test]
    fn independent_instances_do_not_share_state() {
        let mut strict = DiffMatchPatch::default();
        strict.match_distance = 0;
        let lenient = DiffMatchPatch::default();
        assert_ne!(strict.match_distance, lenient.match_distance);
    }
}
