//! The patch engine: turning a diff into a context-bearing, serializable
//! patch, and fuzzily re-applying that patch against a (possibly drifted)
//! copy of the original text.

use std::sync::OnceLock;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use crate::diff::{self, cleanup_semantic_lossless, Diff, Op};
use crate::error::{ConfigError, PatchTextError};
use crate::match_::match_main;

const PATCH_UNRESERVED: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .remove(b' ')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'$')
    .remove(b',')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.');

/// One hunk of a patch: a diff sequence plus its location and extent in
/// both the source and destination texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub diffs: Vec<Diff>,
    pub start1: usize,
    pub start2: usize,
    pub length1: usize,
    pub length2: usize,
}

impl Patch {
    fn new() -> Self {
        Patch { diffs: Vec::new(), start1: 0, start2: 0, length1: 0, length2: 0 }
    }
}

/// Tunables a patch operation needs from the owning `DiffMatchPatch`
/// instance. Kept as a small copy-in struct so this module stays free of a
/// dependency on the crate-root type.
#[derive(Debug, Clone, Copy)]
pub struct PatchOptions {
    pub diff_timeout: std::time::Duration,
    pub diff_edit_cost: i32,
    pub patch_margin: usize,
    pub patch_delete_threshold: f64,
    pub match_threshold: f64,
    pub match_distance: u32,
    pub match_max_bits: u32,
}

/// Builds patches from a source text and its destination text, diffing
/// internally. Fails only when the internal diff hits the line-mode
/// alphabet ceiling.
pub fn make_from_texts(text1: &str, text2: &str, opts: &PatchOptions) -> Result<Vec<Patch>, ConfigError> {
    let mut diffs = diff::diff_main(text1, text2, true, opts.diff_timeout)?;
    if diffs.len() > 2 {
        diff::cleanup_semantic(&mut diffs);
        diff::cleanup_efficiency(&mut diffs, opts.diff_edit_cost);
    }
    Ok(make_from_diffs(text1, &diffs, opts))
}

/// Builds patches from a source text and a pre-computed diff against it.
pub fn make_from_text_and_diffs(text1: &str, diffs: &[Diff], opts: &PatchOptions) -> Vec<Patch> {
    make_from_diffs(text1, diffs, opts)
}

fn make_from_diffs(text1: &str, diffs: &[Diff], opts: &PatchOptions) -> Vec<Patch> {
    if diffs.is_empty() {
        return Vec::new();
    }

    let mut patches: Vec<Patch> = Vec::new();
    let mut patch = Patch::new();
    let mut char_count1 = 0usize;
    let mut char_count2 = 0usize;
    let text1_chars: Vec<char> = text1.chars().collect();
    let mut prepatch_text = text1_chars.clone();
    let mut postpatch_text = text1_chars.clone();

    for (i, diff) in diffs.iter().enumerate() {
        if patch.diffs.is_empty() && diff.op != Op::Equal {
            patch.start1 = char_count1;
            patch.start2 = char_count2;
        }

        match diff.op {
            Op::Insert => {
                patch.diffs.push(diff.clone());
                patch.length2 += diff.text.len();
                postpatch_text.splice(char_count2..char_count2, diff.text.iter().cloned());
            }
            Op::Delete => {
                patch.length1 += diff.text.len();
                patch.diffs.push(diff.clone());
                postpatch_text.splice(char_count2..char_count2 + diff.text.len(), std::iter::empty());
            }
            Op::Equal => {
                if diff.text.len() <= 2 * opts.patch_margin
                    && !patch.diffs.is_empty()
                    && i != diffs.len() - 1
                {
                    patch.diffs.push(diff.clone());
                    patch.length1 += diff.text.len();
                    patch.length2 += diff.text.len();
                } else if diff.text.len() >= 2 * opts.patch_margin && !patch.diffs.is_empty() {
                    add_context(&mut patch, &prepatch_text, opts.patch_margin, opts.match_max_bits);
                    patches.push(std::mem::replace(&mut patch, Patch::new()));
                    prepatch_text = postpatch_text.clone();
                    char_count1 = char_count2;
                }
            }
        }

        if diff.op != Op::Insert {
            char_count1 += diff.text.len();
        }
        if diff.op != Op::Delete {
            char_count2 += diff.text.len();
        }
    }

    if !patch.diffs.is_empty() {
        add_context(&mut patch, &prepatch_text, opts.patch_margin, opts.match_max_bits);
        patches.push(patch);
    }
    patches
}

/// Pads a patch's diff sequence with up to `margin` characters of
/// surrounding unchanged text on each side, so a fuzzy re-apply has enough
/// context to relocate the hunk even if nearby text shifted. Widens the
/// window in `margin`-sized steps while the pattern carved out of `text`
/// isn't unique in it and is still short enough for bitap to search, per
/// `max_bits`.
fn add_context(patch: &mut Patch, text: &[char], margin: usize, max_bits: u32) {
    if text.is_empty() {
        return;
    }

    let slice_start = patch.start2.min(text.len());
    let slice_end = (patch.start2 + patch.length1).min(text.len());
    let mut pattern: Vec<char> = text[slice_start..slice_end].to_vec();
    let mut padding = 0usize;
    let bits_cap = (max_bits as usize).saturating_sub(2 * margin);

    while count_occurrences(text, &pattern) != 1 && pattern.len() < bits_cap {
        padding += margin;
        let win_start = patch.start2.saturating_sub(padding).min(text.len());
        let win_end = (patch.start2 + patch.length1 + padding).min(text.len());
        pattern = text[win_start..win_end].to_vec();
    }

    padding += margin;
    let prefix_start = patch.start2.saturating_sub(padding).min(text.len());
    let prefix: Vec<char> = text[prefix_start..patch.start2.min(text.len())].to_vec();
    if !prefix.is_empty() {
        patch.diffs.insert(0, Diff::equal(prefix.clone()));
    }
    let suffix_start = (patch.start2 + patch.length1).min(text.len());
    let suffix_end = (suffix_start + padding).min(text.len());
    let suffix: Vec<char> = text[suffix_start..suffix_end].to_vec();
    if !suffix.is_empty() {
        patch.diffs.push(Diff::equal(suffix.clone()));
    }

    patch.start1 = patch.start1.saturating_sub(prefix.len());
    patch.start2 = patch.start2.saturating_sub(prefix.len());
    patch.length1 += prefix.len() + suffix.len();
    patch.length2 += prefix.len() + suffix.len();
}

fn count_occurrences(hay: &[char], needle: &[char]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut from = 0;
    while let Some(found) = crate::primitives::find_subslice_from(hay, needle, from) {
        count += 1;
        from = found + 1;
        if count > 1 {
            break;
        }
    }
    count
}

/// Splits any patch whose length exceeds `match_max_bits` into several
/// smaller patches, each individually within the pattern-length ceiling
/// that `match_main`'s bitap search can handle.
pub fn split_max(patches: &mut Vec<Patch>, opts: &PatchOptions) {
    let patch_size = opts.match_max_bits as usize;
    if patch_size == 0 {
        return;
    }
    let margin = opts.patch_margin;
    let mut x = 0usize;
    while x < patches.len() {
        if patches[x].length1 <= patch_size {
            x += 1;
            continue;
        }
        let big_patch = patches.remove(x);
        let mut start1 = big_patch.start1;
        let mut start2 = big_patch.start2;
        let mut precontext: Vec<char> = Vec::new();
        let mut remaining: std::collections::VecDeque<Diff> = big_patch.diffs.into();
        let mut insert_at = x;

        while !remaining.is_empty() {
            let mut patch = Patch::new();
            let mut empty = true;
            patch.start1 = start1 - precontext.len();
            patch.start2 = start2 - precontext.len();
            if !precontext.is_empty() {
                patch.length1 = precontext.len();
                patch.length2 = precontext.len();
                patch.diffs.push(Diff::equal(precontext.clone()));
            }

            while !remaining.is_empty() && patch.length1 < patch_size.saturating_sub(margin) {
                let diff_type = remaining[0].op;
                if diff_type == Op::Insert {
                    let diff = remaining.pop_front().unwrap();
                    patch.length2 += diff.text.len();
                    start2 += diff.text.len();
                    patch.diffs.push(diff);
                    empty = false;
                } else if diff_type == Op::Delete
                    && patch.diffs.len() == 1
                    && patch.diffs[0].op == Op::Equal
                    && remaining[0].text.len() > 2 * patch_size
                {
                    let diff = remaining.pop_front().unwrap();
                    patch.length1 += diff.text.len();
                    start1 += diff.text.len();
                    empty = false;
                    patch.diffs.push(diff);
                } else {
                    let take = remaining[0].text.len().min(patch_size.saturating_sub(margin).saturating_sub(patch.length1));
                    let head: Vec<char> = remaining[0].text[..take].to_vec();
                    patch.length1 += head.len();
                    start1 += head.len();
                    if diff_type == Op::Equal {
                        patch.length2 += head.len();
                        start2 += head.len();
                    } else {
                        empty = false;
                    }
                    patch.diffs.push(Diff::new(diff_type, head.clone()));
                    if head.len() == remaining[0].text.len() {
                        remaining.pop_front();
                    } else {
                        remaining[0].text.drain(..head.len());
                    }
                }
            }

            precontext = diff::text2(&patch.diffs).chars().collect();
            if precontext.len() > margin {
                precontext = precontext[precontext.len() - margin..].to_vec();
            }

            let postcontext: Vec<char> = remaining
                .iter()
                .take_while(|_| true)
                .flat_map(|d| if d.op != Op::Insert { d.text.clone() } else { Vec::new() })
                .take(margin)
                .collect();
            if !postcontext.is_empty() {
                patch.length1 += postcontext.len();
                patch.length2 += postcontext.len();
                match patch.diffs.last_mut() {
                    Some(last) if last.op == Op::Equal => last.text.extend_from_slice(&postcontext),
                    _ => patch.diffs.push(Diff::equal(postcontext)),
                }
            }

            if !empty {
                patches.insert(insert_at, patch);
                insert_at += 1;
            }
        }
        x = insert_at;
    }
}

/// Applies a set of patches to `text`, returning the patched text and a
/// per-patch success flag (soft failures, not errors — a patch may simply
/// fail to locate its context in drifted text).
pub fn apply(patches: &[Patch], text: &str, opts: &PatchOptions) -> (String, Vec<bool>) {
    if patches.is_empty() {
        return (text.to_string(), Vec::new());
    }

    let mut patches = patches.to_vec();
    let padding = add_padding(&mut patches, opts.patch_margin);
    let mut text_chars: Vec<char> = padding.chars().collect();
    text_chars.extend(text.chars());
    text_chars.extend(padding.chars());

    split_max(&mut patches, opts);

    let mut delta = 0i64;
    let mut results = vec![false; patches.len()];

    for (i, patch) in patches.iter().enumerate() {
        let expected_loc = (patch.start2 as i64 + delta) as usize;
        let text1 = diff::text1(&patch.diffs);
        let text1_chars: Vec<char> = text1.chars().collect();
        let mut start_loc: Option<usize> = None;
        let mut end_loc: Option<usize> = None;

        let text_str: String = text_chars.iter().collect();
        if text1_chars.len() > opts.match_max_bits as usize {
            let head: String = text1_chars[..opts.match_max_bits as usize].iter().collect();
            if let Ok(found) = match_main(&text_str, &head, expected_loc, opts.match_threshold, opts.match_distance, opts.match_max_bits) {
                start_loc = found;
            }
            if start_loc.is_some() {
                let tail_start = text1_chars.len() - opts.match_max_bits as usize;
                let tail: String = text1_chars[tail_start..].iter().collect();
                let tail_expected = expected_loc + text1_chars.len() - opts.match_max_bits as usize;
                if let Ok(found) = match_main(&text_str, &tail, tail_expected, opts.match_threshold, opts.match_distance, opts.match_max_bits) {
                    end_loc = found;
                }
                if end_loc.is_none() || end_loc.unwrap() < start_loc.unwrap() {
                    start_loc = None;
                }
            }
        } else {
            let head: String = text1_chars.iter().collect();
            if let Ok(found) = match_main(&text_str, &head, expected_loc, opts.match_threshold, opts.match_distance, opts.match_max_bits) {
                start_loc = found;
            }
        }

        let Some(start) = start_loc else {
            results[i] = false;
            delta -= patch.length2 as i64 - patch.length1 as i64;
            continue;
        };

        let actual_end = end_loc
            .map(|e| (e + opts.match_max_bits as usize).min(text_chars.len()))
            .unwrap_or((start + text1_chars.len()).min(text_chars.len()));

        let text2_actual: Vec<char> = text_chars[start..actual_end].to_vec();

        let applied = if text1_chars == text2_actual {
            let new_text: String = diff::text2(&patch.diffs);
            let new_chars: Vec<char> = new_text.chars().collect();
            text_chars.splice(start..start + text1_chars.len(), new_chars);
            true
        } else {
            apply_fuzzy(&mut text_chars, patch, start, &text1_chars, &text2_actual, opts)
        };
        results[i] = applied;

        if applied {
            delta = start as i64 - expected_loc as i64;
        } else {
            delta -= patch.length2 as i64 - patch.length1 as i64;
        }
    }

    let padding_len = padding.chars().count();
    let patched: String = text_chars[padding_len..text_chars.len() - padding_len].iter().collect();
    (patched, results)
}

/// Applies one patch's diffs into `text_chars` when the matched region
/// drifted from the patch's recorded source text. Diffs `expected` (this
/// patch's own source slice) against `actual` (what was actually found),
/// then walks `patch.diffs` re-targeting each insert/delete through
/// `x_index` so it lands in the right place in `actual` rather than
/// `expected`. `index1` advances on every non-insert op (inserted text
/// never existed in `expected`, so it must not advance a position tracked
/// in `expected`'s coordinate space); `x_index` naturally coalesces any
/// position inside a deleted span onto the same destination offset, which
/// is what keeps a delete immediately followed by an insert landing in the
/// right place even though `index1` has already moved past the deletion.
fn apply_fuzzy(
    text_chars: &mut Vec<char>,
    patch: &Patch,
    start: usize,
    expected: &[char],
    actual: &[char],
    opts: &PatchOptions,
) -> bool {
    // checklines=false never enters line-mode tokenization, so the
    // line-mode alphabet ceiling can't be hit here.
    let mut diffs = diff::diff_main(
        &expected.iter().collect::<String>(),
        &actual.iter().collect::<String>(),
        false,
        opts.diff_timeout,
    )
    .expect("checklines=false never triggers line-mode tokenization");
    if expected.len() > opts.match_max_bits as usize
        && diff::levenshtein(&diffs) as f64 / expected.len() as f64 > opts.patch_delete_threshold
    {
        return false;
    }
    cleanup_semantic_lossless(&mut diffs);

    let mut index1 = 0usize;
    let mut shift = 0i64;
    for diff in &patch.diffs {
        let index2 = if diff.op != Op::Equal { diff::x_index(&diffs, index1) } else { 0 };
        match diff.op {
            Op::Insert => {
                let at = (start as i64 + index2 as i64 + shift) as usize;
                text_chars.splice(at..at, diff.text.iter().cloned());
                shift += diff.text.len() as i64;
            }
            Op::Delete => {
                let index2_end = diff::x_index(&diffs, index1 + diff.text.len());
                let from = (start as i64 + index2 as i64 + shift) as usize;
                let to = (start as i64 + index2_end as i64 + shift) as usize;
                if to > from {
                    text_chars.splice(from..to, std::iter::empty());
                    shift -= (to - from) as i64;
                }
            }
            Op::Equal => {}
        }
        if diff.op != Op::Insert {
            index1 += diff.text.len();
        }
    }
    true
}

/// Prepends a block of `margin` distinct low-codepoint padding characters
/// (`\x01\x02...`) before the first patch's context and appends one after
/// the last patch's, so a hunk anchored at the very start or end of the text
/// still has room to fuzzy-match context on both sides. Every patch's
/// `start1`/`start2` shifts by `margin` to account for the prepended block;
/// only the first and last patches gain extra `Equal` text. Returns the
/// padding string used (callers must strip it back off after applying).
fn add_padding(patches: &mut [Patch], margin: usize) -> String {
    let padding: String = (1..=margin as u32).filter_map(char::from_u32).collect();
    let pad_chars: Vec<char> = padding.chars().collect();

    for patch in patches.iter_mut() {
        patch.start1 += margin;
        patch.start2 += margin;
    }

    if let Some(patch) = patches.first_mut() {
        match patch.diffs.first_mut() {
            Some(first) if first.op == Op::Equal => {
                if first.text.len() < margin {
                    let extra = margin - first.text.len();
                    let mut prefix = pad_chars[pad_chars.len() - extra..].to_vec();
                    prefix.extend_from_slice(&first.text);
                    first.text = prefix;
                    patch.start1 -= extra;
                    patch.start2 -= extra;
                    patch.length1 += extra;
                    patch.length2 += extra;
                }
            }
            _ => {
                patch.diffs.insert(0, Diff::equal(pad_chars.clone()));
                patch.start1 -= margin;
                patch.start2 -= margin;
                patch.length1 += margin;
                patch.length2 += margin;
            }
        }
    }

    if let Some(patch) = patches.last_mut() {
        match patch.diffs.last_mut() {
            Some(last) if last.op == Op::Equal => {
                if last.text.len() < margin {
                    let extra = margin - last.text.len();
                    last.text.extend_from_slice(&pad_chars[..extra]);
                    patch.length1 += extra;
                    patch.length2 += extra;
                }
            }
            _ => {
                patch.diffs.push(Diff::equal(pad_chars));
                patch.length1 += margin;
                patch.length2 += margin;
            }
        }
    }

    padding
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@@ -(\d+),?(\d*) \+(\d+),?(\d*) @@$").unwrap())
}

/// Serializes patches into the classic unified-diff-flavored text format:
/// `@@ -start1,length1 +start2,length2 @@` headers followed by `+`/`-`/` `
/// prefixed body lines, each percent-encoded the same way delta tokens are.
pub fn to_text(patches: &[Patch]) -> String {
    let mut out = String::new();
    for patch in patches {
        out.push_str(&patch_header(patch));
        for diff in &patch.diffs {
            let prefix = match diff.op {
                Op::Insert => '+',
                Op::Delete => '-',
                Op::Equal => ' ',
            };
            out.push(prefix);
            let s = diff.text_string();
            let encoded = utf8_percent_encode(&s, PATCH_UNRESERVED).to_string();
            out.push_str(&encoded.replace("%2B", "+"));
            out.push('\n');
        }
    }
    out
}

fn patch_header(patch: &Patch) -> String {
    let (coords1, coords2) = (
        format_coords(patch.start1, patch.length1),
        format_coords(patch.start2, patch.length2),
    );
    format!("@@ -{} +{} @@\n", coords1, coords2)
}

fn format_coords(start: usize, length: usize) -> String {
    match length {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

/// Parses patch text back into structured [`Patch`] values.
pub fn from_text(text: &str) -> Result<Vec<Patch>, PatchTextError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut patches = Vec::new();
    let lines: Vec<&str> = text.split('\n').collect();
    let mut i = 0usize;

    while i < lines.len() {
        if lines[i].is_empty() {
            i += 1;
            continue;
        }
        let caps = header_re()
            .captures(lines[i])
            .ok_or_else(|| PatchTextError::InvalidHeader(lines[i].to_string()))?;
        let mut patch = Patch::new();
        patch.start1 = caps[1].parse().map_err(|_| PatchTextError::InvalidHeader(lines[i].to_string()))?;
        if caps[2].is_empty() {
            patch.start1 -= 1;
            patch.length1 = 1;
        } else if &caps[2] == "0" {
            patch.length1 = 0;
        } else {
            patch.start1 -= 1;
            patch.length1 = caps[2].parse().map_err(|_| PatchTextError::InvalidHeader(lines[i].to_string()))?;
        }

        patch.start2 = caps[3].parse().map_err(|_| PatchTextError::InvalidHeader(lines[i].to_string()))?;
        if caps[4].is_empty() {
            patch.start2 -= 1;
            patch.length2 = 1;
        } else if &caps[4] == "0" {
            patch.length2 = 0;
        } else {
            patch.start2 -= 1;
            patch.length2 = caps[4].parse().map_err(|_| PatchTextError::InvalidHeader(lines[i].to_string()))?;
        }
        i += 1;

        while i < lines.len() {
            let line = lines[i];
            if line.is_empty() {
                i += 1;
                continue;
            }
            let mut chars = line.chars();
            let Some(sign) = chars.next() else {
                i += 1;
                continue;
            };
            if sign == '@' {
                break;
            }
            let rest: String = chars.collect();
            let pre_decoded = rest.replace('+', "%2b");
            let decoded = percent_decode_str(&pre_decoded)
                .decode_utf8()
                .map_err(|_| PatchTextError::InvalidEncoding(rest.clone()))?;
            let chars_vec: Vec<char> = decoded.chars().collect();
            match sign {
                '+' => patch.diffs.push(Diff::insert(chars_vec)),
                '-' => patch.diffs.push(Diff::delete(chars_vec)),
                ' ' => patch.diffs.push(Diff::equal(chars_vec)),
                _ => return Err(PatchTextError::InvalidLine(line.to_string())),
            }
            i += 1;
        }

        patches.push(patch);
    }

    Ok(patches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn opts() -> PatchOptions {
        PatchOptions {
            diff_timeout: Duration::from_secs(1),
            diff_edit_cost: 4,
            patch_margin: 4,
            patch_delete_threshold: 0.5,
            match_threshold: 0.5,
            match_distance: 1000,
            match_max_bits: 32,
        }
    }

    #[test]
    fn make_and_apply_round_trip() {
        let text1 = "The quick brown fox jumps over the lazy dog.";
        let text2 = "The quick brown fox leaps over the lazy dog!";
        let patches = make_from_texts(text1, text2, &opts()).unwrap();
        let (patched, results) = apply(&patches, text1, &opts());
        assert!(results.iter().all(|&r| r));
        assert_eq!(patched, text2);
    }

    #[test]
    fn apply_against_drifted_text_still_succeeds() {
        let text1 = "The quick brown fox jumps over the lazy dog.";
        let text2 = "The quick brown fox leaps over the lazy dog!";
        let patches = make_from_texts(text1, text2, &opts()).unwrap();
        let drifted = format!("Prefix text here.\n{}", text1);
        let (patched, results) = apply(&patches, &drifted, &opts());
        assert!(results.iter().any(|&r| r));
        assert!(patched.contains("leaps"));
    }

    #[test]
    fn to_text_from_text_round_trip() {
        let text1 = "line one\nline two\nline three\n";
        let text2 = "line one\nline TWO\nline three\n";
        let patches = make_from_texts(text1, text2, &opts()).unwrap();
        let serialized = to_text(&patches);
        let parsed = from_text(&serialized).unwrap();
        assert_eq!(parsed.len(), patches.len());
        assert_eq!(to_text(&parsed), serialized);
    }

    #[test]
    fn from_text_rejects_bad_header() {
        let err = from_text("not a header\n").unwrap_err();
        assert!(matches!(err, PatchTextError::InvalidHeader(_)));
    }

    #[test]
    fn add_padding_brackets_a_single_patch_with_distinct_low_codepoints() {
        let mut patches = make_from_texts("", "test", &opts()).unwrap();
        let padding = add_padding(&mut patches, 4);
        assert_eq!(padding, "\u{1}\u{2}\u{3}\u{4}");
        assert_eq!(patches[0].diffs.first().unwrap().text, padding.chars().collect::<Vec<_>>());
        // Control characters are outside to_text's unreserved set, so the
        // padding is percent-encoded in the serialized form rather than
        // appearing as raw bytes.
        assert_eq!(
            to_text(&patches),
            "@@ -1,8 +1,12 @@\n %01%02%03%04\n+test\n %01%02%03%04\n"
        );
    }
}
