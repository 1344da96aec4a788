//! The Myers bisection diff engine: computing, cleaning up, and serializing
//! the edit script between two texts.
//!
//! Internally everything works over `Vec<char>`/`&[char]`; `String`/`&str`
//! only appear at the public boundary.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use crate::error::{ConfigError, DeltaError};
use crate::primitives::{common_overlap, common_prefix, common_suffix, find_subslice};

/// Largest number of distinct lines `lines_to_chars` will synthesize tokens
/// for. One past this is the start of the UTF-16 surrogate block, so every
/// synthetic index stays a valid `char` without special-casing the gap.
pub const MAX_LINE_MODE_LINES: usize = 0xD7FF;

/// The kind of edit a [`Diff`] record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Delete,
    Insert,
    Equal,
}

/// One span of the edit script: an operation paired with the text it
/// applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub op: Op,
    pub text: Vec<char>,
}

/// Accepts either an already-built `Vec<char>` or a `&str` (collected into
/// one), so constructors below can take either without callers scattering
/// `.chars().collect()` everywhere. `str` has no blanket `Into<Vec<char>>`
/// in std, hence this small local trait instead of that bound.
pub trait IntoCharVec {
    fn into_char_vec(self) -> Vec<char>;
}

impl IntoCharVec for Vec<char> {
    fn into_char_vec(self) -> Vec<char> {
        self
    }
}

impl IntoCharVec for &str {
    fn into_char_vec(self) -> Vec<char> {
        self.chars().collect()
    }
}

impl Diff {
    pub fn new(op: Op, text: impl IntoCharVec) -> Self {
        Diff { op, text: text.into_char_vec() }
    }

    pub fn delete(text: impl IntoCharVec) -> Self {
        Diff::new(Op::Delete, text)
    }

    pub fn insert(text: impl IntoCharVec) -> Self {
        Diff::new(Op::Insert, text)
    }

    pub fn equal(text: impl IntoCharVec) -> Self {
        Diff::new(Op::Equal, text)
    }

    pub fn text_string(&self) -> String {
        self.text.iter().collect()
    }
}

// Percent-encoding character set used by `to_delta`/`from_delta`. These are
// the characters the classic delta format leaves unescaped verbatim; space
// is one of them, and is emitted literally rather than as `%20`.
const DELTA_UNRESERVED: &AsciiSet = &CONTROLS
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

/// Computes the difference between `text1` and `text2` using the default
/// (no-deadline) timeout behavior of `timeout`; `checklines` enables the
/// line-mode speedup for large inputs. Fails only when `checklines` is
/// `true` and the inputs' distinct-line count overruns
/// [`MAX_LINE_MODE_LINES`] (see [`lines_to_chars`]).
pub fn diff_main(
    text1: &str,
    text2: &str,
    checklines: bool,
    timeout: Duration,
) -> Result<Vec<Diff>, ConfigError> {
    let deadline = if timeout.is_zero() {
        None
    } else {
        Some(Instant::now() + timeout)
    };
    let a: Vec<char> = text1.chars().collect();
    let b: Vec<char> = text2.chars().collect();
    diff_main_chars(&a, &b, checklines, deadline)
}

fn diff_main_chars(
    text1: &[char],
    text2: &[char],
    checklines: bool,
    deadline: Option<Instant>,
) -> Result<Vec<Diff>, ConfigError> {
    if text1 == text2 {
        return Ok(if text1.is_empty() {
            Vec::new()
        } else {
            vec![Diff::equal(text1.to_vec())]
        });
    }

    let prefix_len = common_prefix(text1, text2);
    let (prefix, text1, text2) = (&text1[..prefix_len], &text1[prefix_len..], &text2[prefix_len..]);
    let suffix_len = common_suffix(text1, text2);
    let (suffix, text1, text2) = (
        &text1[text1.len() - suffix_len..],
        &text1[..text1.len() - suffix_len],
        &text2[..text2.len() - suffix_len],
    );

    let mut diffs = compute_diffs(text1, text2, checklines, deadline)?;

    if !prefix.is_empty() {
        diffs.insert(0, Diff::equal(prefix.to_vec()));
    }
    if !suffix.is_empty() {
        diffs.push(Diff::equal(suffix.to_vec()));
    }
    cleanup_merge(&mut diffs);
    Ok(diffs)
}

/// Core recursive diff, after common prefix/suffix have been stripped off.
pub fn compute_diffs(
    text1: &[char],
    text2: &[char],
    checklines: bool,
    deadline: Option<Instant>,
) -> Result<Vec<Diff>, ConfigError> {
    if text1.is_empty() {
        return Ok(if text2.is_empty() { Vec::new() } else { vec![Diff::insert(text2.to_vec())] });
    }
    if text2.is_empty() {
        return Ok(vec![Diff::delete(text1.to_vec())]);
    }

    let (long, short, long_is_text1) = if text1.len() > text2.len() {
        (text1, text2, true)
    } else {
        (text2, text1, false)
    };
    if let Some(i) = find_subslice(long, short) {
        let op_longer = if long_is_text1 { Op::Delete } else { Op::Insert };
        let mut diffs = vec![
            Diff::new(op_longer, long[..i].to_vec()),
            Diff::equal(short.to_vec()),
            Diff::new(op_longer, long[i + short.len()..].to_vec()),
        ];
        diffs.retain(|d| !d.text.is_empty());
        return Ok(diffs);
    }

    if short.len() == 1 {
        return Ok(vec![Diff::delete(text1.to_vec()), Diff::insert(text2.to_vec())]);
    }

    if deadline.is_some() {
        if let Some((t1a, t1b, t2a, t2b, mid)) = half_match(text1, text2) {
            let mut diffs_a = compute_diffs(&t1a, &t2a, checklines, deadline)?;
            let diffs_b = compute_diffs(&t1b, &t2b, checklines, deadline)?;
            diffs_a.push(Diff::equal(mid));
            diffs_a.extend(diffs_b);
            return Ok(diffs_a);
        }
    }

    if checklines && text1.len() > 100 && text2.len() > 100 {
        return diff_line_mode(text1, text2, deadline);
    }

    bisect(text1, text2, deadline)
}

/// Splits both texts on the longest prefix substring they have in common and
/// diffs that substring as a single synthetic-line `Equal` record, then
/// re-diffs the pieces at the character level and merges the trailing
/// sentinel equal back out explicitly (never via a blind `pop`).
fn diff_line_mode(text1: &[char], text2: &[char], deadline: Option<Instant>) -> Result<Vec<Diff>, ConfigError> {
    let (chars1, chars2, line_array) = lines_to_chars(text1, text2)?;
    let mut diffs = compute_diffs(&chars1, &chars2, false, deadline)?;
    chars_to_lines(&mut diffs, &line_array);
    cleanup_semantic(&mut diffs);

    diffs.push(Diff::equal(Vec::new()));
    let mut count_delete = 0usize;
    let mut count_insert = 0usize;
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();
    let mut result: Vec<Diff> = Vec::with_capacity(diffs.len());

    for diff in diffs {
        match diff.op {
            Op::Insert => {
                count_insert += 1;
                text_insert.extend(diff.text.iter());
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.extend(diff.text.iter());
            }
            Op::Equal => {
                if count_delete >= 1 && count_insert >= 1 {
                    let sub_diffs = compute_diffs(&text_delete, &text_insert, false, deadline)?;
                    result.extend(sub_diffs);
                } else {
                    if !text_delete.is_empty() {
                        result.push(Diff::delete(std::mem::take(&mut text_delete)));
                    }
                    if !text_insert.is_empty() {
                        result.push(Diff::insert(std::mem::take(&mut text_insert)));
                    }
                }
                count_delete = 0;
                count_insert = 0;
                text_delete.clear();
                text_insert.clear();
                if !diff.text.is_empty() {
                    result.push(diff);
                }
            }
        }
    }
    // Drop the sentinel equal we pushed above: it is always the last entry
    // we ourselves appended and carries no text of its own by construction.
    if let Some(last) = result.last() {
        if last.op == Op::Equal && last.text.is_empty() {
            result.pop();
        }
    }
    Ok(result)
}

/// Finds the bisection point between `text1` and `text2` with Myers'
/// O(ND) algorithm, returning the full diff.
pub fn bisect(text1: &[char], text2: &[char], deadline: Option<Instant>) -> Result<Vec<Diff>, ConfigError> {
    let (len1, len2) = (text1.len() as i64, text2.len() as i64);
    let max_d = (len1 + len2 + 1) / 2;
    let v_offset = max_d;
    let v_len = 2 * max_d;

    let mut v1 = vec![-1i64; v_len as usize];
    let mut v2 = vec![-1i64; v_len as usize];
    v1[v_offset as usize + 1] = 0;
    v2[v_offset as usize + 1] = 0;

    let delta = len1 - len2;
    let front = delta % 2 != 0;

    let mut k1start = 0i64;
    let mut k1end = 0i64;
    let mut k2start = 0i64;
    let mut k2end = 0i64;

    for d in 0..max_d {
        if let Some(dl) = deadline {
            if Instant::now() >= dl {
                break;
            }
        }

        let mut k1 = -d + k1start;
        while k1 <= d - k1end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < len1 && y1 < len2 && text1[x1 as usize] == text2[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;
            if x1 > len1 {
                k1end += 2;
            } else if y1 > len2 {
                k1start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if (0..v_len).contains(&k2_offset) && v2[k2_offset as usize] != -1 {
                    let x2 = len1 - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return bisect_split(text1, text2, x1, y1, deadline);
                    }
                }
            }
            k1 += 2;
        }

        let mut k2 = -d + k2start;
        while k2 <= d - k2end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < len1 && y2 < len2 && text1[(len1 - x2 - 1) as usize] == text2[(len2 - y2 - 1) as usize] {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;
            if x2 > len1 {
                k2end += 2;
            } else if y2 > len2 {
                k2start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if (0..v_len).contains(&k1_offset) && v1[k1_offset as usize] != -1 {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    let x2 = len1 - x2;
                    if x1 >= x2 {
                        return bisect_split(text1, text2, x1, len2 - (y1 - v_offset), deadline);
                    }
                }
            }
            k2 += 2;
        }
    }

    Ok(vec![Diff::delete(text1.to_vec()), Diff::insert(text2.to_vec())])
}

fn bisect_split(
    text1: &[char],
    text2: &[char],
    x: i64,
    y: i64,
    deadline: Option<Instant>,
) -> Result<Vec<Diff>, ConfigError> {
    let (x, y) = (x as usize, y as usize);
    let (text1a, text1b) = text1.split_at(x);
    let (text2a, text2b) = text2.split_at(y);
    let mut diffs = compute_diffs(text1a, text2a, false, deadline)?;
    let diffs_b = compute_diffs(text1b, text2b, false, deadline)?;
    diffs.extend(diffs_b);
    Ok(diffs)
}

/// Looks for a common substring at least half as long as the longer text,
/// returning the four surrounding pieces and the shared middle on success.
fn half_match(text1: &[char], text2: &[char]) -> Option<(Vec<char>, Vec<char>, Vec<char>, Vec<char>, Vec<char>)> {
    let (long, short, swapped) = if text1.len() > text2.len() {
        (text1, text2, false)
    } else {
        (text2, text1, true)
    };
    if long.len() < 4 || short.len() * 2 < long.len() {
        return None;
    }

    let hm1 = half_match_i(long, short, (long.len() + 3) / 4);
    let hm2 = half_match_i(long, short, (long.len() + 1) / 2);

    let hm = match (hm1, hm2) {
        (None, None) => return None,
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (Some(a), Some(b)) => {
            if a.4.len() > b.4.len() {
                a
            } else {
                b
            }
        }
    };

    let (long_a, long_b, short_a, short_b, mid) = hm;
    if swapped {
        Some((short_a, short_b, long_a, long_b, mid))
    } else {
        Some((long_a, long_b, short_a, short_b, mid))
    }
}

type HalfMatchPieces = (Vec<char>, Vec<char>, Vec<char>, Vec<char>, Vec<char>);

fn half_match_i(long: &[char], short: &[char], i: usize) -> Option<HalfMatchPieces> {
    let seed = &long[i..(i + long.len() / 4).min(long.len())];
    let mut best_common: Vec<char> = Vec::new();
    let mut best = None;
    let mut j_opt = find_subslice(short, seed);
    while let Some(j) = j_opt {
        let prefix_len = common_prefix(&long[i..], &short[j..]);
        let suffix_len = common_suffix(&long[..i], &short[..j]);
        if best_common.len() < suffix_len + prefix_len {
            let mut common: Vec<char> = short[j - suffix_len..j].to_vec();
            common.extend_from_slice(&short[j..j + prefix_len]);
            best_common = common;
            best = Some((
                long[..i - suffix_len].to_vec(),
                long[i + prefix_len..].to_vec(),
                short[..j - suffix_len].to_vec(),
                short[j + prefix_len..].to_vec(),
            ));
        }
        j_opt = crate::primitives::find_subslice_from(short, seed, j + 1);
    }

    if best_common.len() * 2 >= long.len() {
        let (a, b, c, d) = best.unwrap();
        Some((a, b, c, d, best_common))
    } else {
        None
    }
}

/// Tokenizes unique lines of `text1`/`text2` into synthetic single-`char`
/// codes, returning the two token sequences and the reverse lookup array.
/// Raises [`ConfigError::TooManyUniqueLines`] rather than reusing a
/// previously assigned index once the alphabet fills up, since silently
/// aliasing two distinct lines to the same token would corrupt the
/// line-mode diff.
fn lines_to_chars(
    text1: &[char],
    text2: &[char],
) -> Result<(Vec<char>, Vec<char>, Vec<Vec<char>>), ConfigError> {
    let mut line_array: Vec<Vec<char>> = vec![Vec::new()];
    let mut line_hash: HashMap<Vec<char>, usize> = HashMap::new();

    let mut encode = |text: &[char], max_lines: usize| -> Result<Vec<char>, ConfigError> {
        let mut chars = Vec::new();
        let mut start = 0usize;
        while start < text.len() {
            let mut end = match find_subslice(&text[start..], &['\n']) {
                Some(rel) => start + rel,
                None => text.len() - 1,
            };
            if end + 1 > text.len() - 1 && end != text.len() - 1 {
                end = text.len() - 1;
            }
            let line_end = if end < text.len() - 1 || text[text.len() - 1] == '\n' {
                end + 1
            } else {
                text.len()
            };
            let line = &text[start..line_end];
            start = line_end;

            if let Some(&idx) = line_hash.get(line) {
                chars.push(char::from_u32(idx as u32).unwrap());
            } else if line_array.len() == max_lines {
                return Err(ConfigError::TooManyUniqueLines {
                    limit: MAX_LINE_MODE_LINES,
                    found: line_array.len() + 1,
                });
            } else {
                line_array.push(line.to_vec());
                line_hash.insert(line.to_vec(), line_array.len() - 1);
                chars.push(char::from_u32((line_array.len() - 1) as u32).unwrap());
            }
        }
        Ok(chars)
    };

    let chars1 = encode(text1, MAX_LINE_MODE_LINES)?;
    let chars2 = encode(text2, MAX_LINE_MODE_LINES + 1)?;
    Ok((chars1, chars2, line_array))
}

fn chars_to_lines(diffs: &mut [Diff], line_array: &[Vec<char>]) {
    for diff in diffs.iter_mut() {
        let mut text = Vec::with_capacity(diff.text.len());
        for &c in &diff.text {
            text.extend_from_slice(&line_array[c as usize]);
        }
        diff.text = text;
    }
}

/// Merges adjacent equal operations, splits overlapping insert/delete pairs
/// on shared prefixes/suffixes, and repeats the shift pass until a fixpoint.
pub fn cleanup_merge(diffs: &mut Vec<Diff>) {
    loop {
        cleanup_merge_once(diffs);
        if !cleanup_merge_shift_pass(diffs) {
            break;
        }
    }
}

fn cleanup_merge_once(diffs: &mut Vec<Diff>) {
    diffs.push(Diff::equal(Vec::new()));
    let mut pointer = 0usize;
    let mut count_delete = 0usize;
    let mut count_insert = 0usize;
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();

    while pointer < diffs.len() {
        match diffs[pointer].op {
            Op::Insert => {
                count_insert += 1;
                text_insert.extend(diffs[pointer].text.iter());
                pointer += 1;
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.extend(diffs[pointer].text.iter());
                pointer += 1;
            }
            Op::Equal => {
                if count_delete + count_insert > 1 {
                    if count_delete != 0 && count_insert != 0 {
                        let prefix_len = common_prefix(&text_insert, &text_delete);
                        if prefix_len != 0 {
                            let idx = pointer - count_delete - count_insert;
                            if idx > 0 && diffs[idx - 1].op == Op::Equal {
                                diffs[idx - 1].text.extend_from_slice(&text_insert[..prefix_len]);
                            } else {
                                diffs.insert(0, Diff::equal(text_insert[..prefix_len].to_vec()));
                                pointer += 1;
                            }
                            text_insert.drain(..prefix_len);
                            text_delete.drain(..prefix_len);
                        }
                        let suffix_len = common_suffix(&text_insert, &text_delete);
                        if suffix_len != 0 {
                            let mut new_eq = text_insert[text_insert.len() - suffix_len..].to_vec();
                            new_eq.extend_from_slice(&diffs[pointer].text);
                            diffs[pointer].text = new_eq;
                            text_insert.truncate(text_insert.len() - suffix_len);
                            text_delete.truncate(text_delete.len() - suffix_len);
                        }
                    }

                    let splice_start = pointer - count_delete - count_insert;
                    let mut replacement = Vec::new();
                    if !text_delete.is_empty() {
                        replacement.push(Diff::delete(text_delete.clone()));
                    }
                    if !text_insert.is_empty() {
                        replacement.push(Diff::insert(text_insert.clone()));
                    }
                    let removed = count_delete + count_insert;
                    let replacement_len = replacement.len();
                    diffs.splice(splice_start..splice_start + removed, replacement);
                    pointer = splice_start + replacement_len + 1;
                } else if pointer != 0 && diffs[pointer - 1].op == Op::Equal {
                    diffs[pointer - 1].text.extend_from_slice(&diffs[pointer].text.clone());
                    diffs.remove(pointer);
                } else {
                    pointer += 1;
                }

                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }

    if diffs.last().map(|d| d.text.is_empty()).unwrap_or(false) {
        diffs.pop();
    }
}

/// Second half of `cleanup_merge`: slides a single edit across a matching
/// equality on either side so runs coalesce (e.g. `Equal(A) Insert(BA)
/// Equal(C)` becomes `Insert(AB) Equal(AC)` with the now-redundant leading
/// equality dropped). Removes the absorbed equality, so the list shrinks by
/// one each time this fires; `cleanup_merge` reruns the whole pass whenever
/// it does.
fn cleanup_merge_shift_pass(diffs: &mut Vec<Diff>) -> bool {
    let mut changed = false;
    let mut pointer = 1usize;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            let prev = diffs[pointer - 1].text.clone();
            let next = diffs[pointer + 1].text.clone();
            let cur = diffs[pointer].text.clone();

            if ends_with(&cur, &prev) {
                let keep_len = cur.len() - prev.len();
                let mut new_cur = prev.clone();
                new_cur.extend_from_slice(&cur[..keep_len]);
                diffs[pointer].text = new_cur;
                let mut new_next = prev;
                new_next.extend_from_slice(&next);
                diffs[pointer + 1].text = new_next;
                diffs.remove(pointer - 1);
                changed = true;
            } else if starts_with(&cur, &next) {
                let mut new_prev = prev;
                new_prev.extend_from_slice(&next);
                diffs[pointer - 1].text = new_prev;
                let mut new_cur = cur[next.len()..].to_vec();
                new_cur.extend_from_slice(&next);
                diffs[pointer].text = new_cur;
                diffs.remove(pointer + 1);
                changed = true;
            }
        }
        pointer += 1;
    }
    changed
}

fn ends_with(text: &[char], suffix: &[char]) -> bool {
    !suffix.is_empty() && text.len() >= suffix.len() && &text[text.len() - suffix.len()..] == suffix
}

fn starts_with(text: &[char], prefix: &[char]) -> bool {
    !prefix.is_empty() && text.len() >= prefix.len() && &text[..prefix.len()] == prefix
}

/// Removes edits too small to be meaningful to a human reader, trading away
/// some efficiency for semantic clarity.
pub fn cleanup_semantic(diffs: &mut Vec<Diff>) {
    let mut changed = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;
    let mut pointer = 0usize;
    let mut len_insertions2 = 0usize;
    let mut len_deletions2 = 0usize;
    let mut len_insertions1 = 0usize;
    let mut len_deletions1 = 0usize;

    while pointer < diffs.len() {
        if diffs[pointer].op == Op::Equal {
            equalities.push(pointer);
            len_insertions1 = len_insertions2;
            len_deletions1 = len_deletions2;
            len_insertions2 = 0;
            len_deletions2 = 0;
            last_equality = Some(diffs[pointer].text.clone());
        } else {
            if diffs[pointer].op == Op::Insert {
                len_insertions2 += diffs[pointer].text.len();
            } else {
                len_deletions2 += diffs[pointer].text.len();
            }
            if let Some(eq) = &last_equality {
                if eq.len() <= len_insertions1.max(len_deletions1) && eq.len() <= len_insertions2.max(len_deletions2)
                {
                    if let Some(&eq_pointer) = equalities.last() {
                        diffs.insert(eq_pointer, Diff::delete(eq.clone()));
                        diffs[eq_pointer + 1] = Diff::insert(eq.clone());
                        equalities.pop();
                        equalities.pop();
                        pointer = equalities.last().map(|&p| p + 1).unwrap_or(0);
                        last_equality = None;
                        len_insertions1 = 0;
                        len_deletions1 = 0;
                        len_insertions2 = 0;
                        len_deletions2 = 0;
                        changed = true;
                        continue;
                    }
                }
            }
        }
        pointer += 1;
    }

    if changed {
        cleanup_merge(diffs);
    }
    cleanup_semantic_lossless(diffs);
    cleanup_semantic_overlap(diffs);
}

/// Second pass of semantic cleanup: trims overlapping text at Delete/Insert
/// boundaries that cleanup_merge's overlap step doesn't reach on its own
/// (e.g. `<del>abcxxx</del><ins>xxxdef</ins>` -> `<del>abc</del>xxx<ins>def</ins>`).
fn cleanup_semantic_overlap(diffs: &mut Vec<Diff>) {
    let mut pointer = 1usize;
    while pointer < diffs.len() {
        if pointer >= 1
            && diffs[pointer - 1].op == Op::Delete
            && diffs[pointer].op == Op::Insert
        {
            let deletion = diffs[pointer - 1].text.clone();
            let insertion = diffs[pointer].text.clone();
            let overlap_len1 = common_overlap(&deletion, &insertion);
            let overlap_len2 = common_overlap(&insertion, &deletion);
            if overlap_len1 >= overlap_len2 {
                if overlap_len1 as f64 >= deletion.len() as f64 / 2.0
                    || overlap_len1 as f64 >= insertion.len() as f64 / 2.0
                {
                    let mut new_diffs = vec![
                        Diff::delete(deletion[..deletion.len() - overlap_len1].to_vec()),
                        Diff::equal(insertion[..overlap_len1].to_vec()),
                        Diff::insert(insertion[overlap_len1..].to_vec()),
                    ];
                    new_diffs.retain(|d| !d.text.is_empty());
                    let new_len = new_diffs.len();
                    diffs.splice(pointer - 1..=pointer, new_diffs);
                    pointer = pointer - 1 + new_len;
                    continue;
                }
            } else if overlap_len2 as f64 >= deletion.len() as f64 / 2.0
                || overlap_len2 as f64 >= insertion.len() as f64 / 2.0
            {
                let mut new_diffs = vec![
                    Diff::delete(deletion[overlap_len2..].to_vec()),
                    Diff::equal(deletion[..overlap_len2].to_vec()),
                    Diff::insert(insertion[..insertion.len() - overlap_len2].to_vec()),
                ];
                new_diffs.retain(|d| !d.text.is_empty());
                let new_len = new_diffs.len();
                diffs.splice(pointer - 1..=pointer, new_diffs);
                pointer = pointer - 1 + new_len;
                continue;
            }
        }
        pointer += 1;
    }
}

fn blank_line_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\r?\n\z").unwrap())
}

fn blank_line_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A\r?\n\r?\n").unwrap())
}

/// Scores how good a split point is for human readability: 5 = blank-line
/// boundary, 4 = line boundary, 3 = sentence boundary, 2 = word boundary,
/// 1 = whitespace, 0 = mid-word.
fn cleanup_semantic_score(one: &[char], two: &[char]) -> u8 {
    if one.is_empty() || two.is_empty() {
        return 6;
    }
    let char1 = one[one.len() - 1];
    let char2 = two[0];
    let non_alnum1 = !char1.is_alphanumeric();
    let non_alnum2 = !char2.is_alphanumeric();
    let whitespace1 = non_alnum1 && char1.is_whitespace();
    let whitespace2 = non_alnum2 && char2.is_whitespace();
    let line_break1 = whitespace1 && (char1 == '\n' || char1 == '\r');
    let line_break2 = whitespace2 && (char2 == '\n' || char2 == '\r');

    let one_s: String = one.iter().collect();
    let two_s: String = two.iter().collect();
    let blank_line1 = line_break1 && blank_line_end_re().is_match(&one_s);
    let blank_line2 = line_break2 && blank_line_start_re().is_match(&two_s);

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alnum1 && !whitespace1 && whitespace2 {
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alnum1 || non_alnum2 {
        1
    } else {
        0
    }
}

/// Shifts diff boundaries onto the best nearby word/sentence/line break so
/// the edit script reads naturally instead of splitting mid-word.
pub fn cleanup_semantic_lossless(diffs: &mut Vec<Diff>) {
    let mut pointer = 1usize;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            let mut equality1 = diffs[pointer - 1].text.clone();
            let mut edit = diffs[pointer].text.clone();
            let mut equality2 = diffs[pointer + 1].text.clone();

            let common_offset = common_suffix(&equality1, &edit);
            if common_offset > 0 {
                let common_str = edit[edit.len() - common_offset..].to_vec();
                equality1.truncate(equality1.len() - common_offset);
                edit = {
                    let mut t = common_str.clone();
                    t.extend_from_slice(&edit[..edit.len() - common_offset]);
                    t
                };
                equality2 = {
                    let mut t = common_str;
                    t.extend_from_slice(&equality2);
                    t
                };
            }

            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score = cleanup_semantic_score(&equality1, &edit) + cleanup_semantic_score(&edit, &equality2);

            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2[0]);
                equality2.remove(0);
                let score = cleanup_semantic_score(&equality1, &edit) + cleanup_semantic_score(&edit, &equality2);
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if diffs[pointer - 1].text != best_equality1 {
                if best_equality1.is_empty() {
                    let removed = diffs.remove(pointer - 1);
                    drop(removed);
                    pointer -= 1;
                } else {
                    diffs[pointer - 1].text = best_equality1;
                }
                diffs[pointer].text = best_edit;
                if best_equality2.is_empty() {
                    diffs.remove(pointer + 1);
                } else {
                    diffs[pointer + 1].text = best_equality2;
                }
            }
        }
        pointer += 1;
    }
}

/// Reduces the edit script to minimize operation count at the cost of some
/// extra characters, per `diff_edit_cost`: short equalities surrounded by
/// edits on both sides are absorbed if that reduces total operations.
pub fn cleanup_efficiency(diffs: &mut Vec<Diff>, edit_cost: i32) {
    let mut changed = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;
    let mut pointer = 0usize;
    let mut pre_ins = false;
    let mut pre_del = false;
    let mut post_ins = false;
    let mut post_del = false;

    while pointer < diffs.len() {
        if diffs[pointer].op == Op::Equal {
            if diffs[pointer].text.len() < edit_cost as usize && (post_ins || post_del) {
                equalities.push(pointer);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(diffs[pointer].text.clone());
            } else {
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
        } else {
            if diffs[pointer].op == Op::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }

            if let Some(eq) = last_equality.clone() {
                let should_fix = (pre_ins && pre_del && post_ins && post_del)
                    || (eq.len() < (edit_cost as usize) / 2 && (pre_ins as u8 + pre_del as u8 + post_ins as u8 + post_del as u8) == 3);
                if should_fix {
                    if let Some(&eq_pointer) = equalities.last() {
                        diffs.insert(eq_pointer, Diff::delete(eq.clone()));
                        diffs[eq_pointer + 1] = Diff::insert(eq);
                        equalities.pop();
                        last_equality = None;
                        if pre_ins && pre_del {
                            post_ins = true;
                            post_del = true;
                            equalities.clear();
                        } else {
                            if let Some(&p) = equalities.last() {
                                pointer = p;
                            } else {
                                pointer = 0;
                            }
                            post_ins = false;
                            post_del = false;
                        }
                        changed = true;
                        continue;
                    }
                }
            }
        }
        pointer += 1;
    }

    if changed {
        cleanup_merge(diffs);
    }
}

/// Computes the Levenshtein edit distance implied by a diff (number of
/// inserted plus deleted characters; unmerged adjacent insert/delete runs of
/// equal length count only the larger side, as in the classic algorithm).
pub fn levenshtein(diffs: &[Diff]) -> usize {
    let mut levenshtein = 0usize;
    let mut insertions = 0usize;
    let mut deletions = 0usize;
    for diff in diffs {
        match diff.op {
            Op::Insert => insertions += diff.text.len(),
            Op::Delete => deletions += diff.text.len(),
            Op::Equal => {
                levenshtein += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }
    levenshtein += insertions.max(deletions);
    levenshtein
}

/// `loc1`-in-`text1` to equivalent `loc2`-in-`text2` index translation.
pub fn x_index(diffs: &[Diff], loc1: usize) -> usize {
    let mut chars1 = 0usize;
    let mut chars2 = 0usize;
    let mut last_chars1 = 0usize;
    let mut last_chars2 = 0usize;
    let mut last_op: Option<Op> = None;

    for diff in diffs {
        if diff.op != Op::Insert {
            chars1 += diff.text.len();
        }
        if diff.op != Op::Delete {
            chars2 += diff.text.len();
        }
        if chars1 > loc1 {
            last_op = Some(diff.op);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }

    if last_op == Some(Op::Delete) {
        return last_chars2;
    }
    last_chars2 + (loc1 - last_chars1)
}

/// Reconstructs `text1` (the source text) from a diff sequence.
pub fn text1(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Op::Insert)
        .flat_map(|d| d.text.iter())
        .collect()
}

/// Reconstructs `text2` (the destination text) from a diff sequence.
pub fn text2(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Op::Delete)
        .flat_map(|d| d.text.iter())
        .collect()
}

/// Serializes a diff sequence into the compact delta wire format: one
/// token per record, `=N` for equal runs, `-N` for deletions, and
/// `+<percent-encoded text>` for insertions, separated by tab characters.
pub fn to_delta(diffs: &[Diff]) -> String {
    let mut text = String::new();
    for (i, diff) in diffs.iter().enumerate() {
        if i > 0 {
            text.push('\t');
        }
        match diff.op {
            Op::Insert => {
                let s = diff.text_string();
                let encoded = utf8_percent_encode(&s, DELTA_UNRESERVED).to_string();
                text.push('+');
                text.push_str(&encoded.replace("%2B", "+"));
            }
            Op::Delete => {
                text.push('-');
                text.push_str(&diff.text.len().to_string());
            }
            Op::Equal => {
                text.push('=');
                text.push_str(&diff.text.len().to_string());
            }
        }
    }
    text
}

/// Parses a delta string against its source text, reconstructing the full
/// diff sequence. Mirrors the reference implementation's quirk of
/// pre-decoding a literal `+` into `%2b` before percent-decoding insert
/// tokens (classic delta streams produced by a JS encoder leave `+` bare).
pub fn from_delta(text1: &str, delta: &str) -> Result<Vec<Diff>, DeltaError> {
    let source: Vec<char> = text1.chars().collect();
    let mut diffs = Vec::new();
    let mut pointer = 0usize;

    for token in delta.split('\t') {
        if token.is_empty() {
            continue;
        }
        let mut chars = token.chars();
        let prefix = chars.next().unwrap();
        let rest: String = chars.collect();

        match prefix {
            '+' => {
                let pre_decoded = rest.replace('+', "%2b");
                let decoded = percent_decode_str(&pre_decoded)
                    .decode_utf8()
                    .map_err(|_| DeltaError::InvalidEncoding(rest.clone()))?;
                diffs.push(Diff::insert(decoded.chars().collect::<Vec<char>>()));
            }
            '-' | '=' => {
                let count: usize = rest
                    .parse()
                    .map_err(|_| DeltaError::InvalidCount(rest.clone()))?;
                if pointer + count > source.len() {
                    return Err(DeltaError::Overrun(pointer + count - source.len()));
                }
                let slice = source[pointer..pointer + count].to_vec();
                pointer += count;
                if prefix == '=' {
                    diffs.push(Diff::equal(slice));
                } else {
                    diffs.push(Diff::delete(slice));
                }
            }
            other => return Err(DeltaError::InvalidTokenPrefix(other)),
        }
    }

    if pointer != source.len() {
        return Err(DeltaError::Unconsumed(source.len() - pointer));
    }
    Ok(diffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn run(t1: &str, t2: &str) -> Vec<Diff> {
        diff_main(t1, t2, true, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn identical_texts_yield_no_diff() {
        assert!(run("same", "same").is_empty());
    }

    #[test]
    fn simple_insertion() {
        let diffs = run("abc", "abXc");
        assert_eq!(text1(&diffs), "abc");
        assert_eq!(text2(&diffs), "abXc");
    }

    #[test]
    fn delta_round_trip() {
        let diffs = run("The quick brown fox", "The slow red fox jumps");
        let delta = to_delta(&diffs);
        let restored = from_delta("The quick brown fox", &delta).unwrap();
        assert_eq!(text2(&restored), text2(&diffs));
    }

    #[test]
    fn from_delta_rejects_unknown_prefix() {
        let err = from_delta("abc", "*3").unwrap_err();
        assert_eq!(err, DeltaError::InvalidTokenPrefix('*'));
    }

    #[test]
    fn levenshtein_counts_edits() {
        let diffs = vec![Diff::equal("abc"), Diff::delete("xx"), Diff::insert("y")];
        assert_eq!(levenshtein(&diffs), 2);
    }

    #[test]
    fn lines_to_chars_rejects_more_distinct_lines_than_the_ceiling() {
        let text1: Vec<char> = (0..=MAX_LINE_MODE_LINES)
            .flat_map(|i| format!("{}\n", i).chars().collect::<Vec<_>>())
            .collect();
        match lines_to_chars(&text1, &[]) {
            Err(ConfigError::TooManyUniqueLines { limit, .. }) => assert_eq!(limit, MAX_LINE_MODE_LINES),
            other => panic!("expected TooManyUniqueLines, got {:?}", other),
        }
    }

    #[test]
    fn compute_diffs_declines_half_match_without_a_deadline() {
        // With no deadline (diff_timeout = 0), half_match must not run, so
        // this pair (which has a clean half-match split) still goes through
        // bisect and produces the same reconstructed texts.
        let a: Vec<char> = "1234567890abcdefghij1234567890".chars().collect();
        let b: Vec<char> = "abcdefghij1234567890abcdefghij".chars().collect();
        let diffs = compute_diffs(&a, &b, false, None).unwrap();
        assert_eq!(text1(&diffs), a.iter().collect::<String>());
        assert_eq!(text2(&diffs), b.iter().collect::<String>());
    }
}
