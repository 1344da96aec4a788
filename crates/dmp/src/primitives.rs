//! Leaf-level char-slice helpers shared by the diff, match, and patch
//! engines. Everything here operates on `&[char]` rather than `&str` so the
//! engines above never have to re-derive code-point boundaries; a Rust
//! `char` is always exactly one Unicode scalar value, so slicing here is
//! always safe and sidesteps the surrogate-pair concerns of this
//! algorithm's UTF-16-based lineage.

/// Length of the longest common prefix of `a` and `b`, in `char`s.
pub fn common_prefix(a: &[char], b: &[char]) -> usize {
    let n = a.len().min(b.len());
    (0..n).take_while(|&i| a[i] == b[i]).count()
}

/// Length of the longest common suffix of `a` and `b`, in `char`s.
pub fn common_suffix(a: &[char], b: &[char]) -> usize {
    let n = a.len().min(b.len());
    (0..n).take_while(|&i| a[a.len() - 1 - i] == b[b.len() - 1 - i]).count()
}

/// Length of the longest suffix of `a` that is also a prefix of `b`.
///
/// `common_overlap(['f','i'], ['\u{fb01}','i'])` is `0`: the ligature is one
/// `char`, distinct from `'f'` and `'i'`, so no overlap is possible — this
/// only falls out correctly because we compare `char`s, not UTF-8 bytes.
pub fn common_overlap(a: &[char], b: &[char]) -> usize {
    let (a_len, b_len) = (a.len(), b.len());
    if a_len == 0 || b_len == 0 {
        return 0;
    }
    let (a, b) = if a_len > b_len { (&a[a_len - b_len..], b) } else { (a, &b[..a_len]) };
    let text_len = a.len();
    if a == b {
        return text_len;
    }

    let mut best = 0usize;
    let mut length = 1usize;
    loop {
        let pattern = &a[a.len() - length..];
        match find_subslice(b, pattern) {
            None => return best,
            Some(found) => {
                length += found;
                if found == 0 || a[a.len() - length..] == b[..length] {
                    best = length;
                    length += 1;
                } else if length > a.len() {
                    return best;
                }
            }
        }
    }
}

/// First occurrence of `needle` in `hay`, like `str::find`.
pub fn find_subslice(hay: &[char], needle: &[char]) -> Option<usize> {
    find_subslice_from(hay, needle, 0)
}

/// First occurrence of `needle` in `hay` at or after `from`.
pub fn find_subslice_from(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(hay.len()));
    }
    if from >= hay.len() || needle.len() > hay.len() - from {
        return None;
    }
    let end = hay.len() - needle.len();
    (from..=end).find(|&i| &hay[i..i + needle.len()] == needle)
}

/// Last occurrence of `needle` in `hay`, like `str::rfind`.
pub fn rfind_subslice(hay: &[char], needle: &[char]) -> Option<usize> {
    rfind_subslice_upto(hay, needle, hay.len())
}

/// Last occurrence of `needle` in `hay` that starts at or before `limit`
/// characters into `hay` (mirrors Java's `String.lastIndexOf(pattern, limit)`:
/// the search window is `hay[..min(limit + needle.len(), hay.len())]`).
pub fn rfind_subslice_upto(hay: &[char], needle: &[char], limit: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(limit.min(hay.len()));
    }
    let window_end = (limit.saturating_add(needle.len())).min(hay.len());
    if needle.len() > window_end {
        return None;
    }
    let end = window_end - needle.len();
    (0..=end).rev().find(|&i| &hay[i..i + needle.len()] == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn prefix_and_suffix_basic() {
        assert_eq!(common_prefix(&chars("1234abcdef"), &chars("1234xyz")), 4);
        assert_eq!(common_suffix(&chars("abcdef1234"), &chars("xyz1234")), 4);
        assert_eq!(common_prefix(&chars(""), &chars("abc")), 0);
    }

    #[test]
    fn overlap_ligature_is_not_two_chars() {
        assert_eq!(common_overlap(&chars("fi"), &chars("\u{fb01}i")), 0);
    }

    #[test]
    fn overlap_basic() {
        assert_eq!(common_overlap(&chars("123456"), &chars("456789")), 3);
        assert_eq!(common_overlap(&chars("abcd"), &chars("xyz")), 0);
    }

    #[test]
    fn find_subslice_from_respects_offset() {
        let hay = chars("abcabcabc");
        assert_eq!(find_subslice_from(&hay, &chars("abc"), 0), Some(0));
        assert_eq!(find_subslice_from(&hay, &chars("abc"), 1), Some(3));
        assert_eq!(rfind_subslice(&hay, &chars("abc")), Some(6));
    }
}
