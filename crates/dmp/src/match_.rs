//! The Bitap fuzzy match engine: locating an approximate occurrence of a
//! short pattern within a larger text, tolerating both character
//! substitutions and drift away from an expected location.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::primitives::find_subslice_from;

/// Finds the best fuzzy match for `pattern` in `text` near `loc`, honoring
/// `threshold` (0.0 = exact match required, 1.0 = match almost anything) and
/// `distance` (how much a match's offset from `loc` costs against its
/// score; `0` makes location an exact requirement). Returns `None` rather
/// than an error when nothing scores under threshold — a "no match" is an
/// ordinary outcome, not a failure.
pub fn match_main(
    text: &str,
    pattern: &str,
    loc: usize,
    threshold: f64,
    distance: u32,
    max_bits: u32,
) -> Result<Option<usize>, ConfigError> {
    let text_chars: Vec<char> = text.chars().collect();
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let loc = loc.min(text_chars.len());

    if text_chars == pattern_chars {
        return Ok(Some(0));
    }
    if pattern_chars.is_empty() {
        return Ok(Some(loc));
    }

    if text_chars[loc..].starts_with(&pattern_chars) {
        return Ok(Some(loc));
    }
    // No exact match starting exactly at loc; an exact match elsewhere in
    // text is still a candidate and is scored alongside the fuzzy search
    // below by bitap itself, which always considers the whole text.

    if pattern_chars.len() as u32 > max_bits {
        return Err(ConfigError::PatternTooLong(pattern_chars.len(), max_bits));
    }

    Ok(bitap(&text_chars, &pattern_chars, loc, threshold, distance))
}

/// Bit-parallel approximate search. Follows the reference algorithm's
/// 1-indexed `rd` array convention exactly (`rd[j]` tracks text position
/// `j - 1`) to keep the index arithmetic recognizable against the
/// well-known formulation; `best_loc` is converted back to a 0-indexed text
/// offset only at the point it is recorded.
fn bitap(text: &[char], pattern: &[char], loc: usize, threshold: f64, distance: u32) -> Option<usize> {
    let alphabet = init_alphabet(pattern);
    let mut score_threshold = threshold;

    if let Some(loc0) = find_subslice_from(text, pattern, loc) {
        score_threshold = score_threshold.min(bitap_score(0, loc0, loc, pattern.len(), distance));
        if let Some(loc1) = crate::primitives::rfind_subslice_upto(text, pattern, loc + pattern.len()) {
            score_threshold = score_threshold.min(bitap_score(0, loc1, loc, pattern.len(), distance));
        }
    }

    let match_mask = 1u64 << (pattern.len() - 1);
    let mut best_loc: Option<usize> = None;
    let mut bin_max = pattern.len() + text.len();
    let mut last_rd: Vec<u64> = Vec::new();

    'outer: for d in 0..pattern.len() {
        let mut bin_min = 0i64;
        let mut bin_mid = bin_max as i64;
        while bin_min < bin_mid {
            if bitap_score(d, (loc as i64 + bin_mid) as usize, loc, pattern.len(), distance) <= score_threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid as usize;
            }
            bin_mid = (bin_max as i64 - bin_min) / 2 + bin_min;
        }
        bin_max = bin_mid as usize;
        let mut start = (loc as i64 - bin_mid + 1).max(1) as usize;
        let finish = ((loc + bin_mid as usize).min(text.len())) + pattern.len();

        let mut rd = vec![0u64; finish + 2];
        rd[finish + 1] = (1u64 << d) - 1;

        let mut j = finish;
        while j >= start {
            let char_match = if j >= 1 && j - 1 < text.len() {
                *alphabet.get(&text[j - 1]).unwrap_or(&0)
            } else {
                0
            };
            rd[j] = if d == 0 {
                ((rd[j + 1] << 1) | 1) & char_match
            } else {
                (((rd[j + 1] << 1) | 1) & char_match)
                    | (((last_rd[j + 1] | last_rd[j]) << 1) | 1)
                    | last_rd[j + 1]
            };

            if rd[j] & match_mask != 0 {
                let loc0 = j - 1;
                let score = bitap_score(d, loc0, loc, pattern.len(), distance);
                if score <= score_threshold {
                    score_threshold = score;
                    best_loc = Some(loc0);
                    if loc0 > loc {
                        start = 1.max(2 * loc as i64 - loc0 as i64) as usize;
                    } else {
                        break;
                    }
                }
            }
            if j == 0 {
                break;
            }
            j -= 1;
        }

        if bitap_score(d + 1, loc, loc, pattern.len(), distance) > score_threshold {
            break 'outer;
        }
        last_rd = rd;
    }

    best_loc
}

fn bitap_score(e: usize, x: usize, loc: usize, pattern_len: usize, distance: u32) -> f64 {
    let accuracy = e as f64 / pattern_len as f64;
    let proximity = (loc as i64 - x as i64).unsigned_abs() as f64;
    if distance == 0 {
        return if proximity == 0.0 { accuracy } else { 1.0 };
    }
    accuracy + proximity / distance as f64
}

fn init_alphabet(pattern: &[char]) -> HashMap<char, u64> {
    let mut map = HashMap::new();
    for (i, &c) in pattern.iter().enumerate() {
        let entry = map.entry(c).or_insert(0u64);
        *entry |= 1u64 << (pattern.len() - i - 1);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_at_location() {
        assert_eq!(match_main("abcdef", "bc", 0, 0.5, 1000, 32).unwrap(), Some(1));
    }

    #[test]
    fn fuzzy_match_within_threshold() {
        assert_eq!(match_main("fast fox", "fost", 0, 0.5, 1000, 32).unwrap(), Some(0));
    }

    #[test]
    fn strict_distance_zero_requires_exact_location() {
        // With distance == 0, only an exact-location match scores under threshold.
        let result = match_main("abcdefghij", "abc", 0, 0.5, 0, 32).unwrap();
        assert_eq!(result, Some(0));
        let far = match_main("xxxxxxxxxxabc", "abc", 0, 0.5, 0, 32).unwrap();
        assert_eq!(far, None);
    }

    #[test]
    fn pattern_longer_than_max_bits_errors() {
        let pattern = "a".repeat(40);
        let err = match_main("irrelevant", &pattern, 0, 0.5, 1000, 32).unwrap_err();
        assert_eq!(err, ConfigError::PatternTooLong(40, 32));
    }

    #[test]
    fn empty_pattern_matches_at_loc() {
        assert_eq!(match_main("abcdef", "", 3, 0.5, 1000, 32).unwrap(), Some(3));
    }
}
