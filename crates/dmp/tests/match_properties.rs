use dmp::error::ConfigError;
use dmp::match_::match_main;

#[test]
fn scenario_3_exact_location_and_fuzzy_location() {
    assert_eq!(
        match_main("abcdefghijk", "fgh", 5, 0.5, 100, 32).unwrap(),
        Some(5)
    );
    assert_eq!(
        match_main("abcdefghijk", "efxhi", 0, 0.5, 100, 32).unwrap(),
        Some(4)
    );
}

#[test]
fn distance_zero_requires_exact_proximity() {
    // "Returns -1 unless the proximity is zero" -- the Rust signature
    // represents "-1" (no match) as `None`.
    let exact = match_main("xxxabcxxx", "abc", 3, 0.5, 0, 32).unwrap();
    assert_eq!(exact, Some(3));
    let drifted = match_main("xxxabcxxx", "abc", 0, 0.5, 0, 32).unwrap();
    assert_eq!(drifted, None);
}

#[test]
fn empty_pattern_matches_exactly_at_loc() {
    assert_eq!(match_main("hello world", "", 6, 0.5, 1000, 32).unwrap(), Some(6));
}

#[test]
fn pattern_exceeding_max_bits_is_a_config_error() {
    let long_pattern = "x".repeat(64);
    let err = match_main("irrelevant text", &long_pattern, 0, 0.5, 1000, 32).unwrap_err();
    assert_eq!(err, ConfigError::PatternTooLong(64, 32));
}
