use dmp::DiffMatchPatch;
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    "[a-c\n]{0,24}"
}

proptest! {
    #[test]
    fn patch_text_round_trips(a in arb_text(), b in arb_text()) {
        let dmp = DiffMatchPatch::default();
        let patches = dmp.patch_make(&a, &b).unwrap();
        let serialized = dmp.patch_to_text(&patches);
        let parsed = dmp.patch_from_text(&serialized).unwrap();
        prop_assert_eq!(parsed, patches);
    }

    #[test]
    fn applying_a_patch_to_its_own_source_reproduces_the_destination(a in arb_text(), b in arb_text()) {
        let dmp = DiffMatchPatch::default();
        let patches = dmp.patch_make(&a, &b).unwrap();
        let (patched, results) = dmp.patch_apply(&patches, &a);
        prop_assert!(results.iter().all(|&r| r));
        prop_assert_eq!(patched, b);
    }
}

#[test]
fn scenario_4_patch_to_text_on_a_pure_insertion() {
    let dmp = DiffMatchPatch::default();
    let patches = dmp.patch_make("", "test").unwrap();
    assert_eq!(dmp.patch_to_text(&patches), "@@ -0,0 +1,4 @@\n+test\n");
}

// The padded form of scenario 4 ("@@ -1,8 +1,12 @@\n \x01\x02\x03\x04\n..."),
// is an internal artifact of `add_padding`'s prepend/append step, which
// `patch_apply` calls and strips back off for callers; it is covered by
// `add_padding_brackets_a_single_patch_with_distinct_low_codepoints` in
// src/patch.rs, where `add_padding` is in scope.

#[test]
fn scenario_5_apply_against_heavily_drifted_text() {
    let dmp = DiffMatchPatch::default();
    let patches = dmp.patch_make(
        "The quick brown fox jumps over the lazy dog.",
        "That quick brown fox jumped over a lazy dog.",
    )
    .unwrap();
    let (patched, results) = dmp.patch_apply(
        &patches,
        "The quick red rabbit jumps over the tired tiger.",
    );
    assert_eq!(results, vec![true, true]);
    assert_eq!(patched, "That quick red rabbit jumped over a tired tiger.");
}

#[test]
fn oversized_patch_is_split_before_application() {
    let dmp = DiffMatchPatch::default();
    // A single hunk far wider than match_max_bits (32); patch_apply must
    // split it before the bitap-backed fuzzy match can search it.
    let a = "a".repeat(80);
    let b = "b".repeat(80);
    let patches = dmp.patch_make(&a, &b).unwrap();
    assert!(patches[0].length1 > dmp.match_max_bits as usize);
    let (patched, results) = dmp.patch_apply(&patches, &a);
    assert!(results.iter().all(|&r| r));
    assert_eq!(patched, b);
}
