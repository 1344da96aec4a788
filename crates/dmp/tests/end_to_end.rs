use dmp::DiffMatchPatch;

#[test]
fn full_diff_delta_patch_pipeline_on_paragraph_text() {
    let dmp = DiffMatchPatch::default();
    let before = "Four score and seven years ago our fathers brought forth on \
                  this continent a new nation, conceived in liberty.";
    let after = "Four score and seven years ago our forebears brought forth \
                 upon this continent a new nation, conceived in freedom.";

    let diffs = dmp.diff_main_cleaned(before, after).unwrap();
    assert_eq!(dmp::diff::text1(&diffs), before);
    assert_eq!(dmp::diff::text2(&diffs), after);

    let delta = dmp.diff_to_delta(&diffs);
    let restored = dmp.diff_from_delta(before, &delta).unwrap();
    assert_eq!(dmp::diff::text2(&restored), after);

    let patches = dmp.patch_make_from_diffs(before, &diffs);
    let (patched, results) = dmp.patch_apply(&patches, before);
    assert!(results.iter().all(|&r| r));
    assert_eq!(patched, after);
}

#[test]
fn patch_still_applies_after_unrelated_edits_nearby() {
    let dmp = DiffMatchPatch::default();
    let before = "function greet(name) {\n    return \"Hello, \" + name;\n}\n";
    let after = "function greet(name) {\n    return `Hello, ${name}!`;\n}\n";
    let patches = dmp.patch_make(before, after).unwrap();

    let drifted = format!("// added a header comment\n{}\n// and a trailing one\n", before);
    let (patched, results) = dmp.patch_apply(&patches, &drifted);
    assert!(results.iter().all(|&r| r));
    assert!(patched.contains("`Hello, ${name}!`"));
    assert!(patched.starts_with("// added a header comment"));
}

#[test]
fn efficiency_cleanup_reduces_operation_count_without_changing_endpoints() {
    let mut dmp = DiffMatchPatch::default();
    dmp.diff_edit_cost = 4;
    let a = "ab cd ef gh";
    let b = "aX cY eZ gh";
    let mut diffs = dmp.diff_main(a, b, false).unwrap();
    let before_ops = diffs.len();
    dmp.diff_cleanup_efficiency(&mut diffs);
    assert!(diffs.len() <= before_ops);
    assert_eq!(dmp::diff::text1(&diffs), a);
    assert_eq!(dmp::diff::text2(&diffs), b);
}

#[test]
fn independent_dmp_instances_can_use_different_tunables_concurrently_in_sequence() {
    let strict = {
        let mut d = DiffMatchPatch::default();
        d.match_distance = 0;
        d
    };
    let lenient = DiffMatchPatch::default();

    let far = strict.match_main("xxxxxxxxxxabc", "abc", 0).unwrap();
    assert_eq!(far, None);
    let far_lenient = lenient.match_main("xxxxxxxxxxabc", "abc", 0).unwrap();
    assert_eq!(far_lenient, Some(10));
}
