//! Extra explanation appended to sequence and mapping mismatches.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use difference::{Changeset, Difference};

/// Combined element count above which the line diff is left out. The diff is
/// quadratic in the number of lines.
pub(crate) const DIFF_ELEMENT_LIMIT: usize = 512;

/// Explains how two sequences differ: where they first diverge, and a line
/// diff of their pretty-printed forms (`-` expected, `+` actual). Only the
/// headline is given for sequences over [`DIFF_ELEMENT_LIMIT`] elements.
pub(crate) fn sequence_detail<T: PartialEq + Debug>(actual: &[T], expected: &[T]) -> Option<String> {
    let first_difference = actual
        .iter()
        .zip(expected.iter())
        .position(|(a, e)| a != e);
    let headline = match first_difference {
        Some(index) => format!("first difference at index {}", index),
        None if actual.len() != expected.len() => format!(
            "length differs: actual {}, expected {}",
            actual.len(),
            expected.len()
        ),
        None => return None,
    };
    if actual.len() + expected.len() > DIFF_ELEMENT_LIMIT {
        return Some(headline);
    }

    let changeset = Changeset::new(
        &format!("{:#?}", expected),
        &format!("{:#?}", actual),
        "\n",
    );
    let mut lines = vec![headline];
    for diff in &changeset.diffs {
        let (marker, text) = match diff {
            Difference::Same(text) => (' ', text),
            Difference::Rem(text) => ('-', text),
            Difference::Add(text) => ('+', text),
        };
        lines.extend(text.lines().map(|line| format!("{}{}", marker, line)));
    }
    Some(lines.join("\n"))
}

/// Lists missing keys, unexpected keys and keys whose values differ. Lines
/// are sorted so the text does not depend on hash iteration order.
pub(crate) fn mapping_detail<K, V, S>(
    actual: &HashMap<K, V, S>,
    expected: &HashMap<K, V, S>,
) -> Option<String>
where
    K: Eq + Hash + Debug,
    V: PartialEq + Debug,
    S: BuildHasher,
{
    let mut lines = Vec::new();
    for (key, expected_value) in expected {
        match actual.get(key) {
            None => lines.push(format!("missing key {:?}", key)),
            Some(actual_value) if actual_value != expected_value => lines.push(format!(
                "key {:?}: {:?} != {:?}",
                key, actual_value, expected_value
            )),
            Some(_) => {}
        }
    }
    for key in actual.keys().filter(|key| !expected.contains_key(*key)) {
        lines.push(format!("unexpected key {:?}", key));
    }

    if lines.is_empty() {
        return None;
    }
    lines.sort();
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_sequences_have_no_detail() {
        assert_eq!(sequence_detail(&[1, 2], &[1, 2]), None);
    }

    #[test]
    fn reports_first_differing_index() {
        let detail = sequence_detail(&[1, 2, 3], &[1, 5, 3]).unwrap();
        assert!(detail.starts_with("first difference at index 1"));
        assert!(detail.contains("-    5,"));
        assert!(detail.contains("+    2,"));
    }

    #[test]
    fn reports_length_difference_for_prefixes() {
        let detail = sequence_detail(&[1, 2, 3], &[1, 2, 3, 4]).unwrap();
        assert!(detail.starts_with("length differs: actual 3, expected 4"));
    }

    #[test]
    fn long_sequences_get_the_headline_only() {
        let actual: Vec<u32> = (0..100_000).collect();
        let mut expected = actual.clone();
        expected[70_000] = 0;

        let detail = sequence_detail(&actual, &expected).unwrap();
        assert_eq!(detail, "first difference at index 70000");
    }

    #[test]
    fn diff_is_kept_up_to_the_limit() {
        let actual = vec![0u8; DIFF_ELEMENT_LIMIT / 2];
        let mut expected = actual.clone();
        expected[0] = 1;

        let detail = sequence_detail(&actual, &expected).unwrap();
        assert!(detail.lines().count() > 1);
    }

    #[test]
    fn mapping_detail_is_sorted() {
        let actual: HashMap<&str, i32> = [("a", 1), ("b", 2), ("z", 0)].into_iter().collect();
        let expected: HashMap<&str, i32> = [("a", 1), ("b", 3), ("c", 4)].into_iter().collect();

        let detail = mapping_detail(&actual, &expected).unwrap();
        assert_eq!(
            detail,
            "key \"b\": 2 != 3\nmissing key \"c\"\nunexpected key \"z\""
        );
    }

    #[test]
    fn equal_mappings_have_no_detail() {
        let left: HashMap<i32, i32> = [(1, 1)].into_iter().collect();
        assert_eq!(mapping_detail(&left, &left.clone()), None);
    }
}
