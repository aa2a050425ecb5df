/// Asserts that `needle` occurs exactly `expected` times in `html`.
pub fn assert_occurs(html: &str, needle: &str, expected: usize) {
    let found = html.matches(needle).count();
    assert_eq!(
        found, expected,
        "expected {expected} occurrence(s) of {needle:?}, found {found} in:\n{html}"
    );
}

/// Asserts that every needle occurs, in the given order.
pub fn assert_in_order(html: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match html[from..].find(needle) {
            Some(at) => from += at + needle.len(),
            None => panic!("{needle:?} missing or out of order in:\n{html}"),
        }
    }
}

/// Byte offset of the first occurrence of `needle`, panicking if absent.
pub fn position_of(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in:\n{html}"))
}
