//! Numeric-aware version ordering
//!
//! Versions are split on `.` and compared segment by segment. Numeric
//! segments compare as integers, so `1.10` sorts above `1.9`. Segments
//! such as `4-v10` are compared run by run: digit runs as integers, other
//! runs as plain strings, so `4-v10` sorts above `4-v9`.

use std::cmp::Ordering;

/// Compare two version strings.
///
/// # Example
/// ```
/// use std::cmp::Ordering;
/// use soundpack::version::compare_versions;
///
/// assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
/// assert_eq!(compare_versions("1.19", "1.19.3"), Ordering::Less);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => match compare_segment(l, r) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// Return a new list of versions, newest first when `descending`.
///
/// The sort is stable: versions that compare equal keep their input order.
pub fn sort_versions<S: AsRef<str>>(versions: &[S], descending: bool) -> Vec<String> {
    let mut sorted: Vec<String> = versions.iter().map(|v| v.as_ref().to_string()).collect();
    sorted.sort_by(|a, b| {
        let ord = compare_versions(a, b);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    sorted
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = if is_digits(l) && is_digits(r) {
                    compare_numeric(l, r)
                } else {
                    l.cmp(r)
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Split a segment into alternating runs of digits and non-digits
fn chunks(segment: &str) -> impl Iterator<Item = &str> {
    let mut rest = segment;
    std::iter::from_fn(move || {
        let digit = rest.chars().next()?.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digit)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

fn is_digits(chunk: &str) -> bool {
    chunk.bytes().all(|b| b.is_ascii_digit())
}

/// Compare two digit strings of any length without parsing them.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1.10", "1.9", Ordering::Greater ; "numeric not lexical")]
    #[test_case("1.9", "1.9", Ordering::Equal ; "equal")]
    #[test_case("1.19", "1.19.3", Ordering::Less ; "prefix is older")]
    #[test_case("1.20", "1.019", Ordering::Greater ; "leading zeros")]
    #[test_case("1.20-pre1", "1.19", Ordering::Greater ; "tagged segment numeric prefix")]
    #[test_case("1.20-pre1", "1.20-rc1", Ordering::Less ; "tag suffix lexical")]
    #[test_case("1.19.4-v10", "1.19.4-v9", Ordering::Greater ; "numeric suffix runs")]
    #[test_case("mc1.19.4-v2", "mc1.19.4-v10", Ordering::Less ; "prefixed tag suffix runs")]
    #[test_case("dev", "1.20", Ordering::Greater ; "non numeric falls back to lexical")]
    #[test_case("99999999999999999999999.1", "99999999999999999999998.9", Ordering::Greater ; "huge segments")]
    fn test_compare(a: &str, b: &str, expected: Ordering) {
        assert_eq!(compare_versions(a, b), expected);
    }

    #[test]
    fn test_sort_descending() {
        assert_eq!(
            sort_versions(&["1.9", "1.10", "1.2"], true),
            vec!["1.10", "1.9", "1.2"]
        );
    }

    #[test]
    fn test_sort_ascending() {
        assert_eq!(
            sort_versions(&["1.19.4", "1.8", "1.19"], false),
            vec!["1.8", "1.19", "1.19.4"]
        );
    }

    #[test]
    fn test_sort_is_stable() {
        // "1.09" and "1.9" compare equal
        assert_eq!(
            sort_versions(&["1.09", "1.10", "1.9"], true),
            vec!["1.10", "1.09", "1.9"]
        );
    }
}
