//! Ordered-segment utilities for PATH-like list values.
//!
//! Pure helpers, parameterized by the platform delimiter (`:` on POSIX,
//! `;` on Windows) so callers never branch on the host themselves.

/// Split a PATH-like value into trimmed, non-empty segments.
pub fn split(value: &str, delimiter: char) -> Vec<String> {
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join segments back into a single value, omitting empty segments.
pub fn join<S: AsRef<str>>(segments: &[S], delimiter: char) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .collect();
    parts.join(&delimiter.to_string())
}

/// Remove duplicate segments, first occurrence wins.
pub fn unique<S: AsRef<str>>(segments: &[S], case_insensitive: bool) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for seg in segments {
        let seg = seg.as_ref();
        let key = if case_insensitive {
            seg.to_lowercase()
        } else {
            seg.to_string()
        };
        if !seen.contains(&key) {
            seen.push(key);
            out.push(seg.to_string());
        }
    }
    out
}

/// False if any segment is empty, contains a NUL byte, or contains a quote
/// character, none of which survive the media encodings.
pub fn validate<S: AsRef<str>>(segments: &[S]) -> bool {
    segments.iter().all(|seg| {
        let seg = seg.as_ref();
        !seg.is_empty() && !seg.contains('\0') && !seg.contains('\'') && !seg.contains('"')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_and_drops_empty() {
        assert_eq!(
            split(" /usr/bin : :/usr/local/bin", ':'),
            vec!["/usr/bin", "/usr/local/bin"]
        );
        assert_eq!(split("", ':'), Vec::<String>::new());
    }

    #[test]
    fn test_join_omits_empty() {
        assert_eq!(join(&["a", "", "b"], ';'), "a;b");
        assert_eq!(join(&[] as &[&str], ':'), "");
    }

    #[test]
    fn test_split_join_round_trip() {
        let segments = vec!["/usr/bin", "/opt/tool/bin", "/home/u/.cargo/bin"];
        let joined = join(&segments, ':');
        assert_eq!(split(&joined, ':'), segments);
    }

    #[test]
    fn test_unique_first_occurrence_wins() {
        let got = unique(&["a", "b", "a", "c", "b"], false);
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unique_case_insensitive() {
        let got = unique(&[r"C:\Bin", r"c:\bin", r"C:\Tools"], true);
        assert_eq!(got, vec![r"C:\Bin", r"C:\Tools"]);
    }

    #[test]
    fn test_unique_is_idempotent() {
        let input = vec!["x", "y", "x", "z"];
        let once = unique(&input, false);
        let twice = unique(&once, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_validate() {
        assert!(validate(&["/usr/bin", "/opt"]));
        assert!(!validate(&["/usr/bin", ""]));
        assert!(!validate(&["/usr\0/bin"]));
        assert!(!validate(&["it's"]));
        assert!(!validate(&[r#"say "hi""#]));
    }
}
