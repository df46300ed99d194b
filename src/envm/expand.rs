//! Single-pass reference expansion.
//!
//! Values can reference other variables with the platform's syntax:
//! `$VAR`/`${VAR}` on POSIX, `%VAR%` on Windows. Expansion is one
//! substitution pass, not a fixed-point resolver: substituted text is never
//! rescanned, a self-reference is left as the literal token (so `FOO=$FOO`
//! cannot recurse), and a reference the lookup cannot resolve stays literal.
//! A chain of indirection (A references B, B references C) is therefore only
//! partially resolved unless the lookup already has the intermediate values.

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expand `$VAR` and `${VAR}` references in `value`. `self_name` is the
/// variable the value belongs to; references to it stay literal.
pub fn expand_posix<F>(value: &str, self_name: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '$' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        // ${VAR}
        if i + 1 < chars.len() && chars[i + 1] == '{' {
            if let Some(rel) = chars[i + 2..].iter().position(|&c| c == '}') {
                let name: String = chars[i + 2..i + 2 + rel].iter().collect();
                let token_end = i + 2 + rel + 1;
                if !name.is_empty() && name != self_name {
                    if let Some(resolved) = lookup(&name) {
                        out.push_str(&resolved);
                        i = token_end;
                        continue;
                    }
                }
                // self-reference or unresolved: keep the token literal
                out.extend(&chars[i..token_end]);
                i = token_end;
                continue;
            }
            // unterminated ${, literal from here on
            out.push(chars[i]);
            i += 1;
            continue;
        }

        // $VAR
        let mut end = i + 1;
        if end < chars.len() && is_ident_start(chars[end]) {
            end += 1;
            while end < chars.len() && is_ident_char(chars[end]) {
                end += 1;
            }
        }
        if end == i + 1 {
            // lone '$'
            out.push('$');
            i += 1;
            continue;
        }
        let name: String = chars[i + 1..end].iter().collect();
        if name != self_name {
            if let Some(resolved) = lookup(&name) {
                out.push_str(&resolved);
                i = end;
                continue;
            }
        }
        out.extend(&chars[i..end]);
        i = end;
    }

    out
}

/// Expand `%VAR%` references in `value`. Name comparison against
/// `self_name` is case-insensitive, matching the platform's own lookup
/// semantics; a lone or unterminated `%` stays literal.
pub fn expand_windows<F>(value: &str, self_name: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match chars[i + 1..].iter().position(|&c| c == '%') {
            Some(rel) => {
                let name: String = chars[i + 1..i + 1 + rel].iter().collect();
                let token_end = i + 1 + rel + 1;
                if !name.is_empty() && !name.eq_ignore_ascii_case(self_name) {
                    if let Some(resolved) = lookup(&name) {
                        out.push_str(&resolved);
                        i = token_end;
                        continue;
                    }
                }
                out.extend(&chars[i..token_end]);
                i = token_end;
            }
            None => {
                out.push('%');
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_posix_bare_reference() {
        let env = table(&[("HOME", "/home/u")]);
        let got = expand_posix("$HOME/bin", "PATH", |n| env.get(n).cloned());
        assert_eq!(got, "/home/u/bin");
    }

    #[test]
    fn test_posix_braced_reference() {
        let env = table(&[("HOME", "/home/u")]);
        let got = expand_posix("${HOME}x", "PATH", |n| env.get(n).cloned());
        assert_eq!(got, "/home/ux");
    }

    #[test]
    fn test_posix_self_reference_stays_literal() {
        let env = table(&[("FOO", "loop")]);
        let got = expand_posix("$FOO:/extra", "FOO", |n| env.get(n).cloned());
        assert_eq!(got, "$FOO:/extra");
        let got = expand_posix("${FOO}", "FOO", |n| env.get(n).cloned());
        assert_eq!(got, "${FOO}");
    }

    #[test]
    fn test_posix_unresolved_stays_literal() {
        let got = expand_posix("a/$NOPE/b", "PATH", |_| None);
        assert_eq!(got, "a/$NOPE/b");
    }

    #[test]
    fn test_posix_single_pass_no_rescan() {
        // B resolves to a value containing another reference, which must not
        // be expanded again.
        let env = table(&[("B", "$C"), ("C", "deep")]);
        let got = expand_posix("$B", "A", |n| env.get(n).cloned());
        assert_eq!(got, "$C");
    }

    #[test]
    fn test_posix_lone_dollar() {
        let got = expand_posix("cost: 5$ total", "X", |_| None);
        assert_eq!(got, "cost: 5$ total");
    }

    #[test]
    fn test_posix_no_references() {
        let got = expand_posix("bar", "FOO", |_| Some("unused".into()));
        assert_eq!(got, "bar");
    }

    #[test]
    fn test_windows_reference() {
        let env = table(&[("SYSTEMROOT", r"C:\Windows")]);
        let got = expand_windows(r"%SYSTEMROOT%\system32", "PATH", |n| env.get(n).cloned());
        assert_eq!(got, r"C:\Windows\system32");
    }

    #[test]
    fn test_windows_self_reference_case_insensitive() {
        let env = table(&[("PATH", "old")]);
        let got = expand_windows(r"%Path%;C:\bin", "PATH", |n| env.get(n).cloned());
        assert_eq!(got, r"%Path%;C:\bin");
    }

    #[test]
    fn test_windows_unterminated_percent() {
        let got = expand_windows("100%", "X", |_| None);
        assert_eq!(got, "100%");
    }

    #[test]
    fn test_windows_unresolved_stays_literal() {
        let got = expand_windows("%NOPE%;rest", "X", |_| None);
        assert_eq!(got, "%NOPE%;rest");
    }
}
