//! Tokenizer for BASIC source lines
//!
//! Splits a source line on whitespace, keeping double-quoted substrings
//! (quotes included) together as single tokens.

/// Tokenize a single source line
///
/// A token is either a run of characters that are neither whitespace nor `"`,
/// or a quoted substring running from one `"` to the next. A quote with no
/// closing partner is dropped and scanning carries on after it.
pub fn tokenize(source_line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = source_line;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
        } else if c == '"' {
            match rest[1..].find('"') {
                Some(close) => {
                    let end = close + 2;
                    tokens.push(rest[..end].to_string());
                    rest = &rest[end..];
                }
                None => rest = &rest[1..],
            }
        } else {
            let end = rest
                .find(|ch: char| ch.is_whitespace() || ch == '"')
                .unwrap_or(rest.len());
            tokens.push(rest[..end].to_string());
            rest = &rest[end..];
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_split_on_whitespace() {
        assert_eq!(
            tokenize("10 LET x = 5 + 0"),
            vec!["10", "LET", "x", "=", "5", "+", "0"]
        );
    }

    #[test]
    fn test_collapse_repeated_whitespace() {
        assert_eq!(tokenize("  20\tPRINT   x  "), vec!["20", "PRINT", "x"]);
    }

    #[test]
    fn test_quoted_string_is_one_token() {
        assert_eq!(
            tokenize("10 REM \"hello there world\""),
            vec!["10", "REM", "\"hello there world\""]
        );
    }

    #[test]
    fn test_quote_starts_new_token() {
        assert_eq!(tokenize("a\"b c\"d"), vec!["a", "\"b c\"", "d"]);
    }

    #[test]
    fn test_unterminated_quote_is_dropped() {
        assert_eq!(tokenize("10 REM \"open end"), vec!["10", "REM", "open", "end"]);
    }

    #[test]
    fn test_empty_quotes() {
        assert_eq!(tokenize("\"\""), vec!["\"\""]);
    }

    #[test]
    fn test_blank_line() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    /// Without quotes the tokenizer agrees with `split_whitespace`
    #[quickcheck]
    fn prop_unquoted_matches_split_whitespace(line: String) -> bool {
        let line = line.replace('"', "");
        let expected: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        tokenize(&line) == expected
    }

    /// Every token is non-empty
    #[quickcheck]
    fn prop_tokens_are_non_empty(line: String) -> bool {
        tokenize(&line).iter().all(|token| !token.is_empty())
    }
}
