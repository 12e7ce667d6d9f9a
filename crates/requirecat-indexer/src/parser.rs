//! `require ‘path’` statement parsing

use thiserror::Error;

/// Literal prefix marking a dependency declaration.
pub const REQUIRE_PREFIX: &str = "require ";
/// Opening delimiter around the dependency path (U+2018).
pub const OPEN_QUOTE: char = '‘';
/// Closing delimiter around the dependency path (U+2019).
pub const CLOSE_QUOTE: char = '’';

/// Why a `require` line could not be parsed. These are reported and the line
/// is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty statement")]
    EmptyStatement,

    #[error("statement must start with '‘', but starts with '{found}'")]
    MissingOpenQuote { found: char },

    #[error("statement must end with '’', but ends with '{found}'")]
    MissingCloseQuote { found: char },

    #[error("empty dependency filepath")]
    EmptyPath,
}

/// Whether `line` is a dependency declaration at all.
pub fn is_require_statement(line: &str) -> bool {
    line.starts_with(REQUIRE_PREFIX)
}

/// Extract the dependency path from a `require` line.
///
/// The path is returned verbatim; whether it names an existing file is the
/// caller's concern.
///
/// # Panics
///
/// If `line` does not start with [`REQUIRE_PREFIX`]. Check with
/// [`is_require_statement`] first.
pub fn parse_require_statement(line: &str) -> Result<&str, ParseError> {
    assert!(
        is_require_statement(line),
        "statement does not start with {REQUIRE_PREFIX:?}"
    );

    let argument = &line[REQUIRE_PREFIX.len()..];
    let Some(first) = argument.chars().next() else {
        return Err(ParseError::EmptyStatement);
    };

    let Some(after_open) = argument.strip_prefix(OPEN_QUOTE) else {
        return Err(ParseError::MissingOpenQuote { found: first });
    };

    // A lone opening quote has nothing left to close it.
    let Some(path) = after_open.strip_suffix(CLOSE_QUOTE) else {
        let last = argument.chars().next_back().unwrap_or(first);
        return Err(ParseError::MissingCloseQuote { found: last });
    };

    if path.is_empty() {
        return Err(ParseError::EmptyPath);
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nested_path() {
        assert_eq!(
            parse_require_statement("require ‘sub/dep.txt’"),
            Ok("sub/dep.txt")
        );
    }

    #[test]
    fn test_keeps_inner_whitespace_and_quotes() {
        assert_eq!(
            parse_require_statement("require ‘my file ‘x’.txt’"),
            Ok("my file ‘x’.txt")
        );
    }

    #[test]
    fn test_empty_statement() {
        let err = parse_require_statement("require ").unwrap_err();
        assert_eq!(err, ParseError::EmptyStatement);
        insta::assert_snapshot!(err.to_string(), @"empty statement");
    }

    #[test]
    fn test_missing_open_quote_names_leading_char() {
        let err = parse_require_statement("require dep.txt").unwrap_err();
        assert_eq!(err, ParseError::MissingOpenQuote { found: 'd' });
        insta::assert_snapshot!(
            err.to_string(),
            @"statement must start with '‘', but starts with 'd'"
        );
    }

    #[test]
    fn test_ascii_apostrophes_are_rejected() {
        let err = parse_require_statement("require 'dep.txt'").unwrap_err();
        assert_eq!(err, ParseError::MissingOpenQuote { found: '\'' });
    }

    #[test]
    fn test_missing_close_quote_names_trailing_char() {
        let err = parse_require_statement("require ‘dep.txt").unwrap_err();
        assert_eq!(err, ParseError::MissingCloseQuote { found: 't' });
        insta::assert_snapshot!(
            err.to_string(),
            @"statement must end with '’', but ends with 't'"
        );
    }

    #[test]
    fn test_lone_open_quote() {
        let err = parse_require_statement("require ‘").unwrap_err();
        assert_eq!(err, ParseError::MissingCloseQuote { found: '‘' });
    }

    #[test]
    fn test_empty_quotes() {
        let err = parse_require_statement("require ‘’").unwrap_err();
        assert_eq!(err, ParseError::EmptyPath);
        insta::assert_snapshot!(err.to_string(), @"empty dependency filepath");
    }

    #[test]
    fn test_prefix_detection_is_exact() {
        assert!(is_require_statement("require ‘a’"));
        assert!(!is_require_statement(" require ‘a’"));
        assert!(!is_require_statement("requires ‘a’"));
        assert!(!is_require_statement("Require ‘a’"));
        assert!(!is_require_statement("require"));
    }

    #[test]
    #[should_panic(expected = "does not start with")]
    fn test_non_require_line_is_a_caller_bug() {
        let _ = parse_require_statement("include ‘a.txt’");
    }
}
