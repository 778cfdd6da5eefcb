//! Splitting of a raw input line into whitespace-delimited words.
//!
//! There is no quoting, escaping or expansion: a token is any maximal run of
//! non-whitespace characters. The only word with meaning to the shell is a
//! trailing standalone `&`, which is recognised after the whole line has been
//! split (see [`split_background_marker`]).

use crate::error::ParseError;

/// The word that, as the last token of a line, sends the command to the background.
pub const BACKGROUND_MARKER: &str = "&";

/// Splits `line` into its non-empty whitespace-delimited words.
///
/// Runs of whitespace collapse, and leading or trailing whitespace never yields an
/// empty token. Fails with [`ParseError::Allocation`] if the token buffer cannot grow.
pub fn split_into_tokens(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    for word in line.split_whitespace() {
        tokens.try_reserve(1)?;
        tokens.push(word.to_owned());
    }
    Ok(tokens)
}

/// Removes a trailing [`BACKGROUND_MARKER`] from `tokens`.
///
/// Returns `true` if the marker was present. An `&` anywhere else, or glued to
/// another word, is left alone.
pub fn split_background_marker(tokens: &mut Vec<String>) -> bool {
    if tokens.last().is_some_and(|t| t == BACKGROUND_MARKER) {
        tokens.pop();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_single_spaces() {
        let tokens = split_into_tokens("ls -la").unwrap();
        assert_eq!(tokens, vec!["ls", "-la"]);
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(split_into_tokens("a   b").unwrap(), vec!["a", "b"]);
        assert_eq!(split_into_tokens("  a \t b\t").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn blank_line_has_no_tokens() {
        assert!(split_into_tokens("   ").unwrap().is_empty());
    }

    #[test]
    fn trailing_marker_is_removed() {
        let mut tokens = split_into_tokens("test arg1 arg2 &").unwrap();
        assert!(split_background_marker(&mut tokens));
        assert_eq!(tokens, vec!["test", "arg1", "arg2"]);
    }

    #[test]
    fn embedded_marker_is_an_ordinary_word() {
        let mut tokens = split_into_tokens("sleep 1& echo").unwrap();
        assert!(!split_background_marker(&mut tokens));
        assert_eq!(tokens, vec!["sleep", "1&", "echo"]);

        let mut tokens = split_into_tokens("a & b").unwrap();
        assert!(!split_background_marker(&mut tokens));
        assert_eq!(tokens, vec!["a", "&", "b"]);
    }

    #[test]
    fn only_one_marker_is_stripped() {
        let mut tokens = split_into_tokens("run & &").unwrap();
        assert!(split_background_marker(&mut tokens));
        assert_eq!(tokens, vec!["run", "&"]);
    }
}
