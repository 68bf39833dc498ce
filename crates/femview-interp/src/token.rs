//! Command-line tokenizer and the `;` multi-command splitter.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::TokenizeError;

/// Capacity of the token buffer.
pub const MAX_TOKENS: usize = 1000;
/// Longest token accepted, in bytes.
pub const TOKEN_LENGTH: usize = 256;

const COMMENT: char = '#';
const QUOTE: char = '"';

/// Split one command into tokens.
///
/// Whitespace separates tokens outside quotes and brackets. A `#` outside
/// quotes and brackets starts a comment. Quoted text joins the current token
/// with its quotes removed, and `[...]` index expressions are copied verbatim
/// through the matching `]`.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.peek() {
            None | Some(&COMMENT) => break,
            Some(_) => {}
        }

        let (token, comment) = read_token(&mut chars);
        if token.len() > TOKEN_LENGTH {
            return Err(TokenizeError::TokenTooLong {
                limit: TOKEN_LENGTH,
                prefix: token.chars().take(16).collect(),
            });
        }
        if tokens.len() == MAX_TOKENS {
            return Err(TokenizeError::TooManyTokens { limit: MAX_TOKENS });
        }
        tokens.push(token);
        if comment {
            break;
        }
    }

    Ok(tokens)
}

/// Read one token. The flag is set when a comment ended it.
fn read_token(chars: &mut Peekable<Chars<'_>>) -> (String, bool) {
    let mut token = String::new();
    while let Some(&c) = chars.peek() {
        match c {
            COMMENT => return (token, true),
            QUOTE => {
                chars.next();
                for q in chars.by_ref() {
                    if q == QUOTE {
                        break;
                    }
                    token.push(q);
                }
                if chars.peek() != Some(&'[') {
                    return (token, false);
                }
            }
            '[' => copy_brackets(chars, &mut token),
            c if c.is_whitespace() => break,
            c => {
                token.push(c);
                chars.next();
            }
        }
    }
    (token, false)
}

fn copy_brackets(chars: &mut Peekable<Chars<'_>>, token: &mut String) {
    let mut depth = 0usize;
    for c in chars.by_ref() {
        token.push(c);
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Split a raw line into the commands it holds.
///
/// Every `;` separates commands, including one inside quotes. Leading
/// history annotations are stripped and empty pieces are dropped.
pub fn split_commands(line: &str) -> impl Iterator<Item = &str> {
    line.split(';')
        .map(strip_annotation)
        .filter(|piece| !piece.trim().is_empty())
}

/// Remove a leading `[...]` annotation, the line-number echo written in
/// front of replayed history lines.
pub fn strip_annotation(piece: &str) -> &str {
    let trimmed = piece.trim_start();
    if trimmed.starts_with('[')
        && let Some(end) = trimmed.find(']')
    {
        return &trimmed[end + 1..];
    }
    piece
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokens("  rx\t30  "), vec!["rx", "30"]);
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn comment_ends_line() {
        assert_eq!(tokens("show sx # von mises next"), vec!["show", "sx"]);
        assert_eq!(tokens("echo a#b"), vec!["echo", "a"]);
        assert!(tokens("# nothing").is_empty());
    }

    #[test]
    fn quotes_join_words() {
        assert_eq!(tokens(r#"title "Plate with hole" now"#), vec!["title", "Plate with hole", "now"]);
        assert_eq!(tokens(r#"echo "a # b""#), vec!["echo", "a # b"]);
    }

    #[test]
    fn quoted_name_keeps_index() {
        assert_eq!(tokens(r#"show "strain xx"[2] next"#), vec!["show", "strain xx[2]", "next"]);
    }

    #[test]
    fn brackets_are_verbatim() {
        assert_eq!(tokens(r#"plot sx[a "b" # c] 3"#), vec!["plot", r#"sx[a "b" # c]"#, "3"]);
        assert_eq!(tokens("plot sx[1[2]]"), vec!["plot", "sx[1[2]]"]);
        assert_eq!(tokens("plot sx[unterminated"), vec!["plot", "sx[unterminated"]);
    }

    #[test]
    fn overflow_is_an_error() {
        let long = "x".repeat(TOKEN_LENGTH + 1);
        assert!(matches!(tokenize(&long), Err(TokenizeError::TokenTooLong { .. })));
        assert_eq!(tokens(&"x".repeat(TOKEN_LENGTH)).len(), 1);

        let many = "a ".repeat(MAX_TOKENS + 1);
        assert_eq!(
            tokenize(&many),
            Err(TokenizeError::TooManyTokens { limit: MAX_TOKENS })
        );
    }

    #[test]
    fn splitter_ignores_quotes() {
        let pieces: Vec<&str> = split_commands(r#"rx 10; echo "a;b" ;; ry 5"#).collect();
        assert_eq!(pieces, vec!["rx 10", r#" echo "a"#, r#"b" "#, " ry 5"]);
    }

    #[test]
    fn annotation_is_stripped() {
        assert_eq!(strip_annotation("[12] rx 30"), " rx 30");
        assert_eq!(strip_annotation("  [3]ry 5"), "ry 5");
        assert_eq!(strip_annotation("plot sx[1]"), "plot sx[1]");
    }
}
