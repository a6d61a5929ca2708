//! Splits a script line into tokens.

use crate::error::SyntaxError;

/// Returns true for lines that carry no command.
pub fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Splits `line` on whitespace. A double-quoted run is kept as part of one
/// token with the quotes removed, so `"Main St"` yields `Main St` and `""`
/// yields an empty token.
pub fn tokenize(line: &str) -> Result<Vec<String>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(SyntaxError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
