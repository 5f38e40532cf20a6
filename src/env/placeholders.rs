use anyhow::{bail, Result};

use crate::env::EnvMap;

/// Replaces `{NAME}` with values from `env`, falling back to the process
/// environment. `\{` and `\}` produce literal braces. A `{` not followed by a
/// valid key start is kept as-is, so JSON-looking text passes through.
pub fn expand_placeholders(input: &str, env: &EnvMap) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if matches!(chars.peek(), Some('{' | '}')) => {
                output.extend(chars.next());
            }
            '{' if chars.peek().copied().is_some_and(is_start_char) => {
                let mut key = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    key.push(next);
                }
                if !closed {
                    bail!("Unterminated placeholder: {{{key}");
                }
                if !is_valid_key(&key) {
                    bail!("Invalid placeholder name: {key}");
                }
                output.push_str(&lookup(&key, env)?);
            }
            _ => output.push(ch),
        }
    }

    Ok(output)
}

fn lookup(key: &str, env: &EnvMap) -> Result<String> {
    if let Some(value) = env.get(key) {
        return Ok(value.clone());
    }
    match std::env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => bail!("Missing value for placeholder: {key}"),
    }
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(is_start_char)
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'))
}

fn is_start_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}
