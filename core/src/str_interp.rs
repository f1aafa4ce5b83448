//! `#{name}` placeholder interpolation and shell-like word splitting for command templates.

use std::{borrow::Borrow, collections::HashMap, ffi::OsStr, hash::Hash};

pub type Result = std::result::Result<String, InterpError>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InterpError {
    #[error("Undefined variable '{0}' at {}", .1+1)]
    UndefinedVar(String, usize),

    #[error("Unclosed brace (found open brace at {})", .0+1)]
    UnclosedBrace(usize),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("Unclosed quote {0} (opened at {})", .1+1)]
    UnclosedQuote(char, usize),

    #[error("Trailing backslash")]
    TrailingBackslash,
}

/// Replaces every `#{name}` in `fmt` with `variables[name]`. `##` yields a literal `#`.
pub fn interp<K, V>(fmt: &str, variables: &HashMap<K, V>) -> Result
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<OsStr>,
{
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum State {
        Normal,
        HashMark,
        InsideBrace,
    }
    use State::*;

    let mut state = Normal;
    let mut pos_open_brace = 0;
    let mut res = String::with_capacity(fmt.len() * 3);
    let mut var_name = String::with_capacity(32);

    for (i, c) in fmt.chars().enumerate() {
        match (c, state) {
            ('#', Normal) => {
                state = HashMark;
                res.push(c);
            }
            ('#', HashMark) => {
                state = Normal;
            }
            ('{', HashMark) => {
                state = InsideBrace;
                pos_open_brace = i;
                var_name.clear();
                res.pop(); // remove '#'
            }
            ('}', InsideBrace) => {
                state = Normal;
                let Some(value) = variables.get(var_name.as_str()) else {
                    return Err(InterpError::UndefinedVar(var_name, pos_open_brace));
                };
                res += value.as_ref().to_string_lossy().as_ref();
            }
            (_, InsideBrace) => {
                var_name.push(c);
            }
            _ => {
                state = Normal;
                res.push(c);
            }
        }
    }

    if state == InsideBrace {
        Err(InterpError::UnclosedBrace(pos_open_brace))
    } else {
        res.shrink_to_fit();
        Ok(res)
    }
}

/// Splits a command line into words the way a POSIX shell would for plain words:
/// whitespace separates, `'...'` is literal, `"..."` allows `\"` and `\\`, and a bare
/// backslash escapes the next char. No expansion of any kind happens.
pub fn split_words(s: &str) -> std::result::Result<Vec<String>, SplitError> {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum State {
        Blank,
        Word,
        Single(usize),
        Double(usize),
    }
    use State::*;

    let mut words = Vec::new();
    let mut word = String::new();
    let mut state = Blank;
    let mut chars = s.chars().enumerate();

    while let Some((i, c)) = chars.next() {
        match (c, state) {
            (c, Blank | Word) if c.is_whitespace() => {
                if state == Word {
                    words.push(std::mem::take(&mut word));
                }
                state = Blank;
            }
            ('\'', Blank | Word) => state = Single(i),
            ('"', Blank | Word) => state = Double(i),
            ('\\', Blank | Word) => {
                let Some((_, next)) = chars.next() else {
                    return Err(SplitError::TrailingBackslash);
                };
                word.push(next);
                state = Word;
            }
            (_, Blank | Word) => {
                word.push(c);
                state = Word;
            }
            ('\'', Single(_)) => state = Word,
            (_, Single(_)) => word.push(c),
            ('"', Double(_)) => state = Word,
            ('\\', Double(_)) => match chars.next() {
                Some((_, next @ ('"' | '\\'))) => word.push(next),
                Some((_, next)) => {
                    word.push('\\');
                    word.push(next);
                }
                None => return Err(SplitError::TrailingBackslash),
            },
            (_, Double(_)) => word.push(c),
        }
    }

    match state {
        Single(pos) => Err(SplitError::UnclosedQuote('\'', pos)),
        Double(pos) => Err(SplitError::UnclosedQuote('"', pos)),
        Word => {
            words.push(word);
            Ok(words)
        }
        Blank => Ok(words),
    }
}
