use serde::Deserialize;

/// How program output is matched against the expected output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Comparison {
    /// Surrounding whitespace is trimmed, then the texts must be identical.
    #[default]
    Exact,

    /// Whitespace-separated tokens must pair up: integers exactly, reals within
    /// [`Comparison::ABS_TOLERANCE`] (or [`Comparison::REL_TOLERANCE`]), anything else exactly.
    Tolerant,
}

impl Comparison {
    pub const ABS_TOLERANCE: f64 = 1e-6;
    pub const REL_TOLERANCE: f64 = 1e-9;

    pub fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            Comparison::Exact => actual.trim() == expected.trim(),
            Comparison::Tolerant => {
                let mut actual = actual.split_whitespace();
                let mut expected = expected.split_whitespace();
                loop {
                    match (actual.next(), expected.next()) {
                        (None, None) => return true,
                        (Some(a), Some(e)) if tokens_match(a, e) => continue,
                        _ => return false,
                    }
                }
            }
        }
    }
}

fn tokens_match(actual: &str, expected: &str) -> bool {
    if let (Ok(a), Ok(e)) = (actual.parse::<i128>(), expected.parse::<i128>()) {
        return a == e;
    }
    if let (Ok(a), Ok(e)) = (actual.parse::<f64>(), expected.parse::<f64>()) {
        return is_close(a, e);
    }
    actual == expected
}

fn is_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    let tol = (Comparison::REL_TOLERANCE * a.abs().max(b.abs())).max(Comparison::ABS_TOLERANCE);
    diff <= tol
}
