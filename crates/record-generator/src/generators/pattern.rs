//! String generator driven by a `pattern` regular expression.
//!
//! Only a practical subset of regex syntax is supported:
//!
//! - literals and escaped metacharacters (`\.`, `\-`, `\+`, ...)
//! - `\d`, `\w`, `\s` and `.`
//! - character classes such as `[A-Z]`, `[a-z0-9_]`, `[\d-]`
//! - quantifiers `{n}`, `{n,}`, `{n,m}`, `?`, `*` and `+`
//! - a leading `^` and trailing `$`
//!
//! Groups, alternation, negated classes and backreferences are rejected with
//! [`ProviderError::UnsupportedPattern`] rather than guessed at.

use crate::error::ProviderError;
use rand::Rng;

/// Extra repetitions allowed for open-ended quantifiers (`*`, `+`, `{n,}`).
const OPEN_REPEAT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
enum Atom {
    Literal(char),
    /// Inclusive character ranges.
    Class(Vec<(char, char)>),
}

#[derive(Debug, Clone, PartialEq)]
struct Piece {
    atom: Atom,
    min: usize,
    max: usize,
}

fn digit_class() -> Vec<(char, char)> {
    vec![('0', '9')]
}

fn word_class() -> Vec<(char, char)> {
    vec![('a', 'z'), ('A', 'Z'), ('0', '9'), ('_', '_')]
}

fn unsupported(pattern: &str, reason: impl Into<String>) -> ProviderError {
    ProviderError::UnsupportedPattern {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

/// Generate a string matching `pattern`.
pub fn generate_from_pattern<R: Rng>(pattern: &str, rng: &mut R) -> Result<String, ProviderError> {
    let pieces = parse(pattern)?;
    let mut result = String::new();

    for piece in &pieces {
        let count = rng.random_range(piece.min..=piece.max);
        for _ in 0..count {
            result.push(pick(&piece.atom, rng));
        }
    }

    Ok(result)
}

fn pick<R: Rng>(atom: &Atom, rng: &mut R) -> char {
    match atom {
        Atom::Literal(c) => *c,
        Atom::Class(ranges) => {
            let total: u32 = ranges.iter().map(|(lo, hi)| *hi as u32 - *lo as u32 + 1).sum();
            let mut offset = rng.random_range(0..total);
            for (lo, hi) in ranges {
                let size = *hi as u32 - *lo as u32 + 1;
                if offset < size {
                    return char::from_u32(*lo as u32 + offset).unwrap_or(*lo);
                }
                offset -= size;
            }
            ranges[0].0
        }
    }
}

fn parse(pattern: &str) -> Result<Vec<Piece>, ProviderError> {
    let mut body = pattern.strip_prefix('^').unwrap_or(pattern);
    if body.ends_with('$') && !body.ends_with("\\$") {
        body = &body[..body.len() - 1];
    }

    let mut chars = body.chars().peekable();
    let mut pieces = Vec::new();

    while let Some(c) = chars.next() {
        let atom = match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| unsupported(pattern, "trailing backslash"))?;
                escape_atom(pattern, escaped)?
            }
            '[' => Atom::Class(parse_class(pattern, &mut chars)?),
            '.' => Atom::Class(word_class()),
            '(' | ')' | '|' => {
                return Err(unsupported(pattern, "groups and alternation are not supported"))
            }
            '^' | '$' => return Err(unsupported(pattern, "anchors are only supported at the ends")),
            '*' | '+' | '?' | '{' => {
                return Err(unsupported(pattern, format!("quantifier '{c}' has nothing to repeat")))
            }
            other => Atom::Literal(other),
        };

        let (min, max) = parse_quantifier(pattern, &mut chars)?;
        pieces.push(Piece { atom, min, max });
    }

    Ok(pieces)
}

fn escape_atom(pattern: &str, escaped: char) -> Result<Atom, ProviderError> {
    match escaped {
        'd' => Ok(Atom::Class(digit_class())),
        'w' => Ok(Atom::Class(word_class())),
        's' => Ok(Atom::Literal(' ')),
        'D' | 'W' | 'S' | 'b' | 'B' => Err(unsupported(
            pattern,
            format!("escape '\\{escaped}' is not supported"),
        )),
        c if c.is_ascii_alphanumeric() => Err(unsupported(
            pattern,
            format!("escape '\\{c}' is not supported"),
        )),
        c => Ok(Atom::Literal(c)),
    }
}

fn parse_class<I>(pattern: &str, chars: &mut std::iter::Peekable<I>) -> Result<Vec<(char, char)>, ProviderError>
where
    I: Iterator<Item = char>,
{
    if chars.peek() == Some(&'^') {
        return Err(unsupported(pattern, "negated character classes are not supported"));
    }

    let mut ranges = Vec::new();
    let mut closed = false;

    while let Some(c) = chars.next() {
        let start = match c {
            ']' => {
                closed = true;
                break;
            }
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| unsupported(pattern, "trailing backslash"))?;
                match escape_atom(pattern, escaped)? {
                    Atom::Class(class) => {
                        ranges.extend(class);
                        continue;
                    }
                    Atom::Literal(literal) => literal,
                }
            }
            other => other,
        };

        // `a-z` range, unless the dash is the last character of the class
        if chars.peek() == Some(&'-') {
            chars.next();
            match chars.peek().copied() {
                Some(']') | None => {
                    ranges.push((start, start));
                    ranges.push(('-', '-'));
                }
                Some(end) => {
                    chars.next();
                    if end < start {
                        return Err(unsupported(pattern, format!("invalid range '{start}-{end}'")));
                    }
                    ranges.push((start, end));
                }
            }
        } else {
            ranges.push((start, start));
        }
    }

    if !closed {
        return Err(unsupported(pattern, "unterminated character class"));
    }
    if ranges.is_empty() {
        return Err(unsupported(pattern, "empty character class"));
    }
    Ok(ranges)
}

fn parse_quantifier<I>(pattern: &str, chars: &mut std::iter::Peekable<I>) -> Result<(usize, usize), ProviderError>
where
    I: Iterator<Item = char>,
{
    let bounds = match chars.peek() {
        Some('?') => (0, 1),
        Some('*') => (0, OPEN_REPEAT),
        Some('+') => (1, 1 + OPEN_REPEAT),
        Some('{') => {
            chars.next();
            let mut text = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    return repeat_bounds(pattern, &text);
                }
                text.push(c);
            }
            return Err(unsupported(pattern, "unterminated repetition"));
        }
        _ => return Ok((1, 1)),
    };
    chars.next();
    Ok(bounds)
}

fn repeat_bounds(pattern: &str, bounds: &str) -> Result<(usize, usize), ProviderError> {
    let number = |text: &str| {
        text.trim()
            .parse::<usize>()
            .map_err(|_| unsupported(pattern, format!("invalid repetition '{{{bounds}}}'")))
    };

    let (min, max) = match bounds.split_once(',') {
        None => {
            let n = number(bounds)?;
            (n, n)
        }
        Some((lo, hi)) if hi.trim().is_empty() => {
            let lo = number(lo)?;
            (lo, lo + OPEN_REPEAT)
        }
        Some((lo, hi)) => (number(lo)?, number(hi)?),
    };

    if min > max {
        return Err(unsupported(pattern, format!("invalid repetition '{{{bounds}}}'")));
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    fn assert_generates_matches(pattern: &str) {
        let regex = Regex::new(&format!("^(?:{pattern})$")).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let value = generate_from_pattern(pattern, &mut rng).unwrap();
            assert!(regex.is_match(&value), "{value:?} does not match {pattern}");
        }
    }

    #[test]
    fn test_phone_pattern() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_from_pattern("^[0-9]{10}$", &mut rng).unwrap();
        assert_eq!(value.len(), 10);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_supported_subset_matches() {
        assert_generates_matches("^[A-Z]{2}-\\d{4}$");
        assert_generates_matches("[a-z0-9_]{3,8}");
        assert_generates_matches("\\+\\d{1,3}");
        assert_generates_matches("ID-[0-9]+x?");
        assert_generates_matches("[\\d-]{5}");
        assert_generates_matches("v\\d\\.\\d\\.\\d");
        assert_generates_matches("[A-Z][a-z]*");
        assert_generates_matches("\\w{4,}");
    }

    #[test]
    fn test_unsupported_constructs_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        for pattern in ["(a|b)", "[^0-9]", "\\D{3}", "a{3", "[a-z", "*a", "\\1"] {
            let result = generate_from_pattern(pattern, &mut rng);
            assert!(
                matches!(result, Err(ProviderError::UnsupportedPattern { .. })),
                "{pattern} should be rejected"
            );
        }
    }

    #[test]
    fn test_pattern_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(5);
        let mut rng2 = StdRng::seed_from_u64(5);
        assert_eq!(
            generate_from_pattern("[A-Z]{8}", &mut rng1).unwrap(),
            generate_from_pattern("[A-Z]{8}", &mut rng2).unwrap()
        );
    }
}
