//! Line grammar for free-text effect descriptions
//!
//! Recognised shapes, tried in this order:
//! - `[3]세트효과` section headers
//! - `<name> +<n>[%]`, digits optionally comma-grouped
//! - `<name> <n>% 증가`
//!
//! Everything else is kept as opaque text.

use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, digit1, multispace0, multispace1};
use nom::combinator::opt;
use nom::{IResult, Parser};

/// One classified, trimmed, non-empty line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectLine<'a> {
    /// `[n]세트효과`
    SetHeader(Option<u32>),
    /// A numeric stat delta
    Stat { name: &'a str, value: i64, percent: bool },
    Other(&'a str),
}

fn is_grouped_digit(c: char) -> bool {
    c.is_ascii_digit() || c == ','
}

fn grouped_number(input: &str) -> IResult<&str, &str> {
    take_while1(is_grouped_digit).parse(input)
}

/// Parse `1,000` style digits
///
/// Bare separators read as zero; a value too large for `i64` is `None`.
pub fn parse_grouped(digits: &str) -> Option<i64> {
    let digits = digits.replace(',', "");
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok()
}

/// `[n]` followed by optional whitespace and `세트효과`
pub fn set_header(input: &str) -> IResult<&str, Option<u32>> {
    (char('['), digit1, char(']'), multispace0, tag("세트효과"))
        .map(|(_, digits, _, _, _): (char, &str, char, &str, &str)| digits.parse::<u32>().ok())
        .parse(input)
}

/// `+<n>` with an optional `%`, not running into a word character
fn plus_delta(input: &str) -> IResult<&str, (&str, bool)> {
    let (rest, (_, digits, percent)) = (char('+'), grouped_number, opt(char('%'))).parse(input)?;
    let percent = percent.is_some();
    if !percent && rest.chars().next().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify)));
    }
    Ok((rest, (digits, percent)))
}

/// Whitespace, `<n>%`, optional whitespace, then `증가`
fn percent_increase(input: &str) -> IResult<&str, &str> {
    (multispace1, grouped_number, char('%'), multispace0, tag("증가"))
        .map(|(_, digits, _, _, _): (&str, &str, char, &str, &str)| digits)
        .parse(input)
}

/// Find the first `+` (after at least one name character) that starts a delta
fn match_plus(line: &str) -> Option<(&str, i64, bool)> {
    line.char_indices()
        .filter(|&(i, c)| i > 0 && c == '+')
        .find_map(|(i, _)| {
            let (_, (digits, percent)) = plus_delta(&line[i..]).ok()?;
            Some((line[..i].trim(), parse_grouped(digits)?, percent))
        })
}

/// Find the first whitespace run that starts a `<n>% 증가` tail
fn match_increase(line: &str) -> Option<(&str, i64)> {
    line.char_indices()
        .filter(|&(i, c)| i > 0 && c.is_whitespace())
        .find_map(|(i, _)| {
            let (_, digits) = percent_increase(&line[i..]).ok()?;
            Some((line[..i].trim(), parse_grouped(digits)?))
        })
}

/// Classify one line; blank lines yield `None`
pub fn classify_line(raw: &str) -> Option<EffectLine<'_>> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    if let Ok((_, tier)) = set_header(line) {
        return Some(EffectLine::SetHeader(tier));
    }

    if let Some((name, value, percent)) = match_plus(line) {
        return Some(EffectLine::Stat { name, value, percent });
    }

    if let Some((name, value)) = match_increase(line) {
        return Some(EffectLine::Stat {
            name,
            value,
            percent: true,
        });
    }

    Some(EffectLine::Other(line))
}
