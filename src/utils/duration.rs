use std::convert::TryFrom;
use std::time::Duration;

use nom::{branch::alt, bytes::complete::tag, character::complete::digit1};

use super::parse::{IResult, ParseError, Span};
use crate::error::{Error, Result};

pub fn parse_duration(s: &str) -> Result<Duration> {
    match duration(Span::new(s)) {
        Ok((rest, d)) if rest.fragment().is_empty() => Ok(d),
        Ok((rest, _)) => Err(Error::from(format!(
            "unexpected trailing input '{}' in duration '{}'",
            rest.fragment(),
            s
        ))),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::from(format!(
            "{} at offset {} in duration '{}'",
            e.message(),
            e.offset(),
            s
        ))),
        Err(nom::Err::Incomplete(_)) => Err(Error::from(format!("incomplete duration '{}'", s))),
    }
}

/// Parse Go-like duration string: `15s`, `1m30s`, `1h`.
/// - Only positive durations.
/// - No fractional units.
/// - Units are always ordered from longest to shortest.
fn duration(input: Span) -> IResult<Duration> {
    let (rest, duration) = duration_inner(input, Unit::Day)?;

    if duration.eq(&Duration::from_millis(0)) {
        return Err(nom::Err::Failure(ParseError::new(
            "duration must be greater than 0".to_owned(),
            input,
        )));
    }

    Ok((rest, duration))
}

enum Unit {
    Millisecond,
    Second, // 1000 milliseconds
    Minute, // 60 seconds
    Hour,   // 60 minutes
    Day,    // 24 hours
}

impl Unit {
    fn milliseconds(&self) -> u64 {
        use Unit::*;
        match self {
            Millisecond => 1,
            Second => 1000,
            Minute => 60 * 1000,
            Hour => 60 * 60 * 1000,
            Day => 24 * 60 * 60 * 1000,
        }
    }

    fn descendant(&self) -> Option<Self> {
        use Unit::*;
        match self {
            Millisecond => None,
            Second => Some(Millisecond),
            Minute => Some(Second),
            Hour => Some(Minute),
            Day => Some(Hour),
        }
    }
}

impl TryFrom<&str> for Unit {
    type Error = Error;

    fn try_from(u: &str) -> Result<Self> {
        use Unit::*;

        match u {
            "d" => Ok(Day),
            "h" => Ok(Hour),
            "m" => Ok(Minute),
            "s" => Ok(Second),
            "ms" => Ok(Millisecond),
            _ => Err(Error::new("Unknown duration unit")),
        }
    }
}

fn duration_inner(input: Span, max_allowed_unit: Unit) -> IResult<Duration> {
    let (rest, multiplier) = digit1(input)?;

    let (rest, unit) = alt((tag("ms"), tag("s"), tag("m"), tag("h"), tag("d")))(rest)?;

    let unit = match Unit::try_from(*unit.fragment()) {
        Ok(unit) => unit,
        Err(e) => return Err(nom::Err::Failure(ParseError::new(e.message().into(), input))),
    };
    if unit.milliseconds() > max_allowed_unit.milliseconds() {
        return Err(nom::Err::Failure(ParseError::new(
            "invalid duration literal".to_owned(),
            input,
        )));
    }

    let overflow = || {
        nom::Err::Failure(ParseError::new(
            "duration overflow occurred".to_owned(),
            input,
        ))
    };

    let multiplier = multiplier.fragment().parse::<u32>().map_err(|_| overflow())?;
    let duration = Duration::from_millis(unit.milliseconds())
        .checked_mul(multiplier)
        .ok_or_else(overflow)?;

    if let Some(next_unit) = unit.descendant() {
        let (rest, more_duration) = match duration_inner(rest, next_unit) {
            Ok((rest, more_duration)) => (rest, more_duration),
            Err(nom::Err::Error(_)) => (rest, Duration::from_millis(0)),
            Err(e) => return Err(e),
        };
        Ok((
            rest,
            duration.checked_add(more_duration).ok_or_else(overflow)?,
        ))
    } else {
        Ok((rest, duration))
    }
}
