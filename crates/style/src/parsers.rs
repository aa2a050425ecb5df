//! Low-level nom parser functions for CSS-like declaration blocks.

use nom::IResult;
use nom::Parser;
use nom::bytes::complete::{take_till1, take_while};
use nom::character::complete::{char, multispace0, satisfy};
use nom::combinator::{all_consuming, recognize};
use nom::multi::{many0, many1, separated_list0};
use nom::sequence::{pair, preceded, terminated};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleParseError {
    #[error("Malformed declaration block '{0}'")]
    Malformed(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

// --- Helper Parsers ---

fn property_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '-'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    ))
    .parse(input)
}

fn declaration(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = multispace0(input)?;
    let (input, name) = property_name(input)?;
    let (input, _) = (multispace0, char(':'), multispace0).parse(input)?;
    let (input, value) = take_till1(|c: char| c == ';').parse(input)?;
    Ok((input, (name, value.trim())))
}

fn separator(input: &str) -> IResult<&str, ()> {
    let (input, _) = many1((multispace0, char(';'))).parse(input)?;
    Ok((input, ()))
}

fn declarations(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    all_consuming(terminated(
        preceded(
            many0((multispace0, char(';'))),
            separated_list0(separator, declaration),
        ),
        (many0((multispace0, char(';'))), multispace0),
    ))
    .parse(input)
}

/// Parses `name: value; name: value` into declaration pairs.
///
/// Empty declarations between semicolons and trailing semicolons are allowed.
pub fn parse_declaration_block(block: &str) -> Result<Vec<(&str, &str)>, StyleParseError> {
    declarations(block)
        .map(|(_, pairs)| pairs)
        .map_err(|_| StyleParseError::Malformed(block.to_string()))
}

/// Parses a non-negative integer theme value such as a delay in milliseconds.
pub fn parse_millis(property: &str, value: &str) -> Result<u32, StyleParseError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix("ms").unwrap_or(trimmed).trim();
    digits
        .parse::<u32>()
        .map_err(|_| StyleParseError::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
        })
}
