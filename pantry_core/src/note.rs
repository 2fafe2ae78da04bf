//! Free-text note parsing.
//!
//! A note is a single line such as `Eggs goose 4 2023-07-15` that describes
//! one new lot. Parsers turn it into a [`ParsedNote`]; the inventory then
//! records it like any structured add.
//!
//! Two grammars ship with the crate:
//! - [`GreedyNoteParser`]: whitespace tokens, quantity found by scanning
//!   from the right. Tolerates digits inside names but misreads names that
//!   end in a standalone number ("Type 2 sugar").
//! - [`DelimitedNoteParser`]: explicit field separator, no ambiguity.

use crate::{Error, Result};
use rust_decimal::Decimal;

/// Structured form of a note, before date validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedNote {
    pub name: String,
    pub quantity: Decimal,
    /// Raw date token; validated when the lot is recorded
    pub expiration_date: Option<String>,
}

/// Strategy for turning a note into a structured record
pub trait NoteParser {
    fn parse(&self, note: &str) -> Result<ParsedNote>;
}

/// Read a token as an exact decimal quantity
///
/// Plain (`2.5`, `-3`, `1_000`) and exponent (`1e3`, `1E+2`) forms are
/// accepted. Tokens that `Decimal` could only hold after rounding are not
/// quantities.
pub fn parse_quantity(token: &str) -> Option<Decimal> {
    match token.split_once(['e', 'E']) {
        None => Decimal::from_str_exact(token).ok(),
        Some((mantissa, _)) => {
            Decimal::from_str_exact(mantissa).ok()?;
            Decimal::from_scientific(token).ok()
        }
    }
}

fn unparseable(note: &str) -> Error {
    tracing::warn!("Could not parse note {:?}", note);
    Error::UnparseableNote(note.to_string())
}

/// Right-to-left greedy decimal scan over whitespace-separated tokens
///
/// The rightmost token (other than the first) that reads as a decimal is the
/// quantity, everything before it is the name, and the token right after it,
/// if any, is the expiration date. Further tokens are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GreedyNoteParser;

impl NoteParser for GreedyNoteParser {
    fn parse(&self, note: &str) -> Result<ParsedNote> {
        let tokens: Vec<&str> = note.split_whitespace().collect();

        // Position 0 always belongs to the name
        for i in (1..tokens.len()).rev() {
            let Some(quantity) = parse_quantity(tokens[i]) else {
                tracing::trace!("Token {:?} at {} is not a quantity", tokens[i], i);
                continue;
            };

            let parsed = ParsedNote {
                name: tokens[..i].join(" "),
                quantity,
                expiration_date: tokens.get(i + 1).map(|s| s.to_string()),
            };
            tracing::debug!("Parsed note {:?} as {:?}", note, parsed);
            return Ok(parsed);
        }

        Err(unparseable(note))
    }
}

/// `name <d> quantity [<d> date]` with a fixed delimiter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelimitedNoteParser {
    pub delimiter: char,
}

impl Default for DelimitedNoteParser {
    fn default() -> Self {
        Self { delimiter: ';' }
    }
}

impl NoteParser for DelimitedNoteParser {
    fn parse(&self, note: &str) -> Result<ParsedNote> {
        let fields: Vec<&str> = note.split(self.delimiter).map(str::trim).collect();

        let (name, quantity, date) = match fields.as_slice() {
            [name, quantity] => (*name, *quantity, None),
            [name, quantity, date] => (*name, *quantity, Some(*date)),
            _ => return Err(unparseable(note)),
        };

        if name.is_empty() {
            return Err(unparseable(note));
        }
        let quantity = parse_quantity(quantity).ok_or_else(|| unparseable(note))?;

        let parsed = ParsedNote {
            name: name.to_string(),
            quantity,
            expiration_date: date.filter(|d| !d.is_empty()).map(str::to_string),
        };
        tracing::debug!("Parsed note {:?} as {:?}", note, parsed);
        Ok(parsed)
    }
}

/// Grammar selected for an inventory's `add_by_note`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoteGrammar {
    #[default]
    Greedy,
    Delimited(DelimitedNoteParser),
}

impl NoteParser for NoteGrammar {
    fn parse(&self, note: &str) -> Result<ParsedNote> {
        match self {
            NoteGrammar::Greedy => GreedyNoteParser.parse(note),
            NoteGrammar::Delimited(parser) => parser.parse(note),
        }
    }
}
