//! The inventory aggregate.
//!
//! An [`Inventory`] maps good names to the lots recorded under them, in the
//! order goods were first added. Queries match names case-insensitively by
//! substring; whether two spellings are the same good is decided by the
//! inventory's [`NameIdentity`].

use crate::clock::{Clock, SystemClock};
use crate::note::{NoteGrammar, NoteParser};
use crate::types::sum_quantities;
use crate::{Config, Good, Lot, NameIdentity, QuantityPolicy, Result};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Perishable goods and their lots
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    goods: Vec<Good>,
    /// Identity key -> position in `goods`
    index: HashMap<String, usize>,
    identity: NameIdentity,
    quantity_policy: QuantityPolicy,
    grammar: NoteGrammar,
    lookahead_days: i64,
}

impl Inventory {
    /// Empty inventory with case-sensitive names, any quantity, greedy notes
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: NameIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Empty inventory honoring the settings in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            identity: config.inventory.identity,
            quantity_policy: config.inventory.quantity_policy,
            grammar: config.notes.grammar()?,
            lookahead_days: config.expiry.lookahead_days,
            ..Self::default()
        })
    }

    pub fn with_quantity_policy(mut self, policy: QuantityPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }

    pub fn with_grammar(mut self, grammar: NoteGrammar) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn identity(&self) -> NameIdentity {
        self.identity
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Record a new lot of `name`
    ///
    /// `expiration_date` must be `YYYY-MM-DD` when present. The date is
    /// validated before anything is recorded, so a failed add leaves the
    /// inventory unchanged.
    pub fn add(
        &mut self,
        name: &str,
        quantity: Decimal,
        expiration_date: Option<&str>,
    ) -> Result<()> {
        let lot = Lot::checked(name, quantity, expiration_date, self.quantity_policy)?;
        self.push_lot(name, lot);
        Ok(())
    }

    /// Record a lot described by a free-text note, using the configured grammar
    pub fn add_by_note(&mut self, note: &str) -> Result<()> {
        let grammar = self.grammar;
        self.add_by_note_with(&grammar, note)
    }

    /// Record a lot described by a free-text note, using `parser`
    pub fn add_by_note_with(&mut self, parser: &dyn NoteParser, note: &str) -> Result<()> {
        let parsed = parser.parse(note)?;
        self.add(
            &parsed.name,
            parsed.quantity,
            parsed.expiration_date.as_deref(),
        )
    }

    fn push_lot(&mut self, name: &str, lot: Lot) {
        let key = self.identity.key(name);
        tracing::debug!(
            "Recording lot of {:?}: quantity {}, expires {:?}",
            name,
            lot.quantity(),
            lot.expiration_date()
        );

        match self.index.get(&key) {
            Some(&position) => self.goods[position].lots.push(lot),
            None => {
                self.index.insert(key, self.goods.len());
                self.goods.push(Good::new(name, lot));
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    fn matching<'a>(&'a self, needle: &str) -> impl Iterator<Item = &'a Good> + 'a {
        let needle = needle.to_lowercase();
        self.goods
            .iter()
            .filter(move |good| good.name.to_lowercase().contains(&needle))
    }

    /// Names of goods containing `needle`, ignoring case, in first-add order
    pub fn find(&self, needle: &str) -> Vec<String> {
        self.matching(needle).map(|good| good.name.clone()).collect()
    }

    /// Total quantity over every good containing `needle`, ignoring case
    ///
    /// Totals beyond the `Decimal` range clamp to `Decimal::MAX` / `Decimal::MIN`.
    pub fn amount(&self, needle: &str) -> Decimal {
        sum_quantities(self.matching(needle).map(Good::total))
    }

    /// Goods with lots expiring within `in_advance_days` of today's local date
    pub fn expire(&self, in_advance_days: i64) -> Vec<(String, Decimal)> {
        self.expire_with(&SystemClock, in_advance_days)
    }

    /// Like [`Inventory::expire`] with the configured lookahead
    pub fn expire_default(&self) -> Vec<(String, Decimal)> {
        self.expire(self.lookahead_days)
    }

    pub fn expire_with(&self, clock: &dyn Clock, in_advance_days: i64) -> Vec<(String, Decimal)> {
        self.expire_at(clock.today(), in_advance_days)
    }

    /// Per-good totals of lots expiring on or before `reference + in_advance_days`
    ///
    /// Lots without an expiration date are never included, and goods with no
    /// qualifying lot are absent from the result. Order follows first-add order.
    pub fn expire_at(&self, reference: NaiveDate, in_advance_days: i64) -> Vec<(String, Decimal)> {
        let deadline = deadline(reference, in_advance_days);

        let expiring: Vec<(String, Decimal)> = self
            .goods
            .iter()
            .filter_map(|good| {
                let mut lots = good
                    .lots
                    .iter()
                    .filter(|lot| lot.expires_by(deadline))
                    .peekable();
                lots.peek()?;
                Some((good.name.clone(), sum_quantities(lots.map(Lot::quantity))))
            })
            .collect();

        tracing::debug!(
            "{} goods expiring by {} ({} day(s) from {})",
            expiring.len(),
            deadline,
            in_advance_days,
            reference
        );
        expiring
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Lots stored under `name`, looked up with the inventory's identity
    pub fn lots(&self, name: &str) -> Option<&[Lot]> {
        self.index
            .get(&self.identity.key(name))
            .map(|&position| self.goods[position].lots.as_slice())
    }

    /// Goods in first-add order
    pub fn goods(&self) -> impl Iterator<Item = &Good> {
        self.goods.iter()
    }

    /// Number of distinct goods
    pub fn len(&self) -> usize {
        self.goods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goods.is_empty()
    }
}

/// `reference + days`, clamped to the representable date range
fn deadline(reference: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| reference.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.goods)
    }
}
