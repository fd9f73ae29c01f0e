pub mod tui;

use crate::fetcher::Record;
use crate::filters::FilterSelection;
use crate::money;

/// What the view currently shows. Exactly one variant is active at any
/// time; there is no way to have the loading and error surfaces visible
/// together.
#[derive(Clone, Debug, PartialEq)]
pub enum UiState {
    Loading,
    Loaded,
    Empty,
    Error(String),
}

/// Pure projection of one record onto the card surface. Line items carry
/// the currency text exactly as received, no reformatting.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub title: String,
    pub location: String,
    /// Formatted margin badge, e.g. "60.0%". None when the record's
    /// currency fields do not support the computation; the card is still
    /// rendered, flagged instead of aborting the batch.
    pub margin: Option<String>,
    pub gross_profit: String,
    pub debt: String,
    pub net_profit: String,
}

/// Projects the dataset under the given selection into cards, preserving
/// dataset order. Idempotent: same inputs, same card sequence.
pub fn build_cards(dataset: &[Record], selection: &FilterSelection) -> Vec<Card> {
    dataset
        .iter()
        .filter(|record| selection.matches(record))
        .map(|record| Card {
            title: record.company.clone(),
            location: record.location.clone(),
            margin: money::margin(record).ok().map(|m| format!("{m:.1}%")),
            gross_profit: record.gross_profit.clone(),
            debt: record.debt.clone(),
            net_profit: record.net_profit.clone(),
        })
        .collect()
}

/// Post-fetch / post-filter state: an empty filtered set renders the empty
/// surface, anything else the card grid.
pub fn ui_state_for(cards: &[Card]) -> UiState {
    if cards.is_empty() {
        UiState::Empty
    } else {
        UiState::Loaded
    }
}
