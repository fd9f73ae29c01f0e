use crate::fetcher::Record;

/// Label of the synthetic leading entry that matches every record.
pub const ALL_LABEL: &str = "all";

/// The active category constraint on displayed records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FilterSelection {
    #[default]
    All,
    Location(String),
}

impl FilterSelection {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            FilterSelection::All => true,
            FilterSelection::Location(location) => record.location == *location,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FilterSelection::All => ALL_LABEL,
            FilterSelection::Location(location) => location,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterEntry {
    pub label: String,
    pub count: usize,
}

/// Derives the filter row from the dataset: a leading "all" entry, then
/// the distinct locations in first-appearance order with member counts.
pub fn derive_filters(dataset: &[Record]) -> Vec<FilterEntry> {
    let mut entries = vec![FilterEntry {
        label: ALL_LABEL.to_string(),
        count: dataset.len(),
    }];

    for record in dataset {
        match entries[1..]
            .iter_mut()
            .find(|e| e.label == record.location)
        {
            Some(entry) => entry.count += 1,
            None => entries.push(FilterEntry {
                label: record.location.clone(),
                count: 1,
            }),
        }
    }

    entries
}

/// Maps an index into the filter row back to a selection. Index 0 is the
/// synthetic "all" entry.
pub fn selection_at(filters: &[FilterEntry], index: usize) -> FilterSelection {
    match filters.get(index) {
        Some(entry) if index > 0 => FilterSelection::Location(entry.label.clone()),
        _ => FilterSelection::All,
    }
}
