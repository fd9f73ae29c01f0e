use serde::Serialize;

use crate::fetcher::Record;
use crate::filters::FilterSelection;
use crate::money;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub company: String,
    pub location: String,
    pub margin: Option<f64>,
    pub gross_profit: String,
    pub debt: String,
    pub net_profit: String,
}

pub fn build_records(dataset: &[Record], selection: &FilterSelection) -> Vec<OutputRecord> {
    dataset
        .iter()
        .filter(|record| selection.matches(record))
        .map(|record| OutputRecord {
            company: record.company.clone(),
            location: record.location.clone(),
            margin: money::margin(record).ok(),
            gross_profit: record.gross_profit.clone(),
            debt: record.debt.clone(),
            net_profit: record.net_profit.clone(),
        })
        .collect()
}

pub fn render_text(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        let margin = r
            .margin
            .map(|m| format!("{m:.1}%"))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\n",
            r.company, r.location, margin, r.gross_profit, r.debt, r.net_profit
        ));
    }
    out.into_bytes()
}

pub fn render_json(records: &[OutputRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}
