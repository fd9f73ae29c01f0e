use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// The spreadsheet-backed endpoint the dashboard reads from.
pub const DEFAULT_ENDPOINT: &str =
    "https://sheet2api.com/v1/PMT9ALtxTais/gerenciamento-profissional";

pub const FIELD_COMPANY: &str = "Empresa";
pub const FIELD_LOCATION: &str = "Localização";
pub const FIELD_GROSS_PROFIT: &str = "Lucro Bruto";
pub const FIELD_DEBT: &str = "Dívida";
pub const FIELD_NET_PROFIT: &str = "Lucro Líquido";

/// One company's row, immutable after fetch. Currency fields are carried
/// as received; parsing happens at margin-computation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub company: String,
    pub location: String,
    pub gross_profit: String,
    pub debt: String,
    pub net_profit: String,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("response body is not a JSON array")]
    NotAnArray,

    #[error("row {row} is not a JSON object")]
    NotAnObject { row: usize },

    #[error("row {row} is missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {status} {text}")]
    Status { status: u16, text: String },

    #[error("network error: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response body: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, FetchError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!("margem/", env!("CARGO_PKG_VERSION"))),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| FetchError::ClientBuild { source: e })
}

/// Issues the single outbound GET and parses the body into records.
/// No retry policy: a failure surfaces immediately to the caller.
pub async fn fetch_dataset(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Record>, FetchError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network { source: e })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            text: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        });
    }

    let body = resp
        .text()
        .await
        .map_err(|e| FetchError::Network { source: e })?;
    parse_dataset(&body)
}

/// Validates the wire shape at the boundary: a JSON array of objects with
/// the five required sheet columns. Missing or null keys fail fast with a
/// SchemaError instead of leaking empty strings into the calculations.
pub fn parse_dataset(body: &str) -> Result<Vec<Record>, FetchError> {
    let value: Value = serde_json::from_str(body).map_err(|e| FetchError::Json { source: e })?;
    let rows = value.as_array().ok_or(SchemaError::NotAnArray)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, item) in rows.iter().enumerate() {
        let obj = item.as_object().ok_or(SchemaError::NotAnObject { row })?;
        records.push(Record {
            company: field_text(obj, row, FIELD_COMPANY)?,
            location: field_text(obj, row, FIELD_LOCATION)?,
            gross_profit: field_text(obj, row, FIELD_GROSS_PROFIT)?,
            debt: field_text(obj, row, FIELD_DEBT)?,
            net_profit: field_text(obj, row, FIELD_NET_PROFIT)?,
        });
    }
    Ok(records)
}

fn field_text(
    obj: &serde_json::Map<String, Value>,
    row: usize,
    field: &'static str,
) -> Result<String, SchemaError> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        // The sheet backend is loose about cell types; numbers show up
        // for currency columns when a cell has no explicit format.
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Null) | None => Err(SchemaError::MissingField { row, field }),
        Some(other) => Ok(other.to_string()),
    }
}
