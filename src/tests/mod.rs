use crate::fetcher::{FetchError, Record, SchemaError};
use crate::filters::FilterSelection;
use crate::money::CalculationError;

fn record(company: &str, location: &str, gross: &str, debt: &str, net: &str) -> Record {
    Record {
        company: company.to_string(),
        location: location.to_string(),
        gross_profit: gross.to_string(),
        debt: debt.to_string(),
        net_profit: net.to_string(),
    }
}

#[test]
fn parse_amount_plain_integer() {
    assert_eq!(crate::money::parse_amount("1000"), Some(1000.0));
}

#[test]
fn parse_amount_strips_currency_symbols() {
    assert_eq!(crate::money::parse_amount("R$ 1.234,56"), Some(1234.56));
    assert_eq!(crate::money::parse_amount("$1,234.56"), Some(1234.56));
}

#[test]
fn parse_amount_single_separator_reads_as_decimal() {
    assert_eq!(crate::money::parse_amount("12,5"), Some(12.5));
    assert_eq!(crate::money::parse_amount("12.5"), Some(12.5));
}

#[test]
fn parse_amount_repeated_separator_reads_as_thousands() {
    assert_eq!(crate::money::parse_amount("1.000.000"), Some(1_000_000.0));
    assert_eq!(crate::money::parse_amount("1,000,000"), Some(1_000_000.0));
}

#[test]
fn parse_amount_rejects_non_numeric_input() {
    assert_eq!(crate::money::parse_amount(""), None);
    assert_eq!(crate::money::parse_amount("n/a"), None);
    assert_eq!(crate::money::parse_amount("R$ ,."), None);
}

#[test]
fn margin_matches_reference_scenario() {
    // (1000 - 400) / 1000 * 100 = 60.0
    let r = record("A", "X", "1000", "400", "600");
    assert_eq!(crate::money::margin(&r).unwrap(), 60.0);
}

#[test]
fn margin_rounds_to_one_decimal() {
    let r = record("A", "X", "300", "100", "200");
    assert_eq!(crate::money::margin(&r).unwrap(), 66.7);
}

#[test]
fn margin_is_deterministic() {
    let r = record("A", "X", "R$ 1.500,00", "R$ 375,00", "R$ 1.125,00");
    let first = crate::money::margin(&r).unwrap();
    let second = crate::money::margin(&r).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, 75.0);
}

#[test]
fn margin_fails_on_zero_gross_profit() {
    let r = record("A", "X", "0", "400", "600");
    assert!(matches!(
        crate::money::margin(&r),
        Err(CalculationError::ZeroGrossProfit)
    ));
}

#[test]
fn margin_names_the_unparseable_field() {
    let r = record("A", "X", "n/a", "400", "600");
    match crate::money::margin(&r) {
        Err(CalculationError::Unparseable { field, .. }) => assert_eq!(field, "Lucro Bruto"),
        other => panic!("expected unparseable error, got {other:?}"),
    }
}

#[test]
fn derive_filters_counts_distinct_locations_plus_all() {
    let dataset = vec![
        record("A", "X", "1", "0", "1"),
        record("B", "Y", "1", "0", "1"),
        record("C", "X", "1", "0", "1"),
    ];
    let filters = crate::filters::derive_filters(&dataset);
    assert_eq!(filters.len(), 3);
    assert_eq!(filters[0].label, "all");
    assert_eq!(filters[0].count, 3);
    let non_all: usize = filters[1..].iter().map(|e| e.count).sum();
    assert_eq!(non_all, dataset.len());
}

#[test]
fn derive_filters_preserves_first_appearance_order() {
    let dataset = vec![
        record("A", "Salvador", "1", "0", "1"),
        record("B", "Curitiba", "1", "0", "1"),
        record("C", "Salvador", "1", "0", "1"),
        record("D", "Aracaju", "1", "0", "1"),
    ];
    let labels: Vec<_> = crate::filters::derive_filters(&dataset)
        .into_iter()
        .map(|e| e.label)
        .collect();
    assert_eq!(labels, vec!["all", "Salvador", "Curitiba", "Aracaju"]);
}

#[test]
fn derive_filters_on_empty_dataset_is_just_all_zero() {
    let filters = crate::filters::derive_filters(&[]);
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].label, "all");
    assert_eq!(filters[0].count, 0);
}

#[test]
fn reference_scenario_filters_and_margin() {
    let dataset = vec![record("A", "X", "1000", "400", "600")];
    let filters = crate::filters::derive_filters(&dataset);
    assert_eq!(filters.len(), 2);
    assert_eq!((filters[0].label.as_str(), filters[0].count), ("all", 1));
    assert_eq!((filters[1].label.as_str(), filters[1].count), ("X", 1));

    let cards = crate::view::build_cards(&dataset, &FilterSelection::All);
    assert_eq!(cards[0].margin.as_deref(), Some("60.0%"));
}

#[test]
fn build_cards_keeps_only_matching_locations() {
    let dataset = vec![
        record("A", "X", "1000", "400", "600"),
        record("B", "Y", "1000", "400", "600"),
        record("C", "X", "1000", "400", "600"),
    ];
    let selection = FilterSelection::Location("X".to_string());
    let cards = crate::view::build_cards(&dataset, &selection);
    assert_eq!(cards.len(), 2);
    assert!(cards.iter().all(|c| c.location == "X"));
}

#[test]
fn build_cards_preserves_dataset_order() {
    let dataset = vec![
        record("B", "X", "1000", "400", "600"),
        record("A", "X", "1000", "400", "600"),
    ];
    let cards = crate::view::build_cards(&dataset, &FilterSelection::All);
    let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "A"]);
}

#[test]
fn build_cards_is_idempotent() {
    let dataset = vec![
        record("A", "X", "1000", "400", "600"),
        record("B", "Y", "500", "100", "400"),
    ];
    let selection = FilterSelection::Location("Y".to_string());
    let first = crate::view::build_cards(&dataset, &selection);
    let second = crate::view::build_cards(&dataset, &selection);
    assert_eq!(first, second);
}

#[test]
fn bad_record_is_flagged_without_aborting_the_batch() {
    let dataset = vec![
        record("A", "X", "not a number", "400", "600"),
        record("B", "X", "1000", "400", "600"),
    ];
    let cards = crate::view::build_cards(&dataset, &FilterSelection::All);
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].margin, None);
    assert_eq!(cards[1].margin.as_deref(), Some("60.0%"));
}

#[test]
fn empty_filtered_set_is_the_empty_state() {
    let dataset = vec![record("A", "X", "1000", "400", "600")];
    let selection = FilterSelection::Location("Z".to_string());
    let cards = crate::view::build_cards(&dataset, &selection);
    assert!(cards.is_empty());
    assert_eq!(crate::view::ui_state_for(&cards), crate::view::UiState::Empty);
}

#[test]
fn line_items_carry_currency_text_as_received() {
    let dataset = vec![record("A", "X", "R$ 1.000,00", "R$ 400,00", "R$ 600,00")];
    let cards = crate::view::build_cards(&dataset, &FilterSelection::All);
    assert_eq!(cards[0].gross_profit, "R$ 1.000,00");
    assert_eq!(cards[0].debt, "R$ 400,00");
    assert_eq!(cards[0].net_profit, "R$ 600,00");
}

#[test]
fn parse_dataset_reads_the_sheet_shape() {
    let body = r#"[
        {"Empresa": "A", "Localização": "X", "Lucro Bruto": "1000",
         "Dívida": "400", "Lucro Líquido": "600"}
    ]"#;
    let dataset = crate::fetcher::parse_dataset(body).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset[0].company, "A");
    assert_eq!(dataset[0].location, "X");
}

#[test]
fn parse_dataset_coerces_numeric_cells_to_text() {
    let body = r#"[
        {"Empresa": "A", "Localização": "X", "Lucro Bruto": 1000,
         "Dívida": 400, "Lucro Líquido": 600}
    ]"#;
    let dataset = crate::fetcher::parse_dataset(body).unwrap();
    assert_eq!(dataset[0].gross_profit, "1000");
    assert_eq!(crate::money::margin(&dataset[0]).unwrap(), 60.0);
}

#[test]
fn parse_dataset_rejects_missing_required_field() {
    let body = r#"[
        {"Empresa": "A", "Localização": "X", "Lucro Bruto": "1000",
         "Dívida": "400"}
    ]"#;
    match crate::fetcher::parse_dataset(body) {
        Err(FetchError::Schema(SchemaError::MissingField { row, field })) => {
            assert_eq!(row, 0);
            assert_eq!(field, "Lucro Líquido");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn parse_dataset_rejects_null_field() {
    let body = r#"[
        {"Empresa": null, "Localização": "X", "Lucro Bruto": "1000",
         "Dívida": "400", "Lucro Líquido": "600"}
    ]"#;
    assert!(matches!(
        crate::fetcher::parse_dataset(body),
        Err(FetchError::Schema(SchemaError::MissingField { row: 0, field: "Empresa" }))
    ));
}

#[test]
fn parse_dataset_rejects_non_array_body() {
    assert!(matches!(
        crate::fetcher::parse_dataset(r#"{"rows": []}"#),
        Err(FetchError::Schema(SchemaError::NotAnArray))
    ));
}

#[test]
fn parse_dataset_rejects_malformed_json() {
    assert!(matches!(
        crate::fetcher::parse_dataset("not json"),
        Err(FetchError::Json { .. })
    ));
}

#[test]
fn parse_dataset_empty_array_is_an_empty_dataset() {
    let dataset = crate::fetcher::parse_dataset("[]").unwrap();
    assert!(dataset.is_empty());
    let filters = crate::filters::derive_filters(&dataset);
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].count, 0);
}

#[test]
fn status_error_carries_the_status_text() {
    let err = FetchError::Status {
        status: 500,
        text: "Internal Server Error".to_string(),
    };
    assert!(err.to_string().contains("Internal Server Error"));
    assert!(err.to_string().contains("500"));
}

#[test]
fn output_format_parse_and_inference() {
    use crate::output::OutputFormat;
    assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
    assert_eq!(OutputFormat::parse("TEXT"), Some(OutputFormat::Text));
    assert_eq!(OutputFormat::parse("xml"), None);
    assert_eq!(
        crate::output::infer_format_from_path("./cards.json"),
        Some(OutputFormat::Json)
    );
    assert_eq!(crate::output::infer_format_from_path("cards.csv"), None);
}

#[test]
fn output_records_respect_the_selection() {
    let dataset = vec![
        record("A", "X", "1000", "400", "600"),
        record("B", "Y", "1000", "400", "600"),
    ];
    let records =
        crate::output::build_records(&dataset, &FilterSelection::Location("Y".to_string()));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].company, "B");
    assert_eq!(records[0].margin, Some(60.0));
}

#[test]
fn render_json_includes_the_margin_field() {
    let dataset = vec![record("A", "X", "1000", "400", "600")];
    let records = crate::output::build_records(&dataset, &FilterSelection::All);
    let rendered = String::from_utf8(crate::output::render_json(&records)).unwrap();
    assert!(rendered.contains("\"margin\": 60.0"));
    assert!(rendered.contains("\"company\": \"A\""));
}

#[test]
fn render_text_marks_unparseable_margins() {
    let dataset = vec![record("A", "X", "junk", "400", "600")];
    let records = crate::output::build_records(&dataset, &FilterSelection::All);
    let rendered = String::from_utf8(crate::output::render_text(&records)).unwrap();
    assert!(rendered.contains("n/a"));
}
