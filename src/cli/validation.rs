use crate::cli::args::CliArgs;
use crate::output;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(url) = args.url.as_deref() {
        if reqwest::Url::parse(url).is_err() {
            return Err(format!("invalid --url '{url}'"));
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text or json"
            ));
        }
    }
    if args.output.is_some() && !args.once {
        return Err("--output requires --once".to_string());
    }
    if let Some(filter) = args.filter.as_deref() {
        if filter.trim().is_empty() {
            return Err("invalid --filter, expected a location or 'all'".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    Ok(())
}
