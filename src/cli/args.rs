use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "margem",
    version,
    about = "terminal dashboard for company margin tracking",
    long_about = "Margem fetches a spreadsheet-backed dataset of company financials, derives the\nprofit margin per company, and renders a filterable card dashboard in the\nterminal.\n\nExamples:\n  margem\n  margem --once\n  margem --once -f Curitiba -o margins.json\n  margem -u https://sheet2api.com/v1/<sheet>/<tab> --timeout 30\n\nTip: Use --init-config to scaffold ~/.margem/config.yml and keep invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help_heading = "Input",
        help = "Dataset endpoint (defaults to the built-in sheet2api URL)."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.margem/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a default config file to ~/.margem/config.yml and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Performance",
        help = "HTTP request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = '1',
        long = "once",
        help_heading = "Mode",
        help = "Fetch once, print the cards to the console, and exit (no TUI)."
    )]
    pub once: bool,

    #[arg(
        short = 'f',
        long = "filter",
        value_name = "LOCATION",
        help_heading = "Mode",
        help = "Location filter to apply ('all' shows everything)."
    )]
    pub filter: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the fetched cards to a file (--once mode)."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output file format: text or json (inferred from the extension by default)."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored console output."
    )]
    pub no_color: bool,
}
