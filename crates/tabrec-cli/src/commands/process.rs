//! Process command - reconstruct a single report from its OCR text.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::{debug, info};

use tabrec_core::models::config::TabrecConfig;
use tabrec_core::report::{ExtractionResult, ReportParser, SalesReportParser};
use tabrec_core::{SalesDocument, tokenize};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// OCR text files, in page order; form feeds split pages within a file
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Document identifier (default: first input file stem)
    #[arg(short, long)]
    document_id: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Validate the reconstructed document
    #[arg(long)]
    validate: bool,

    /// Write tokens / header / rows debug artifacts into this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let pages = read_pages(&args.input)?;
    let document_id = args.document_id.clone().unwrap_or_else(|| {
        args.input[0]
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report")
            .to_string()
    });

    info!("Processing document: {}", document_id);

    let parser = SalesReportParser::from_config(config)?;
    let result = parser.process(&pages, &document_id)?;

    for warning in &result.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    if let Some(debug_dir) = &args.debug_dir {
        write_debug_artifacts(debug_dir, &pages, &result)?;
    }

    if args.validate {
        let issues = result.document.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_document(&result.document, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    println!(
        "{} {} items reconstructed, {} rows rejected in {}ms",
        style("✓").green(),
        result.document.items.len(),
        result.rejected_rows,
        result.processing_time_ms
    );

    Ok(())
}

pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<TabrecConfig> {
    match config_path {
        Some(path) => TabrecConfig::from_file(Path::new(path))
            .with_context(|| format!("failed to load config from {path}")),
        None => Ok(TabrecConfig::default()),
    }
}

/// Read page texts from the input files.
///
/// Form feeds (the page break OCR engines emit) split a file into multiple
/// pages; blank pages are dropped.
pub(crate) fn read_pages(inputs: &[PathBuf]) -> anyhow::Result<Vec<String>> {
    let mut pages = Vec::new();

    for path in inputs {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for page in text.split('\u{000C}') {
            if !page.trim().is_empty() {
                pages.push(page.to_string());
            }
        }
    }

    if pages.is_empty() {
        anyhow::bail!("input contains no OCR text");
    }
    Ok(pages)
}

/// Dump the intermediate artifacts that make extraction bugs traceable.
fn write_debug_artifacts(
    dir: &Path,
    pages: &[String],
    result: &ExtractionResult,
) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;

    let tokens = tokenize(&pages.join("\n"));
    fs::write(dir.join("tokens.txt"), tokens.join("\n"))?;

    let header = &result.document.header;
    fs::write(
        dir.join("header.txt"),
        format!(
            "vendor_id={}\nvendor_name={}\nperiod_start={}\nperiod_end={}\n",
            header.vendor_id,
            header.vendor_name,
            format_date(header.period_start_date),
            format_date(header.period_end_date),
        ),
    )?;

    let mut rows =
        String::from("no\tpcode\tbarcode\tinvoice\tdocument\tunit\tqty\tamt\ttax\tnet\tname\n");
    for item in &result.document.items {
        rows.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            item.no,
            item.product_code,
            item.barcode,
            item.invoice_no,
            item.document,
            item.unit_price,
            item.quantity_sold,
            item.amount,
            item.tax,
            item.net_amount,
            item.product_name,
        ));
    }
    fs::write(dir.join("rows_found.tsv"), rows)?;

    debug!("Wrote debug artifacts to {}", dir.display());
    Ok(())
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

pub(crate) fn format_document(
    document: &SalesDocument,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        OutputFormat::Csv => format_csv(document),
        OutputFormat::Text => Ok(format_text(document)),
    }
}

fn format_csv(document: &SalesDocument) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "no",
        "product_code",
        "barcode",
        "product_name",
        "invoice_no",
        "document",
        "unit_price",
        "quantity_sold",
        "amount",
        "tax",
        "net_amount",
        "vendor_id",
        "vendor_name",
        "period_start_date",
        "period_end_date",
    ])?;

    for item in &document.items {
        wtr.write_record([
            item.no.to_string(),
            item.product_code.clone(),
            item.barcode.clone(),
            item.product_name.clone(),
            item.invoice_no.clone(),
            item.document.clone(),
            item.unit_price.to_string(),
            item.quantity_sold.to_string(),
            item.amount.to_string(),
            item.tax.to_string(),
            item.net_amount.to_string(),
            item.vendor_id.clone(),
            item.vendor_name.clone(),
            format_date(item.period_start_date),
            format_date(item.period_end_date),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(document: &SalesDocument) -> String {
    let mut output = String::new();
    let header = &document.header;

    let vendor = if header.vendor_name.is_empty() {
        "unknown"
    } else {
        header.vendor_name.as_str()
    };
    output.push_str(&format!("Vendor: {}\n", vendor));
    output.push_str(&format!(
        "Period: {} - {}\n",
        format_date(header.period_start_date),
        format_date(header.period_end_date)
    ));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &document.items {
        output.push_str(&format!(
            "{:>4}. {} [{}] {}\n",
            item.no, item.product_code, item.barcode, item.product_name
        ));
        output.push_str(&format!(
            "      invoice {} document {}\n",
            item.invoice_no, item.document
        ));
        output.push_str(&format!(
            "      {} x {} = {} (tax {}, net {})\n",
            item.unit_price, item.quantity_sold, item.amount, item.tax, item.net_amount
        ));
    }

    output.push_str(&format!("\nTotal items: {}\n", document.items.len()));
    output
}
