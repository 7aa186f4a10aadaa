//! # Receipt Subcommand
//!
//! Reads a receipt or invoice image with the vision model.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::engine::general_purpose;
use base64::Engine as _;
use clap::Args;

use klaar_client::{ModelOutput, ReceiptAnalysis};

use crate::output::{print_json, OutputFormat};

/// Arguments for the receipt subcommand.
#[derive(Args, Debug)]
pub struct ReceiptArgs {
    /// Path to the receipt image.
    pub path: PathBuf,

    /// MIME type of the image. Guessed from the extension if omitted.
    #[arg(long)]
    pub mime_type: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the receipt subcommand.
pub async fn run_receipt(args: &ReceiptArgs) -> Result<u8> {
    let (image, mime_type) = read_image(&args.path, args.mime_type.as_deref())?;
    let client = crate::client()?;
    let analysis = client
        .vision()
        .analyze_receipt(&image, &mime_type)
        .await
        .context("Viga tšeki analüüsimisel.")?;

    match args.format {
        OutputFormat::Json => print_json(&analysis)?,
        OutputFormat::Text => print!("{}", render(&analysis)),
    }
    Ok(0)
}

/// Load an image as base64 together with its MIME type.
pub fn read_image(path: &Path, mime_type: Option<&str>) -> Result<(String, String)> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let mime_type = mime_type
        .map(str::to_string)
        .unwrap_or_else(|| guess_mime_type(path).to_string());
    Ok((general_purpose::STANDARD.encode(bytes), mime_type))
}

fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "image/jpeg",
    }
}

fn render(output: &ModelOutput<ReceiptAnalysis>) -> String {
    let r = &output.value;
    let mut out = format!(
        "Müüja: {}\nSumma: {:.2} €\nKuupäev: {}\nKategooria: {}\nKokkuvõte: {}\n",
        r.vendor, r.amount, r.date, r.category, r.summary
    );
    if output.is_placeholder() {
        out.push_str("(demoandmed, GEMINI_API_KEY puudub)\n");
    }
    out
}
