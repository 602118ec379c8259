use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use sha2::Digest as _;

/// Draw text labels onto an image at the anchors named in its `.properties` sidecar.
#[derive(Parser, Debug)]
#[command(name = "labelstamp", version)]
struct Cli {
    /// Input image; anchors are read from the `.properties` file next to it.
    input: PathBuf,

    /// Output path; the suffix selects the encoder.
    #[arg(short = 'o', long = "output-file", default_value = labelstamp::DEFAULT_OUTPUT)]
    output_file: PathBuf,

    /// Label text for an anchor, as NAME=TEXT. Repeatable; `\n` in TEXT starts a new line.
    #[arg(short = 'l', long = "label", value_name = "NAME=TEXT", value_parser = labelstamp::parse_label_arg)]
    labels: Vec<(String, String)>,

    /// Label every anchor with its own name; `-l` is ignored.
    #[arg(long)]
    test_labels: bool,

    /// Font size in points.
    #[arg(long, default_value_t = labelstamp::DEFAULT_FONT_SIZE, value_parser = parse_font_size)]
    font_size: f32,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print diagnostics about the embedded font (family name + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,

    /// Print the computed layout of every label as JSON on stdout.
    #[arg(long)]
    dump_layout: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let labels = if cli.test_labels {
        labelstamp::LabelSource::TestLabels
    } else {
        labelstamp::LabelSource::Explicit(cli.labels.into_iter().collect::<BTreeMap<_, _>>())
    };
    let job = labelstamp::StampJob {
        input: cli.input,
        output: cli.output_file,
        labels,
        font_size: cli.font_size,
        font_name: labelstamp::DEFAULT_FONT.to_string(),
    };

    if cli.dump_fonts {
        dump_font_diagnostics(&job)?;
    }

    let report = labelstamp::run(&job).inspect_err(|err| {
        tracing::error!(kind = ?err.kind(), "labeling failed");
    })?;

    if cli.dump_layout {
        let json =
            serde_json::to_string_pretty(&report.blocks).with_context(|| "serialize layout")?;
        println!("{json}");
    }

    eprintln!("wrote {}", report.output.display());
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn parse_font_size(raw: &str) -> Result<f32, String> {
    let size: f32 = raw
        .trim()
        .parse()
        .map_err(|err| format!("'{raw}' is not a number: {err}"))?;
    if !size.is_finite() || size <= 0.0 {
        return Err(format!("font size must be finite and > 0, got {raw}"));
    }
    Ok(size)
}

fn dump_font_diagnostics(job: &labelstamp::StampJob) -> anyhow::Result<()> {
    let mut engine = labelstamp::TextLayoutEngine::new();
    let font = engine
        .load_embedded_font(&job.font_name, job.font_size)
        .with_context(|| format!("load font '{}'", job.font_name))?;

    eprintln!("text font diagnostics:");
    eprintln!("  {}:", font.name());
    eprintln!("    family:      {}", font.family());
    eprintln!("    sha256:      {}", sha256_hex(font.bytes()));
    eprintln!("    size_px:     {}", font.size_px());
    eprintln!("    line_height: {}", font.line_height());
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
