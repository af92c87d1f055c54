//! Command-line front end: segment a saved chat page and write the
//! composed capture as a PNG.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use scraper::Html;
use serde::Serialize;

use chatshot::adapter::{self, SiteAdapter};
use chatshot::rendering::detect_background;
use chatshot::{
    capture, segment, CancelToken, CaptureConfig, CaptureMode, CaptureOutcome, CaptureSession,
    TextRasterizer,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Horizontal,
    Vertical,
}

impl From<Mode> for CaptureMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Horizontal => CaptureMode::Horizontal,
            Mode::Vertical => CaptureMode::Vertical,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "chatshot", about = "Capture chat responses from a saved HTML page")]
struct Args {
    /// Saved HTML page to capture from
    input: PathBuf,

    /// Host used to pick the site adapter (e.g. chat.deepseek.com)
    #[arg(long)]
    site: Option<String>,

    /// Which response to capture (0-based); defaults to the latest
    #[arg(long)]
    response: Option<usize>,

    /// Stitching mode
    #[arg(long, value_enum, default_value_t = Mode::Horizontal)]
    mode: Mode,

    /// Comma-separated block indices to capture (defaults to all)
    #[arg(long)]
    blocks: Option<String>,

    /// List detected blocks as JSON and exit
    #[arg(long)]
    list: bool,

    /// Output path; defaults to the suggested filename in the current dir
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct BlockSummary {
    index: usize,
    kind: String,
    elements: usize,
    is_heading: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let html = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let doc = Html::parse_document(&html);

    let site: &dyn SiteAdapter = adapter::adapter_for_host(args.site.as_deref().unwrap_or(""));
    let responses = site.responses(&doc);
    if responses.is_empty() {
        bail!("no {} responses found in {}", site.name(), args.input.display());
    }
    let index = match args.response {
        Some(i) if i < responses.len() => i,
        Some(i) => bail!("response index {} out of range (found {})", i, responses.len()),
        None => responses.len() - 1,
    };
    let response = responses[index];
    log::info!(
        "capturing response {} ({})",
        index,
        site.title_of(response, index)
    );

    let blocks = segment::segment(site, response);
    if args.list {
        let summary: Vec<BlockSummary> = blocks
            .iter()
            .enumerate()
            .map(|(index, b)| BlockSummary {
                index,
                kind: format!("{:?}", b.kind),
                elements: b.elements.len(),
                is_heading: b.is_heading,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut session = CaptureSession::new(blocks, args.mode.into())?;
    if let Some(spec) = &args.blocks {
        session.select_none();
        for part in spec.split(',') {
            let i: usize = part
                .trim()
                .parse()
                .with_context(|| format!("bad block index {:?}", part))?;
            if i >= session.blocks().len() {
                bail!("block index {} out of range (found {})", i, session.blocks().len());
            }
            session.toggle_selection(i);
        }
    }

    let cfg = CaptureConfig::default();
    let mut rasterizer = TextRasterizer::new(detect_background(&doc));
    let outcome = capture::run_capture(
        &doc,
        &session,
        site.name(),
        &mut rasterizer,
        &cfg,
        &CancelToken::new(),
    )?;

    match outcome {
        CaptureOutcome::Image(composite) => {
            let path = args.out.unwrap_or_else(|| PathBuf::from(&composite.filename));
            composite
                .image
                .save(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        CaptureOutcome::NothingSelected => bail!("no blocks selected"),
        CaptureOutcome::Cancelled => bail!("capture cancelled"),
    }
    Ok(())
}
