//! spreads - Print the spread plan of a paginated book view
//!
//! Reads a JSON page description (or synthesizes uniform pages), walks the
//! book spread by spread and prints, for each spread, the slot rectangles
//! and the draw operations that place each page.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bookfold_core::BookView;
use bookfold_core::cache::ResourceFactory;
use bookfold_core::document::{BoxKind, PageGeometry, StaticDocument, StaticPage};
use bookfold_core::geometry::{Matrix, Rect, Size};
use bookfold_core::layout::{
    Alignment, DrawOp, LayoutMargin, Orientation, PageTransform, RoundingPolicy, SpreadMode,
    ViewerParams,
};
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Rounding applied when fitting the spread frame and thumbnails.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Rounding {
    #[default]
    None,
    Down,
    Up,
    Nearest,
}

impl From<Rounding> for RoundingPolicy {
    fn from(value: Rounding) -> Self {
        match value {
            Rounding::None => RoundingPolicy::None,
            Rounding::Down => RoundingPolicy::Down,
            Rounding::Up => RoundingPolicy::Up,
            Rounding::Nearest => RoundingPolicy::Nearest,
        }
    }
}

/// Print the spread plan of a paginated book view.
#[derive(Parser, Debug)]
#[command(name = "spreads")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file describing the pages. Uniform pages are synthesized when
    /// omitted.
    file: Option<PathBuf>,

    /// Number of synthesized pages
    #[arg(short = 'n', long, default_value_t = 10)]
    pages: usize,

    /// Size of synthesized pages, as WIDTHxHEIGHT
    #[arg(long = "page-size", default_value = "612x792", value_parser = parse_size)]
    page_size: Size,

    /// Treat page 1 as a standalone cover
    #[arg(short = 'c', long, action = ArgAction::SetTrue)]
    cover: bool,

    /// Lay out two-page spreads
    #[arg(short = 'l', long, action = ArgAction::SetTrue)]
    landscape: bool,

    /// Only print the spread containing this page
    #[arg(short = 'f', long)]
    focus: Option<usize>,

    /// View size, as WIDTHxHEIGHT
    #[arg(long, default_value = "1024x768", value_parser = parse_size)]
    view: Size,

    /// Margin around the spread frame
    #[arg(short = 'm', long, default_value_t = 0.0)]
    margin: f64,

    /// Page box to display (media, crop, bleed, trim, art)
    #[arg(short = 'b', long = "box", default_value = "crop", value_parser = parse_box)]
    box_kind: BoxKind,

    /// Rounding policy for fitted sizes
    #[arg(short = 'r', long, value_enum, default_value_t = Rounding::None)]
    rounding: Rounding,

    /// Also plan thumbnails of this size, as WIDTHxHEIGHT
    #[arg(short = 't', long, value_parser = parse_size)]
    thumbnails: Option<Size>,

    /// Output file (stdout if "-")
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn parse_size(s: &str) -> std::result::Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width: f64 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let height: f64 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok(Size::new(width, height))
}

fn parse_box(s: &str) -> std::result::Result<BoxKind, String> {
    BoxKind::from_name(s).ok_or_else(|| format!("unknown page box {s:?}"))
}

/// One page of the input description. Boxes are `[x0, y0, x1, y1]`.
#[derive(Debug, Deserialize)]
struct PageDesc {
    media_box: [f64; 4],
    #[serde(default)]
    crop_box: Option<[f64; 4]>,
    #[serde(default)]
    bleed_box: Option<[f64; 4]>,
    #[serde(default)]
    trim_box: Option<[f64; 4]>,
    #[serde(default)]
    art_box: Option<[f64; 4]>,
    #[serde(default)]
    rotate: i32,
}

fn corners(b: [f64; 4]) -> Rect {
    Rect::from_corners(b[0], b[1], b[2], b[3])
}

impl PageDesc {
    fn into_page(self) -> StaticPage {
        let boxes = [
            (BoxKind::Crop, self.crop_box),
            (BoxKind::Bleed, self.bleed_box),
            (BoxKind::Trim, self.trim_box),
            (BoxKind::Art, self.art_box),
        ];
        boxes
            .into_iter()
            .filter_map(|(kind, b)| b.map(|b| (kind, corners(b))))
            .fold(StaticPage::new(corners(self.media_box)), |page, (kind, rect)| {
                page.with_box(kind, rect)
            })
            .with_rotation(self.rotate)
    }
}

/// Stand-in factory: the CLI only plans layout, it never rasterizes.
struct PlanOnly;

impl ResourceFactory for PlanOnly {
    type Resource = ();

    fn create(&self, _index: usize) -> bookfold_core::Result<()> {
        Ok(())
    }

    fn blank(&self) {}
}

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum OpOut {
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64 },
    Rotate { degrees: i32 },
    Clip { rect: [f64; 4] },
}

impl From<&DrawOp> for OpOut {
    fn from(op: &DrawOp) -> Self {
        match *op {
            DrawOp::Translate { x, y } => OpOut::Translate { x, y },
            DrawOp::Scale { x, y } => OpOut::Scale { x, y },
            DrawOp::Rotate { degrees } => OpOut::Rotate { degrees },
            DrawOp::Clip(rect) => OpOut::Clip {
                rect: rect_out(rect),
            },
        }
    }
}

#[derive(Serialize)]
struct TransformOut {
    ops: Vec<OpOut>,
    matrix: [f64; 6],
    clip: [f64; 4],
    device_clip: [f64; 4],
    scale: f64,
}

impl From<&PageTransform> for TransformOut {
    fn from(t: &PageTransform) -> Self {
        Self {
            ops: t.ops().iter().map(OpOut::from).collect(),
            matrix: matrix_out(t.matrix()),
            clip: rect_out(t.clip()),
            device_clip: rect_out(t.device_clip()),
            scale: t.scale(),
        }
    }
}

#[derive(Serialize)]
struct SlotOut {
    page: Option<usize>,
    alignment: Option<&'static str>,
    rect: [f64; 4],
    transform: Option<TransformOut>,
}

#[derive(Serialize)]
struct SpreadOut {
    mode: &'static str,
    slots: Vec<SlotOut>,
}

#[derive(Serialize)]
struct ThumbnailOut {
    page: usize,
    size: [f64; 2],
    transform: TransformOut,
}

#[derive(Serialize)]
struct PlanOut {
    page_count: usize,
    orientation: &'static str,
    spreads: Vec<SpreadOut>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    thumbnails: Vec<ThumbnailOut>,
}

fn rect_out(r: Rect) -> [f64; 4] {
    [r.min_x(), r.min_y(), r.width(), r.height()]
}

fn matrix_out(m: Matrix) -> [f64; 6] {
    [m.0, m.1, m.2, m.3, m.4, m.5]
}

fn alignment_name(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Center => "center",
        Alignment::Left => "left",
        Alignment::Right => "right",
    }
}

fn init_logging(debug: bool) {
    let fallback = if debug { "bookfold_core=debug,spreads=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_document(args: &Args) -> Result<StaticDocument> {
    let Some(path) = &args.file else {
        return Ok(StaticDocument::uniform(
            args.pages,
            args.page_size.width,
            args.page_size.height,
        ));
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let descs: Vec<PageDesc> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse page description {}", path.display()))?;
    Ok(StaticDocument::new(
        descs.into_iter().map(PageDesc::into_page).collect(),
    ))
}

fn spread_out(view: &BookView<StaticDocument, PlanOnly>, size: Size) -> SpreadOut {
    let mode = match view.spread().mode() {
        SpreadMode::Single => "single",
        SpreadMode::Double => "double",
    };
    let slots = view
        .layout(size)
        .into_iter()
        .map(|slot| SlotOut {
            page: slot.slot.page_index(),
            alignment: slot.slot.alignment().map(alignment_name),
            rect: rect_out(slot.rect),
            transform: slot.transform.as_ref().map(TransformOut::from),
        })
        .collect();
    SpreadOut { mode, slots }
}

fn plan(args: &Args) -> Result<PlanOut> {
    let document = load_document(args)?;
    let params = ViewerParams::default()
        .with_cover_page(args.cover)
        .with_box_kind(args.box_kind)
        .with_rounding(args.rounding.into())
        .with_margin(LayoutMargin::uniform(args.margin));

    let mut thumbnails = Vec::new();
    if let Some(target) = args.thumbnails {
        for (i, page) in document.pages().iter().enumerate() {
            let planned = PageGeometry::from_page(page, args.box_kind).and_then(|geometry| {
                PageTransform::thumbnail(&geometry, target, args.rounding.into())
            });
            match planned {
                Some(thumb) => thumbnails.push(ThumbnailOut {
                    page: i + 1,
                    size: [thumb.size.width, thumb.size.height],
                    transform: TransformOut::from(&thumb.transform),
                }),
                None => tracing::warn!(page = i + 1, "page has no drawable box"),
            }
        }
    }

    let mut view = BookView::new(document, PlanOnly, params)?;
    let orientation = if args.landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    view.set_orientation(orientation);

    let mut spreads = Vec::new();
    match args.focus {
        Some(focus) => {
            if !(1..=view.page_count()).contains(&focus) {
                bail!("focus page {focus} outside 1..={}", view.page_count());
            }
            view.show(focus);
            spreads.push(spread_out(&view, args.view));
        }
        None => {
            spreads.push(spread_out(&view, args.view));
            while view.next().is_some() {
                spreads.push(spread_out(&view, args.view));
            }
        }
    }

    Ok(PlanOut {
        page_count: view.page_count(),
        orientation: match orientation {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        },
        spreads,
        thumbnails,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let plan = plan(&args)?;
    tracing::debug!(spreads = plan.spreads.len(), "spread plan complete");

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = fs::File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    serde_json::to_writer_pretty(&mut output, &plan)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
