#[cfg(feature = "cairo-backend")]
use chart_grid::{ChartError, ChartResult};
#[cfg(feature = "cairo-backend")]
use chart_grid::api::{ChartWorkspace, GridConfig, JsonFileLayoutStore, LayoutStore};
#[cfg(feature = "cairo-backend")]
use chart_grid::core::{Candle, ChartTheme, InstanceId, Timeframe, Viewport};
#[cfg(feature = "cairo-backend")]
use chart_grid::render::CairoSurface;
#[cfg(feature = "cairo-backend")]
use std::fs;
#[cfg(feature = "cairo-backend")]
use std::path::PathBuf;

#[cfg(feature = "cairo-backend")]
const DEFAULT_OUTPUT_ROOT: &str = "target/layout_pngs";

#[cfg(feature = "cairo-backend")]
#[derive(Debug)]
struct CliArgs {
    layouts_path: PathBuf,
    layout_name: String,
    candles_dir: PathBuf,
    output_root: PathBuf,
    theme: ChartTheme,
}

#[cfg(feature = "cairo-backend")]
fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cairo-backend"))]
fn main() {
    eprintln!("this tool requires feature `cairo-backend`");
    std::process::exit(1);
}

#[cfg(feature = "cairo-backend")]
fn run() -> Result<(), String> {
    let _ = chart_grid::telemetry::init_default_tracing();
    let args = parse_args()?;

    let store = JsonFileLayoutStore::new(&args.layouts_path);
    let saved = store
        .load(&args.layout_name)
        .map_err(|err| format!("failed to read layouts: {err}"))?
        .ok_or_else(|| {
            format!(
                "layout `{}` not found in `{}`",
                args.layout_name,
                args.layouts_path.display()
            )
        })?;

    let candles_dir = args.candles_dir.clone();
    let market_data = move |symbol: &str, timeframe: Timeframe| -> ChartResult<Vec<Candle>> {
        let path = candles_dir.join(format!("{symbol}_{timeframe}.json"));
        let raw = fs::read_to_string(&path).map_err(|err| {
            ChartError::InvalidData(format!("failed to read `{}`: {err}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|err| {
            ChartError::InvalidData(format!("failed to parse `{}`: {err}", path.display()))
        })
    };
    let factory = |_id: InstanceId, viewport: Viewport| CairoSurface::new(viewport);

    let config = GridConfig::default().with_theme(args.theme);
    let mut workspace = ChartWorkspace::new(config, factory, market_data)
        .map_err(|err| format!("workspace init failed: {err}"))?;
    workspace
        .load_layout(&saved)
        .map_err(|err| format!("layout `{}` load failed: {err}", saved.name))?;

    fs::create_dir_all(&args.output_root).map_err(|err| {
        format!(
            "failed to create output dir `{}`: {err}",
            args.output_root.display()
        )
    })?;

    let slug: String = saved
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let mut written = 0usize;
    for (id, capture) in workspace.take_screenshots() {
        let screenshot = capture.map_err(|err| format!("chart {id} capture failed: {err}"))?;
        let output_path = args.output_root.join(format!("{slug}_{id}.png"));
        fs::write(&output_path, &screenshot.bytes)
            .map_err(|err| format!("failed to write png `{}`: {err}", output_path.display()))?;
        written += 1;
        println!("chart {id} -> {}", output_path.display());
    }

    println!(
        "done: rendered {written} chart(s) of layout `{}` ({})",
        saved.name, saved.layout
    );
    Ok(())
}

#[cfg(feature = "cairo-backend")]
fn parse_args() -> Result<CliArgs, String> {
    let mut layouts_path: Option<PathBuf> = None;
    let mut layout_name: Option<String> = None;
    let mut candles_dir: Option<PathBuf> = None;
    let mut output_root = PathBuf::from(DEFAULT_OUTPUT_ROOT);
    let mut theme = ChartTheme::Dark;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--layouts" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --layouts".to_owned())?;
                layouts_path = Some(PathBuf::from(value));
            }
            "--name" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --name".to_owned())?;
                layout_name = Some(value);
            }
            "--candles-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --candles-dir".to_owned())?;
                candles_dir = Some(PathBuf::from(value));
            }
            "--output-root" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output-root".to_owned())?;
                output_root = PathBuf::from(value);
            }
            "--light" => theme = ChartTheme::Light,
            "--help" | "-h" => {
                println!("{}", usage_message());
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    let missing = |flag: &str| format!("missing required {flag}\n\n{}", usage_message());
    Ok(CliArgs {
        layouts_path: layouts_path.ok_or_else(|| missing("--layouts"))?,
        layout_name: layout_name.ok_or_else(|| missing("--name"))?,
        candles_dir: candles_dir.ok_or_else(|| missing("--candles-dir"))?,
        output_root,
        theme,
    })
}

#[cfg(feature = "cairo-backend")]
fn usage_message() -> String {
    format!(
        "Usage: cargo run --features cairo-backend --bin render_saved_layout -- [options]\n\nOptions:\n  --layouts <path>       Saved layouts JSON file\n  --name <layout>        Layout to render\n  --candles-dir <path>   Directory of <SYMBOL>_<timeframe>.json candle arrays\n  --output-root <path>   Output directory (default: {DEFAULT_OUTPUT_ROOT})\n  --light                Use the light theme\n  -h, --help             Show this message"
    )
}
