use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::debug;

use crate::core::{
    Color, OhlcPoint, PriceScale, PriceScaleTuning, SeriesPoint, TimeScale, ValuePoint, Viewport,
    project_area_geometry, project_bars, project_candles, project_histogram_bars,
    project_line_segments,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ChartSurface, Screenshot, ScreenshotFormat, SeriesData, SeriesId, SeriesKind, SeriesStore,
    SeriesStyle, StoredSeries, SurfaceOptions, VOLUME_PRICE_SCALE,
};

const GRID_DIVISIONS: u32 = 4;
const VOLUME_BAND_RATIO: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub series_drawn: usize,
    pub primitives_drawn: usize,
}

/// Cairo + Pango surface that rasterizes its scene on demand.
///
/// Series bookkeeping is shared with the headless surface; the raster is only
/// produced when a screenshot is requested.
#[derive(Debug)]
pub struct CairoSurface {
    store: SeriesStore,
    last_stats: CairoRenderStats,
}

impl CairoSurface {
    pub fn new(viewport: Viewport) -> ChartResult<Self> {
        Ok(Self {
            store: SeriesStore::new(viewport)?,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Draws the current scene into an external cairo context, for example a
    /// GTK `DrawingArea` callback.
    pub fn render_on_cairo_context(&mut self, context: &Context) -> ChartResult<()> {
        let viewport = self.store.viewport();
        let options = self.store.options().cloned();
        let background = options
            .as_ref()
            .map_or(Color::rgb(1.0, 1.0, 1.0), |options| options.background);

        apply_color(context, background);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        if let Some(options) = &options {
            stats.primitives_drawn += draw_grid(context, viewport, options.grid)?;
        }

        let time_scale = self.store.time_scale();
        let price_scale = price_scale_for(&self.store)?;
        for (_, series) in self.store.iter() {
            let drawn = match (&series.data, price_scale) {
                (SeriesData::Volume(points), _) => {
                    let bars = project_histogram_bars(
                        points,
                        time_scale,
                        viewport,
                        bar_width(time_scale, viewport, series)?,
                        VOLUME_BAND_RATIO,
                    )?;
                    for bar in &bars {
                        apply_color(context, bar.color);
                        context.rectangle(
                            bar.x_left,
                            bar.y_top,
                            bar.x_right - bar.x_left,
                            bar.y_bottom - bar.y_top,
                        );
                        fill(context)?;
                    }
                    bars.len()
                }
                (SeriesData::Points(points), Some(price_scale)) => draw_price_series(
                    context,
                    series,
                    points,
                    time_scale,
                    price_scale,
                    viewport,
                )?,
                (SeriesData::Points(_), None) => 0,
            };
            stats.series_drawn += 1;
            stats.primitives_drawn += drawn;
        }

        if let Some(options) = &options {
            if let Some(watermark) = &options.watermark {
                let layout = pangocairo::functions::create_layout(context);
                let font_description =
                    FontDescription::from_string(&format!("Sans {}", options.font_size_px()));
                layout.set_font_description(Some(&font_description));
                layout.set_text(watermark);
                apply_color(context, options.text);
                context.move_to(8.0, 6.0);
                pangocairo::functions::show_layout(context, &layout);
                stats.primitives_drawn += 1;
            }
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl ChartSurface for CairoSurface {
    fn viewport(&self) -> Viewport {
        self.store.viewport()
    }

    fn apply_options(&mut self, options: &SurfaceOptions) -> ChartResult<()> {
        self.store.apply_options(options)
    }

    fn add_series(&mut self, kind: SeriesKind, style: &SeriesStyle) -> ChartResult<SeriesId> {
        self.store.add_series(kind, style)
    }

    fn remove_series(&mut self, id: SeriesId) -> ChartResult<()> {
        self.store.remove_series(id)
    }

    fn apply_series_style(&mut self, id: SeriesId, style: &SeriesStyle) -> ChartResult<()> {
        self.store.apply_series_style(id, style)
    }

    fn set_series_data(&mut self, id: SeriesId, data: SeriesData) -> ChartResult<()> {
        self.store.set_series_data(id, data)
    }

    fn fit_content(&mut self) {
        self.store.fit_content();
    }

    fn scroll_to_real_time(&mut self) {
        self.store.scroll_to_real_time();
    }

    fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.store.resize(viewport)
    }

    fn take_screenshot(&mut self) -> ChartResult<Screenshot> {
        let viewport = self.store.viewport();
        let width = i32::try_from(viewport.width)
            .map_err(|_| ChartError::Surface("surface width exceeds i32".to_owned()))?;
        let height = i32::try_from(viewport.height)
            .map_err(|_| ChartError::Surface("surface height exceeds i32".to_owned()))?;

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        {
            let context = Context::new(&surface)
                .map_err(|err| map_backend_error("failed to create cairo context", err))?;
            self.render_on_cairo_context(&context)?;
        }
        surface.flush();

        let mut bytes = Vec::new();
        surface
            .write_to_png(&mut bytes)
            .map_err(|err| ChartError::Surface(format!("failed to encode png: {err}")))?;
        debug!(
            width,
            height,
            png_len = bytes.len(),
            series_drawn = self.last_stats.series_drawn,
            "cairo screenshot captured"
        );
        Ok(Screenshot {
            viewport,
            format: ScreenshotFormat::Png,
            bytes,
        })
    }
}

fn draw_price_series(
    context: &Context,
    series: &StoredSeries,
    points: &[SeriesPoint],
    time_scale: TimeScale,
    price_scale: PriceScale,
    viewport: Viewport,
) -> ChartResult<usize> {
    let style = &series.style;
    match series.kind {
        SeriesKind::Candlestick => {
            let ohlc = ohlc_points(points);
            let width = bar_width(time_scale, viewport, series)?;
            let candles = project_candles(&ohlc, time_scale, price_scale, viewport, width)?;
            for candle in &candles {
                let color = if candle.is_bullish {
                    style.up_color
                } else {
                    style.down_color
                };
                apply_color(context, color);
                context.set_line_width(1.0);
                context.move_to(candle.center_x, candle.wick_top);
                context.line_to(candle.center_x, candle.wick_bottom);
                stroke(context)?;
                context.rectangle(
                    candle.body_left,
                    candle.body_top,
                    candle.body_right - candle.body_left,
                    (candle.body_bottom - candle.body_top).max(1.0),
                );
                fill(context)?;
            }
            Ok(candles.len())
        }
        SeriesKind::Bar => {
            let ohlc = ohlc_points(points);
            let width = bar_width(time_scale, viewport, series)?;
            let bars = project_bars(&ohlc, time_scale, price_scale, viewport, width)?;
            context.set_line_width(style.line_width);
            for bar in &bars {
                let color = if bar.is_bullish {
                    style.up_color
                } else {
                    style.down_color
                };
                apply_color(context, color);
                context.move_to(bar.center_x, bar.high_y);
                context.line_to(bar.center_x, bar.low_y);
                context.move_to(bar.open_x, bar.open_y);
                context.line_to(bar.center_x, bar.open_y);
                context.move_to(bar.center_x, bar.close_y);
                context.line_to(bar.close_x, bar.close_y);
                stroke(context)?;
            }
            Ok(bars.len())
        }
        SeriesKind::Line => {
            let values = value_points(points);
            let segments = project_line_segments(&values, time_scale, price_scale, viewport)?;
            apply_color(context, style.color);
            context.set_line_width(style.line_width);
            for segment in &segments {
                context.move_to(segment.x1, segment.y1);
                context.line_to(segment.x2, segment.y2);
            }
            stroke(context)?;
            Ok(segments.len())
        }
        SeriesKind::Area => {
            let values = value_points(points);
            let geometry = project_area_geometry(&values, time_scale, price_scale, viewport)?;
            if geometry.line_points.is_empty() {
                return Ok(0);
            }
            let gradient = cairo::LinearGradient::new(0.0, 0.0, 0.0, f64::from(viewport.height));
            gradient.add_color_stop_rgba(
                0.0,
                style.top_color.red,
                style.top_color.green,
                style.top_color.blue,
                style.top_color.alpha,
            );
            gradient.add_color_stop_rgba(
                1.0,
                style.bottom_color.red,
                style.bottom_color.green,
                style.bottom_color.blue,
                style.bottom_color.alpha,
            );
            for (index, vertex) in geometry.fill_polygon.iter().enumerate() {
                if index == 0 {
                    context.move_to(vertex.x, vertex.y);
                } else {
                    context.line_to(vertex.x, vertex.y);
                }
            }
            context.close_path();
            context
                .set_source(&gradient)
                .map_err(|err| map_backend_error("failed to set area gradient", err))?;
            fill(context)?;

            apply_color(context, style.color);
            context.set_line_width(style.line_width);
            for (index, vertex) in geometry.line_points.iter().enumerate() {
                if index == 0 {
                    context.move_to(vertex.x, vertex.y);
                } else {
                    context.line_to(vertex.x, vertex.y);
                }
            }
            stroke(context)?;
            Ok(geometry.line_points.len())
        }
        SeriesKind::Histogram => Ok(0),
    }
}

fn draw_grid(context: &Context, viewport: Viewport, color: Color) -> ChartResult<usize> {
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    apply_color(context, color);
    context.set_line_width(1.0);
    for step in 1..GRID_DIVISIONS {
        let ratio = f64::from(step) / f64::from(GRID_DIVISIONS);
        context.move_to(0.0, height * ratio);
        context.line_to(width, height * ratio);
        context.move_to(width * ratio, 0.0);
        context.line_to(width * ratio, height);
    }
    stroke(context)?;
    Ok(((GRID_DIVISIONS - 1) * 2) as usize)
}

/// Shared price scale of every non-volume series; `None` when nothing holds data.
fn price_scale_for(store: &SeriesStore) -> ChartResult<Option<PriceScale>> {
    let extents: Vec<(f64, f64)> = store
        .iter()
        .filter(|(_, series)| series.style.price_scale_id != VOLUME_PRICE_SCALE)
        .filter_map(|(_, series)| match &series.data {
            SeriesData::Points(points) => Some(points.iter().map(SeriesPoint::price_extent)),
            SeriesData::Volume(_) => None,
        })
        .flatten()
        .collect();
    if extents.is_empty() {
        return Ok(None);
    }
    PriceScale::from_extents(extents, PriceScaleTuning::default()).map(Some)
}

/// Bar width from the pixel distance between the first two samples.
fn bar_width(time_scale: TimeScale, viewport: Viewport, series: &StoredSeries) -> ChartResult<f64> {
    let mut times = series.data.times();
    let (Some(first), Some(second)) = (times.next(), times.next()) else {
        return Ok(6.0);
    };
    let spacing = time_scale.time_to_pixel(second as f64, viewport)?
        - time_scale.time_to_pixel(first as f64, viewport)?;
    Ok((spacing * 0.6).max(1.0))
}

fn ohlc_points(points: &[SeriesPoint]) -> Vec<OhlcPoint> {
    points.iter().filter_map(SeriesPoint::as_ohlc).collect()
}

fn value_points(points: &[SeriesPoint]) -> Vec<ValuePoint> {
    points.iter().filter_map(SeriesPoint::as_value).collect()
}

fn stroke(context: &Context) -> ChartResult<()> {
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke path", err))
}

fn fill(context: &Context) -> ChartResult<()> {
    context
        .fill()
        .map_err(|err| map_backend_error("failed to fill path", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Surface(format!("{prefix}: {err}"))
}
