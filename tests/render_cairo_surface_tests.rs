#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use chart_grid::api::{ChartInstance, ChartInstanceOptions};
use chart_grid::core::{Candle, ChartType, Viewport};
use chart_grid::render::{CairoSurface, ChartSurface, ScreenshotFormat};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn candles() -> Vec<Candle> {
    vec![
        Candle::new(60, 10.0, 14.0, 9.0, 13.0, 120.0).expect("candle"),
        Candle::new(120, 13.0, 15.0, 11.0, 11.5, 80.0).expect("candle"),
        Candle::new(180, 11.5, 12.0, 10.0, 11.8, 95.0).expect("candle"),
    ]
}

#[test]
fn cairo_surface_rejects_invalid_viewport() {
    assert!(CairoSurface::new(Viewport::new(0, 480)).is_err());
}

#[test]
fn chart_screenshot_is_a_png_of_the_viewport() {
    let surface = CairoSurface::new(Viewport::new(640, 360)).expect("surface");
    let mut chart = ChartInstance::new(
        surface,
        ChartInstanceOptions::new("EURUSD").with_size(640, 360).with_data(candles()),
    )
    .expect("chart");

    let shot = chart.take_screenshot().expect("screenshot");
    assert_eq!(shot.format, ScreenshotFormat::Png);
    assert_eq!(shot.viewport, Viewport::new(640, 360));
    assert_eq!(&shot.bytes[..8], &PNG_MAGIC);

    let stats = chart.chart().last_stats();
    assert_eq!(stats.series_drawn, 2);
    assert!(stats.primitives_drawn >= 6);
}

#[test]
fn every_chart_type_rasterizes() {
    let surface = CairoSurface::new(Viewport::new(320, 200)).expect("surface");
    let mut chart = ChartInstance::new(
        surface,
        ChartInstanceOptions::new("XAUUSD")
            .with_size(320, 200)
            .with_volume(false)
            .with_data(candles()),
    )
    .expect("chart");

    for chart_type in ChartType::ALL {
        chart.set_chart_type(chart_type).expect("switch");
        let shot = chart.take_screenshot().expect("screenshot");
        assert_eq!(&shot.bytes[..8], &PNG_MAGIC);
        assert_eq!(chart.chart().last_stats().series_drawn, 1);
    }
}

#[test]
fn cairo_surface_draws_on_external_context() {
    let surface = CairoSurface::new(Viewport::new(300, 160)).expect("surface");
    let chart = ChartInstance::new(
        surface,
        ChartInstanceOptions::new("GBPUSD").with_size(300, 160).with_data(candles()),
    )
    .expect("chart");
    let mut surface = chart.into_surface();
    assert_eq!(surface.viewport(), Viewport::new(300, 160));
    assert_eq!(surface.backend_name(), "cairo+pango+pangocairo");

    let image = ImageSurface::create(Format::ARgb32, 300, 160).expect("image");
    let context = Context::new(&image).expect("context");
    surface.render_on_cairo_context(&context).expect("render");
    assert!(surface.last_stats().primitives_drawn > 0);
}
