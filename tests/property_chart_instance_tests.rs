use chart_grid::api::{ChartInstance, ChartInstanceOptions};
use chart_grid::core::{Candle, ChartType, Viewport, format_series};
use chart_grid::render::{HeadlessSurface, SeriesData, SeriesKind};
use proptest::prelude::*;

fn chart_type() -> impl Strategy<Value = ChartType> {
    prop::sample::select(ChartType::ALL.to_vec())
}

fn candles() -> impl Strategy<Value = Vec<Candle>> {
    proptest::collection::vec((0i64..5_000, 1.0f64..100.0, 0.0f64..5.0), 0..32).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(time, low, range)| {
                    Candle::new(time, low, low + range, low, low + range * 0.5, range)
                        .expect("generated candle")
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn last_chart_type_switch_renders_last_data(
        initial in candles(),
        last_data in candles(),
        switches in proptest::collection::vec(chart_type(), 1..8),
        set_data_after in 0usize..8,
    ) {
        let surface = HeadlessSurface::new(Viewport::new(300, 200)).expect("surface");
        let mut chart = ChartInstance::new(
            surface,
            ChartInstanceOptions::new("EURUSD").with_data(initial),
        )
        .expect("chart");

        let data_index = set_data_after.min(switches.len());
        for (index, chart_type) in switches.iter().enumerate() {
            if index == data_index {
                chart.set_data(last_data.clone()).expect("set data");
            }
            chart.set_chart_type(*chart_type).expect("switch");
        }
        if data_index == switches.len() {
            chart.set_data(last_data.clone()).expect("set data");
        }

        let final_type = *switches.last().expect("non-empty");
        let store = chart.chart().store();
        let main = store.series(chart.series().main).expect("main series");
        prop_assert_eq!(main.kind, SeriesKind::from(final_type));
        let expected = format_series(chart.candles(), final_type);
        prop_assert_eq!(&main.data, &SeriesData::Points(expected));
        // Main plus volume: switches never leak series.
        prop_assert_eq!(store.series_count(), 2);
    }
}
