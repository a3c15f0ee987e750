use chart_grid::api::{
    FullscreenHost, GridConfig, LayoutGrid, LayoutId, LayoutShape, NotificationLevel,
    RecordingNotifier, SavedInstance, SavedLayout,
};
use chart_grid::core::{InstanceId, Timeframe};
use chart_grid::{ChartError, ChartResult};
use chrono::{TimeZone, Utc};

fn grid() -> LayoutGrid {
    LayoutGrid::new(GridConfig::default()).expect("grid")
}

fn assignments(grid: &LayoutGrid) -> Vec<(String, Timeframe)> {
    grid.instances()
        .iter()
        .map(|i| (i.symbol().to_owned(), i.timeframe()))
        .collect()
}

#[test]
fn grid_starts_with_one_default_instance() {
    let grid = grid();
    assert_eq!(grid.shape().id, LayoutId::Single);
    assert_eq!(assignments(&grid), vec![("EURUSD".to_owned(), Timeframe::H1)]);
    assert_eq!(grid.active_instance(), InstanceId(1));
}

#[test]
fn growing_to_quad_preserves_first_and_fills_from_pool_then_saves() {
    let mut grid = grid();
    let change = grid.set_layout(LayoutId::Quad);
    assert_eq!(change.added, vec![InstanceId(2), InstanceId(3), InstanceId(4)]);
    assert!(change.removed.is_empty());

    assert_eq!(
        assignments(&grid),
        vec![
            ("EURUSD".to_owned(), Timeframe::H1),
            ("GBPUSD".to_owned(), Timeframe::H1),
            ("USDJPY".to_owned(), Timeframe::H1),
            ("XAUUSD".to_owned(), Timeframe::H1),
        ]
    );

    let saved = grid.save_layout("My Layout").expect("save");
    let record = saved.to_record();
    assert_eq!(record.layout, "2x2");
    assert_eq!(record.charts.len(), 4);
    for (chart, (symbol, timeframe)) in record.charts.iter().zip(assignments(&grid)) {
        assert_eq!(chart.symbol, symbol);
        assert_eq!(chart.timeframe, timeframe.to_string());
    }
    assert_eq!(record.charts[0].timeframe, "60");
}

#[test]
fn shrinking_truncates_from_the_end_and_moves_active_to_first() {
    let mut grid = grid();
    grid.set_layout(LayoutId::Quad);
    grid.set_symbol(InstanceId(2), "BTCUSD").expect("symbol");
    grid.set_active_instance(InstanceId(4)).expect("active");

    let change = grid.set_layout(LayoutId::OneByTwo);
    assert_eq!(change.removed, vec![InstanceId(3), InstanceId(4)]);
    assert_eq!(grid.instances().len(), 2);
    assert_eq!(grid.instances()[1].symbol(), "BTCUSD");
    assert_eq!(grid.active_instance(), InstanceId(1));
}

#[test]
fn regrown_cells_get_fresh_ids() {
    let mut grid = grid();
    grid.set_layout(LayoutId::OneByTwo);
    grid.set_layout(LayoutId::Single);
    let change = grid.set_layout(LayoutId::OneByThree);
    assert_eq!(change.added, vec![InstanceId(3), InstanceId(4)]);
    assert!(grid.instance(InstanceId(2)).is_none());
}

#[test]
fn pool_wraps_around_for_large_layouts() {
    let config = GridConfig::default().with_default_symbols(["AAA", "BBB"]);
    let mut grid = LayoutGrid::new(config).expect("grid");
    grid.set_layout(LayoutId::ThreeByOne);
    let symbols: Vec<&str> = grid.instances().iter().map(|i| i.symbol()).collect();
    assert_eq!(symbols, vec!["AAA", "BBB", "AAA"]);
}

#[test]
fn unknown_instances_are_rejected() {
    let mut grid = grid();
    let err = grid.set_symbol(InstanceId(9), "EURUSD").expect_err("unknown");
    assert!(matches!(err, ChartError::UnknownInstance { id } if id == InstanceId(9)));
    assert!(grid.set_timeframe(InstanceId(9), Timeframe::M5).is_err());
    assert!(grid.set_active_instance(InstanceId(9)).is_err());
    assert!(matches!(
        grid.set_symbol(InstanceId(1), "   "),
        Err(ChartError::InvalidData(_))
    ));
}

#[test]
fn quick_symbol_targets_active_instance() {
    let mut grid = grid();
    grid.set_layout(LayoutId::TwoByOne);
    grid.set_active_instance(InstanceId(2)).expect("active");
    let id = grid.apply_quick_symbol("ETHUSD").expect("quick symbol");
    assert_eq!(id, InstanceId(2));
    assert_eq!(grid.instances()[1].symbol(), "ETHUSD");
    assert_eq!(grid.instances()[0].symbol(), "EURUSD");
}

#[test]
fn blank_layout_names_are_rejected_and_names_trimmed() {
    let grid = grid();
    assert!(matches!(grid.save_layout("   "), Err(ChartError::EmptyLayoutName)));
    let saved = grid.save_layout("  Morning  ").expect("save");
    assert_eq!(saved.name, "Morning");
}

#[test]
fn saved_layout_is_an_independent_snapshot() {
    let mut grid = grid();
    grid.set_layout(LayoutId::OneByTwo);
    let saved = grid.save_layout("Pair").expect("save");

    grid.set_symbol(InstanceId(1), "BTCUSD").expect("mutate");
    grid.set_layout(LayoutId::Single);
    assert_eq!(saved.instances[0].symbol, "EURUSD");

    let change = grid.load_layout(&saved);
    assert_eq!(change.added, vec![InstanceId(1), InstanceId(2)]);
    assert_eq!(grid.shape(), LayoutShape::from_id(LayoutId::OneByTwo));
    assert_eq!(
        assignments(&grid),
        vec![
            ("EURUSD".to_owned(), Timeframe::H1),
            ("GBPUSD".to_owned(), Timeframe::H1),
        ]
    );
    assert_eq!(grid.active_instance(), InstanceId(1));
}

#[test]
fn load_normalizes_mismatched_instance_counts() {
    let mut grid = grid();
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single().expect("time");
    let short = SavedLayout {
        name: "Short".to_owned(),
        layout: LayoutId::OneByThree,
        instances: vec![SavedInstance {
            symbol: "NAS100".to_owned(),
            timeframe: Timeframe::M5,
        }],
        created_at,
    };
    grid.load_layout(&short);
    assert_eq!(grid.instances().len(), 3);
    assert_eq!(grid.instances()[0].symbol(), "NAS100");
    assert_eq!(grid.instances()[1].symbol(), "GBPUSD");

    let mut padded = SavedLayout {
        layout: LayoutId::Single,
        ..short
    };
    padded.instances.push(SavedInstance {
        symbol: "SPX".to_owned(),
        timeframe: Timeframe::D1,
    });
    grid.load_layout(&padded);
    assert_eq!(grid.instances().len(), 1);
    assert_eq!(grid.instances()[0].symbol(), "NAS100");
}

struct FakeWindow {
    fullscreen: bool,
    fail: bool,
}

impl FullscreenHost for FakeWindow {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn enter_fullscreen(&mut self) -> ChartResult<()> {
        if self.fail {
            return Err(ChartError::Unsupported("no fullscreen".to_owned()));
        }
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> ChartResult<()> {
        self.fullscreen = false;
        Ok(())
    }
}

#[test]
fn fullscreen_toggles_and_reports_failures_through_notifier() {
    let grid = grid();
    let notifier = RecordingNotifier::new();
    let mut window = FakeWindow {
        fullscreen: false,
        fail: false,
    };

    assert!(grid.toggle_fullscreen(&mut window, &notifier));
    assert!(!grid.toggle_fullscreen(&mut window, &notifier));
    assert!(notifier.notifications().is_empty());

    window.fail = true;
    assert!(!grid.toggle_fullscreen(&mut window, &notifier));
    let notes = notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

#[test]
fn grid_config_parses_from_json() {
    let config = GridConfig::from_json_str(
        r#"{ "default_symbols": ["BTCUSD"], "default_timeframe": "240", "theme": "light" }"#,
    )
    .expect("config");
    assert_eq!(config.default_timeframe, Timeframe::H4);
    assert_eq!(config.width, GridConfig::default().width);
    assert!(GridConfig::from_json_str(r#"{ "default_symbols": [] }"#).is_err());
}
