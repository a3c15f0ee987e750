use chart_grid::api::{GridConfig, LayoutGrid, LayoutId, LayoutShape};
use chart_grid::core::{InstanceId, Timeframe};
use proptest::prelude::*;

fn layout_id() -> impl Strategy<Value = LayoutId> {
    prop::sample::select(LayoutId::ALL.to_vec())
}

fn timeframe() -> impl Strategy<Value = Timeframe> {
    prop::sample::select(vec![
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
        Timeframe::W1,
    ])
}

#[derive(Debug, Clone)]
enum Mutation {
    Layout(LayoutId),
    Symbol(usize, String),
    Timeframe(usize, Timeframe),
}

fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        layout_id().prop_map(Mutation::Layout),
        (0usize..4, "[A-Z]{3,6}").prop_map(|(index, symbol)| Mutation::Symbol(index, symbol)),
        (0usize..4, timeframe()).prop_map(|(index, tf)| Mutation::Timeframe(index, tf)),
    ]
}

fn apply(grid: &mut LayoutGrid, mutation: &Mutation) {
    match mutation {
        Mutation::Layout(id) => {
            grid.set_layout(*id);
        }
        Mutation::Symbol(index, symbol) => {
            let id = grid.instances()[index % grid.instances().len()].id();
            grid.set_symbol(id, symbol).expect("symbol");
        }
        Mutation::Timeframe(index, timeframe) => {
            let id = grid.instances()[index % grid.instances().len()].id();
            grid.set_timeframe(id, *timeframe).expect("timeframe");
        }
    }
}

fn assignments(grid: &LayoutGrid) -> Vec<(String, Timeframe)> {
    grid.instances()
        .iter()
        .map(|i| (i.symbol().to_owned(), i.timeframe()))
        .collect()
}

proptest! {
    #[test]
    fn set_layout_keeps_cell_count_and_prefix(
        setup in proptest::collection::vec(mutation(), 0..12),
        target in layout_id(),
    ) {
        let mut grid = LayoutGrid::new(GridConfig::default()).expect("grid");
        for step in &setup {
            apply(&mut grid, step);
        }
        let before = assignments(&grid);
        let before_ids: Vec<InstanceId> = grid.instances().iter().map(|i| i.id()).collect();

        grid.set_layout(target);

        let k = LayoutShape::from_id(target).instance_count();
        prop_assert_eq!(grid.instances().len(), k);
        let kept = k.min(before.len());
        prop_assert_eq!(&assignments(&grid)[..kept], &before[..kept]);
        let after_ids: Vec<InstanceId> = grid.instances().iter().map(|i| i.id()).collect();
        prop_assert_eq!(&after_ids[..kept], &before_ids[..kept]);
        prop_assert!(grid.instance(grid.active_instance()).is_some());
    }

    #[test]
    fn save_then_load_round_trips_despite_later_mutations(
        setup in proptest::collection::vec(mutation(), 0..12),
        later in proptest::collection::vec(mutation(), 0..12),
    ) {
        let mut grid = LayoutGrid::new(GridConfig::default()).expect("grid");
        for step in &setup {
            apply(&mut grid, step);
        }
        let shape = grid.shape();
        let expected = assignments(&grid);
        let saved = grid.save_layout("snapshot").expect("save");

        for step in &later {
            apply(&mut grid, step);
        }
        grid.load_layout(&saved);

        prop_assert_eq!(grid.shape(), shape);
        prop_assert_eq!(assignments(&grid), expected);
        prop_assert_eq!(grid.active_instance(), InstanceId(1));
    }
}
