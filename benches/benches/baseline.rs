use bt_core::{
    export_json_into, Block, BlockList, BlockRef, BlockSequence, EditorEvent, EventBus, Channel, SequenceCommand,
    ToolbarConfig,
};
use bt_engine::{MoveDownTune, MoveUpTune, ToolbarEngine, Viewport};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::cell::RefCell;
use std::rc::Rc;

fn build_list(blocks: usize) -> Rc<RefCell<BlockList>> {
    let blocks = (0..blocks)
        .map(|i| Block::paragraph(&format!("block {} with some text", i)).with_height(24.0 + (i % 5) as f32 * 8.0))
        .collect();
    Rc::new(RefCell::new(BlockList::from_blocks(blocks)))
}

fn refs(list: &Rc<RefCell<BlockList>>) -> Vec<BlockRef> {
    list.borrow().blocks().iter().map(BlockRef::from).collect()
}

fn hover_storm(c: &mut Criterion) {
    let list = build_list(1_000);
    let targets = refs(&list);
    let engine = ToolbarEngine::with_defaults(list, ToolbarConfig::default(), Viewport::default());
    c.bench_function("hover_storm_1000", |b| {
        b.iter(|| {
            for target in &targets {
                engine.hover(*target).unwrap();
            }
        })
    });
}

fn bus_fanout(c: &mut Criterion) {
    let bus: EventBus<EditorEvent> = EventBus::new();
    for _ in 0..32 {
        bus.on(Channel::BlockHovered, |_| Ok(()));
    }
    let event = EditorEvent::BlockHovered {
        block: BlockRef { id: uuid::Uuid::new_v4() },
    };
    c.bench_function("bus_fanout_32", |b| b.iter(|| bus.emit(&event).unwrap()));
}

fn tune_cycle(c: &mut Criterion) {
    c.bench_function("move_down_up_cycle", |b| {
        b.iter_batched(
            || {
                let list = build_list(200);
                let first = refs(&list)[100];
                let engine = ToolbarEngine::with_defaults(list, ToolbarConfig::default(), Viewport::default());
                engine.hover(first).unwrap();
                engine.click_settings_toggler().unwrap();
                engine
            },
            |engine| {
                for _ in 0..10 {
                    engine.activate_tune(MoveDownTune::NAME).unwrap();
                    engine.activate_tune(MoveUpTune::NAME).unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn sequence_moves(c: &mut Criterion) {
    c.bench_function("sequence_move_10k", |b| {
        b.iter_batched(
            || build_list(10_000),
            |list| {
                let mut list = list.borrow_mut();
                for i in 0..100 {
                    list.execute(SequenceCommand::Move { to: i * 50, from: i * 50 + 49 }).unwrap();
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn read_only_cycle(c: &mut Criterion) {
    let list = build_list(200);
    let mut engine = ToolbarEngine::with_defaults(list, ToolbarConfig::default(), Viewport::default());
    c.bench_function("read_only_toggle_rebuild", |b| {
        b.iter(|| {
            engine.set_read_only(true, std::time::Duration::ZERO);
            engine.set_read_only(false, std::time::Duration::ZERO);
            engine.on_idle()
        })
    });
}

fn serialize_json(c: &mut Criterion) {
    let list = build_list(2_000);
    let list = list.borrow();
    let mut buf = Vec::with_capacity(64 * 1024);
    c.bench_function("serialize_json", |b| {
        b.iter(|| {
            export_json_into(&list.doc, &mut buf).unwrap();
        })
    });
}

criterion_group!(benches, hover_storm, bus_fanout, tune_cycle, sequence_moves, read_only_cycle, serialize_json);
criterion_main!(benches);
