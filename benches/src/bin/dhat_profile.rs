use bt_core::{Block, BlockList, BlockRef, ToolbarConfig};
use bt_engine::{MoveDownTune, ToolbarEngine, Viewport};
use std::cell::RefCell;
use std::rc::Rc;

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() {
    let _profiler = dhat::Profiler::new_heap();
    let blocks = (0..2000)
        .map(|i| Block::paragraph(&format!("block {}: {}", i, "text ".repeat(10))))
        .collect();
    let list = Rc::new(RefCell::new(BlockList::from_blocks(blocks)));
    let refs: Vec<BlockRef> = list.borrow().blocks().iter().map(BlockRef::from).collect();
    let engine = ToolbarEngine::with_defaults(list.clone(), ToolbarConfig::default(), Viewport::default());

    for target in &refs {
        let _ = engine.hover(*target);
    }
    for target in refs.iter().take(200) {
        engine.close();
        let _ = engine.hover(*target);
        let _ = engine.click_settings_toggler();
        let _ = engine.activate_tune(MoveDownTune::NAME);
    }
    let _ = serde_json::to_string(&list.borrow().doc).unwrap();
}
