use bt_core::{Block, BlockList, BlockRef, ToolbarConfig};
use bt_engine::{ToolbarEngine, Viewport};
use std::cell::RefCell;
use std::rc::Rc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let blocks = Rc::new(RefCell::new(BlockList::from_blocks(vec![
        Block::paragraph("smoke test"),
        Block::paragraph("second block"),
    ])));
    let first = BlockRef::from(&blocks.borrow().blocks()[0]);
    let engine = ToolbarEngine::with_defaults(blocks, ToolbarConfig::default(), Viewport::default());
    engine.hover(first)?;
    engine.click_settings_toggler()?;
    println!("{}", serde_json::to_string_pretty(&engine.view())?);
    if let Some(settings) = engine.settings_view() {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    }
    Ok(())
}
