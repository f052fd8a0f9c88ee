use bt_core::{Block, BlockList, BlockRef, BlockSequence, Channel, SequenceCommand, ToolbarConfig};
use bt_engine::{
    markers, settings_toggler_visible, PopoverKind, Toolbar, ToolbarEngine, ToolbarPhase, TuneActivation, Viewport,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

fn session(blocks: Vec<Block>, viewport: Viewport) -> (Rc<RefCell<BlockList>>, ToolbarEngine) {
    let list = Rc::new(RefCell::new(BlockList::from_blocks(blocks)));
    let engine = ToolbarEngine::with_defaults(list.clone(), ToolbarConfig::default(), viewport);
    (list, engine)
}

fn block_ref(list: &Rc<RefCell<BlockList>>, index: usize) -> BlockRef {
    BlockRef::from(&list.borrow().blocks()[index])
}

#[test]
fn desktop_offset_aligns_with_first_line() {
    let (list, engine) = session(
        vec![
            Block::paragraph("A").with_height(120.0),
            Block::paragraph("B").with_height(40.0).with_padding_top(8.0),
        ],
        Viewport::desktop(1024.0, 768.0),
    );
    engine.hover(block_ref(&list, 1)).unwrap();
    let state = engine.state();
    assert_eq!(state.vertical_offset, Some(128));
    assert_eq!(state.phase, ToolbarPhase::OpenWithActions);
    assert_eq!(engine.view().top, Some(128));
}

#[test]
fn mobile_offset_sits_below_block() {
    let (list, engine) = session(
        vec![
            Block::paragraph("A").with_height(120.0),
            Block::paragraph("B").with_height(40.0).with_padding_top(8.0),
        ],
        Viewport::mobile(390.0, 844.0),
    );
    let b = block_ref(&list, 1);
    // Touch layouts do not listen for hover at all.
    assert_eq!(engine.hover(b).unwrap(), 0);
    assert!(!engine.state().opened());

    assert!(engine.move_and_open(Some(b.id)).unwrap());
    assert_eq!(engine.state().vertical_offset, Some(160));
}

#[test]
fn narrow_pointer_viewport_counts_as_mobile() {
    let (list, engine) = session(
        vec![Block::paragraph("A").with_height(120.0)],
        Viewport::desktop(600.0, 800.0),
    );
    assert!(engine.is_mobile());
    assert_eq!(engine.bus().subscriber_count(Channel::BlockHovered), 0);
    engine.focus_block(0).unwrap();
    assert_eq!(engine.state().vertical_offset, Some(120));
    assert_eq!(engine.hovered(), Some(block_ref(&list, 0).id));
}

#[test]
fn toggler_visibility_rule() {
    for len in 0..=2 {
        for empty in [true, false] {
            let expected = !(len == 1 && empty);
            assert_eq!(settings_toggler_visible(len, empty), expected, "len {} empty {}", len, empty);
        }
    }
}

#[test]
fn lone_empty_block_hides_toggler_until_second_block() {
    let (list, engine) = session(vec![Block::paragraph("")], Viewport::default());
    let a = block_ref(&list, 0);
    engine.hover(a).unwrap();
    assert!(!engine.state().settings_toggler_visible);
    assert!(engine.view().settings_toggler.contains(&markers::SETTINGS_TOGGLER_HIDDEN));

    list.borrow_mut()
        .execute(SequenceCommand::Insert { index: 1, block: Block::paragraph("B") })
        .unwrap();
    engine.hover(a).unwrap();
    assert!(engine.state().settings_toggler_visible);
    assert!(engine.view().settings_toggler.is_empty());
}

#[test]
fn lone_block_with_content_shows_toggler() {
    let (list, engine) = session(vec![Block::paragraph("text")], Viewport::default());
    engine.hover(block_ref(&list, 0)).unwrap();
    assert!(engine.state().settings_toggler_visible);
}

#[test]
fn close_resets_offset_and_hovered_block() {
    let (list, engine) = session(vec![Block::paragraph("A"), Block::paragraph("B")], Viewport::default());
    engine.hover(block_ref(&list, 1)).unwrap();
    assert!(engine.state().vertical_offset.is_some());

    engine.close();
    let state = engine.state();
    assert_eq!(state.vertical_offset, None);
    assert_eq!(state.phase, ToolbarPhase::Closed);
    assert!(!state.actions_visible());
    assert_eq!(engine.hovered(), None);
    assert_eq!(engine.view().root, vec![markers::TOOLBAR]);
}

#[test]
fn open_state_follows_latest_hover_or_close() {
    let (list, engine) = session(
        (0..5).map(|i| Block::paragraph(&format!("{}", i))).collect(),
        Viewport::default(),
    );
    let refs: Vec<BlockRef> = (0..5).map(|i| block_ref(&list, i)).collect();
    let missing = BlockRef { id: Uuid::new_v4() };

    let mut expected_open = false;
    let mut seed: u32 = 7;
    for _ in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        match (seed >> 16) % 3 {
            0 => {
                engine.hover(refs[(seed as usize >> 8) % refs.len()]).unwrap();
                expected_open = true;
            }
            1 => {
                engine.close();
                expected_open = false;
            }
            _ => {
                engine.hover(missing).unwrap();
            }
        }
        let state = engine.state();
        assert_eq!(state.opened(), expected_open);
        if !state.opened() {
            assert!(!state.actions_visible());
        }
    }
}

#[test]
fn unmeasured_geometry_leaves_state_untouched() {
    let mut broken = Block::paragraph("broken");
    broken.geometry.height = f32::NAN;
    let (list, engine) = session(vec![Block::paragraph("A"), broken], Viewport::default());
    let a = block_ref(&list, 0);
    engine.hover(a).unwrap();
    let before = engine.state();

    assert!(engine.hover(block_ref(&list, 1)).is_err());
    assert_eq!(engine.state(), before);
    assert_eq!(engine.hovered(), Some(a.id));
}

#[test]
fn toolbar_calls_before_build_are_noops() {
    let list = BlockList::from_blocks(vec![Block::paragraph("A")]);
    let mut toolbar = Toolbar::new();
    let block = list.block(0);
    assert_eq!(toolbar.move_and_open(block, &list, false), Ok(false));
    assert_eq!(toolbar.move_and_open(None, &list, false), Ok(false));
    toolbar.close();
    toolbar.open(true);
    assert!(!toolbar.state().opened());
    assert!(!toolbar.view().built);
}

#[test]
fn close_is_ignored_while_read_only() {
    let list = BlockList::from_blocks(vec![Block::paragraph("A")]);
    let mut toolbar = Toolbar::new();
    toolbar.build();
    toolbar.move_and_open(list.block(0), &list, false).unwrap();
    toolbar.set_read_only(true);
    toolbar.close();
    assert!(toolbar.state().opened());
}

#[test]
fn hide_block_actions_keeps_overlay_open() {
    let (list, engine) = session(vec![Block::paragraph("A")], Viewport::default());
    engine.hover(block_ref(&list, 0)).unwrap();
    engine.hide_block_actions();
    let state = engine.state();
    assert_eq!(state.phase, ToolbarPhase::OpenBare);
    assert!(engine.view().actions.is_empty());
    engine.open(true);
    assert!(engine.view().actions.contains(&markers::ACTIONS_OPENED));
}

#[test]
fn toggler_click_syncs_current_block_and_opens_settings() {
    let (list, engine) = session(
        vec![Block::paragraph("A"), Block::paragraph("B"), Block::paragraph("C")],
        Viewport::default(),
    );
    assert_eq!(list.borrow().current_index(), Some(0));
    let c = block_ref(&list, 2);
    engine.hover(c).unwrap();
    engine.click_settings_toggler().unwrap();

    assert_eq!(list.borrow().current_index(), Some(2));
    let settings = engine.settings_view().expect("settings open");
    assert_eq!(settings.block, c.id);
    let names: Vec<&str> = settings.entries.iter().map(|e| &*e.name).collect();
    assert_eq!(names, vec!["move-up", "delete", "move-down"]);
    assert!(settings.entries[2].disabled);
    assert_eq!(engine.view().popover, Some(PopoverKind::Settings));

    // Second click closes the panel, the toolbar stays.
    engine.click_settings_toggler().unwrap();
    assert!(engine.settings_view().is_none());
    assert!(engine.state().opened());
}

#[test]
fn hover_is_ignored_while_a_popover_is_open() {
    let (list, engine) = session(vec![Block::paragraph("A"), Block::paragraph("B")], Viewport::default());
    let a = block_ref(&list, 0);
    engine.hover(a).unwrap();
    engine.click_settings_toggler().unwrap();
    engine.hover(block_ref(&list, 1)).unwrap();
    assert_eq!(engine.hovered(), Some(a.id));
    assert!(engine.settings_view().is_some());
}

#[test]
fn activate_requests_settings_without_opening_toolbar() {
    let (list, engine) = session(vec![Block::paragraph("A"), Block::paragraph("B")], Viewport::default());
    let b = block_ref(&list, 1);
    assert_eq!(engine.activate(b).unwrap(), 1);
    assert!(!engine.state().opened());
    assert_eq!(engine.settings_view().map(|s| s.block), Some(b.id));
    assert_eq!(list.borrow().current_index(), Some(1));
}

#[test]
fn settings_and_toolbox_are_mutually_exclusive() {
    let (list, engine) = session(vec![Block::paragraph("A")], Viewport::default());
    engine.hover(block_ref(&list, 0)).unwrap();

    engine.click_plus_button().unwrap();
    assert_eq!(engine.view().popover, Some(PopoverKind::Toolbox));
    assert!(engine.view().page.contains(&markers::PAGE_TOOLBOX_OPENED));

    engine.click_settings_toggler().unwrap();
    assert_eq!(engine.view().popover, Some(PopoverKind::Settings));
    assert!(engine.view().page.is_empty());
    assert!(engine.toolbox_tools().is_none());

    engine.click_plus_button().unwrap();
    assert_eq!(engine.view().popover, Some(PopoverKind::Toolbox));
    assert!(engine.settings_view().is_none());
}

#[test]
fn choosing_a_tool_inserts_after_current_block() {
    let (list, engine) = session(vec![Block::paragraph("A")], Viewport::default());
    engine.hover(block_ref(&list, 0)).unwrap();
    assert_eq!(engine.choose_tool("paragraph").unwrap(), None);

    engine.click_plus_button().unwrap();
    let tools = engine.toolbox_tools().unwrap();
    assert_eq!(tools.len(), 1);
    let id = engine.choose_tool("paragraph").unwrap().unwrap();

    let list = list.borrow();
    assert_eq!(list.len(), 2);
    assert_eq!(list.current_index(), Some(1));
    assert_eq!(list.blocks()[1].id, id);
    assert_eq!(engine.hovered(), Some(id));
    assert!(engine.view().popover.is_none());
}

#[test]
fn choosing_a_tool_replaces_an_empty_block() {
    let (list, engine) = session(vec![Block::paragraph("")], Viewport::default());
    engine.hover(block_ref(&list, 0)).unwrap();
    engine.click_plus_button().unwrap();
    assert!(engine.choose_tool("heading").is_err());
    let id = engine.choose_tool("paragraph").unwrap().unwrap();
    assert_eq!(list.borrow().len(), 1);
    assert_eq!(list.borrow().blocks()[0].id, id);
}

#[test]
fn resize_across_breakpoint_rebinds_hover() {
    let (list, mut engine) = session(vec![Block::paragraph("A")], Viewport::desktop(1024.0, 768.0));
    assert_eq!(engine.bus().subscriber_count(Channel::BlockHovered), 1);

    engine.set_viewport(Viewport::desktop(500.0, 768.0));
    assert_eq!(engine.bus().subscriber_count(Channel::BlockHovered), 0);
    assert_eq!(engine.bus().subscriber_count(Channel::SettingsRequested), 1);

    engine.set_viewport(Viewport::desktop(1024.0, 768.0));
    assert_eq!(engine.bus().subscriber_count(Channel::BlockHovered), 1);
    engine.hover(block_ref(&list, 0)).unwrap();
    assert!(engine.state().opened());
}

#[test]
fn resize_repositions_open_toolbar() {
    let (list, mut engine) = session(
        vec![Block::paragraph("A").with_height(50.0).with_padding_top(4.0)],
        Viewport::desktop(1024.0, 768.0),
    );
    engine.hover(block_ref(&list, 0)).unwrap();
    assert_eq!(engine.state().vertical_offset, Some(4));
    engine.set_viewport(Viewport::mobile(390.0, 700.0));
    assert_eq!(engine.state().vertical_offset, Some(50));
}

#[test]
fn hover_reopens_after_settings_requested_while_closed() {
    let (list, engine) = session(vec![Block::paragraph("A"), Block::paragraph("B")], Viewport::default());
    let a = block_ref(&list, 0);
    engine.activate(block_ref(&list, 1)).unwrap();
    assert!(!engine.state().opened());
    assert_eq!(engine.view().popover, Some(PopoverKind::Settings));

    assert_eq!(engine.hover(a).unwrap(), 1);
    assert!(engine.state().opened());
    assert_eq!(engine.hovered(), Some(a.id));
    assert!(engine.view().popover.is_none());
}

#[test]
fn failed_focus_keeps_current_block_and_panel() {
    let mut broken = Block::paragraph("C");
    broken.geometry.height = f32::NAN;
    let (list, engine) = session(
        vec![Block::paragraph("A"), Block::paragraph("B"), broken],
        Viewport::default(),
    );
    let a = block_ref(&list, 0);
    engine.hover(a).unwrap();
    engine.click_settings_toggler().unwrap();
    assert_eq!(engine.activate_tune("delete").unwrap(), TuneActivation::AwaitingConfirmation);

    assert!(engine.focus_block(2).is_err());
    assert_eq!(list.borrow().current_index(), Some(0));
    assert_eq!(engine.settings_view().map(|s| s.block), Some(a.id));

    // The armed delete still targets the block the panel was opened for.
    engine.activate_tune("delete").unwrap();
    let texts: Vec<String> = list.borrow().blocks().iter().map(|b| b.text.to_string()).collect();
    assert_eq!(texts, vec!["B", "C"]);
}

#[test]
fn focus_out_of_range_changes_nothing() {
    let (list, engine) = session(vec![Block::paragraph("A")], Viewport::default());
    assert!(engine.focus_block(3).is_err());
    assert_eq!(list.borrow().current_index(), Some(0));
    assert!(!engine.state().opened());
}

#[test]
fn settings_observers_survive_read_only_cycles() {
    let (list, mut engine) = session(vec![Block::paragraph("A"), Block::paragraph("B")], Viewport::default());
    let seen: Rc<RefCell<Vec<Uuid>>> = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        engine.on_settings_opened(move |block| {
            seen.borrow_mut().push(block);
            Ok(())
        });
    }
    let b = block_ref(&list, 1);
    engine.activate(b).unwrap();
    assert_eq!(*seen.borrow(), vec![b.id]);
    assert_eq!(engine.settings_view().map(|s| s.block), Some(b.id));

    engine.set_read_only(true, Duration::ZERO);
    engine.set_read_only(false, Duration::ZERO);
    assert!(engine.on_idle());
    engine.activate(b).unwrap();
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn observer_reads_panel_from_inside_callback() {
    let list = Rc::new(RefCell::new(BlockList::from_blocks(vec![Block::paragraph("A")])));
    let engine = Rc::new(RefCell::new(ToolbarEngine::with_defaults(
        list.clone(),
        ToolbarConfig::default(),
        Viewport::default(),
    )));
    let observed = Rc::new(RefCell::new(Vec::new()));
    {
        let weak = Rc::downgrade(&engine);
        let observed = observed.clone();
        engine.borrow().on_settings_opened(move |_| {
            if let Some(engine) = weak.upgrade() {
                observed.borrow_mut().push(engine.borrow().settings_view().map(|s| s.block));
            }
            Ok(())
        });
    }
    let a = block_ref(&list, 0);
    for _ in 0..2 {
        engine.borrow().activate(a).unwrap();
        engine.borrow().close();
        engine.borrow_mut().set_read_only(true, Duration::ZERO);
        engine.borrow_mut().set_read_only(false, Duration::ZERO);
        assert!(engine.borrow_mut().on_idle());
    }
    assert_eq!(*observed.borrow(), vec![Some(a.id), Some(a.id)]);
}

#[test]
fn removed_observer_is_not_called() {
    let (list, engine) = session(vec![Block::paragraph("A")], Viewport::default());
    let calls = Rc::new(RefCell::new(0));
    let id = {
        let calls = calls.clone();
        engine.on_settings_opened(move |_| {
            *calls.borrow_mut() += 1;
            Ok(())
        })
    };
    assert!(engine.remove_settings_observer(id));
    assert!(!engine.remove_settings_observer(id));
    engine.activate(block_ref(&list, 0)).unwrap();
    assert_eq!(*calls.borrow(), 0);
}
