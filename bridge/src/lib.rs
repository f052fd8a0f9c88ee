use bt_core::{
    import_json, sanitize_doc, BlockGeometry, BlockList, BlockRef, BlockSequence, EventBus, HandlerError, ToolbarConfig,
};
use bt_engine::{ObserverId, PluginRegistry, ToolbarEngine, TuneActivation, Viewport};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmToolbar {
    blocks: Rc<RefCell<BlockList>>,
    engine: ToolbarEngine,
    host_observers: Vec<ObserverId>,
}

#[wasm_bindgen]
impl WasmToolbar {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, width: f32, height: f32, touch: bool) -> Result<WasmToolbar, JsValue> {
        console_error_panic_hook::set_once();
        let config = match config_json {
            Some(raw) => ToolbarConfig::from_json(&raw).map_err(js_err)?,
            None => ToolbarConfig::default(),
        };
        let viewport = if touch {
            Viewport::mobile(width, height)
        } else {
            Viewport::desktop(width, height)
        };
        let blocks = Rc::new(RefCell::new(BlockList::from_blocks(Vec::new()).with_auto_layout(false)));
        let engine = ToolbarEngine::new(
            Rc::new(EventBus::new()),
            blocks.clone(),
            PluginRegistry::with_defaults(),
            config,
            viewport,
        );
        Ok(Self {
            blocks,
            engine,
            host_observers: Vec::new(),
        })
    }

    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, json: &str) -> Result<(), JsValue> {
        let doc = import_json(json).map_err(|e| js_err(format!("invalid document: {}", e)))?;
        self.engine.close();
        *self.blocks.borrow_mut() = BlockList::new(sanitize_doc(doc)).with_auto_layout(false);
        Ok(())
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        bt_core::export_json(&self.blocks.borrow().doc).map_err(js_err)
    }

    #[wasm_bindgen(js_name = blockIds)]
    pub fn block_ids(&self) -> Vec<JsValue> {
        self.blocks
            .borrow()
            .blocks()
            .iter()
            .map(|b| JsValue::from_str(&b.id.to_string()))
            .collect()
    }

    #[wasm_bindgen(js_name = setGeometry)]
    pub fn set_geometry(&mut self, index: usize, top: f32, height: f32, padding_top: f32) -> Result<(), JsValue> {
        self.blocks
            .borrow_mut()
            .set_geometry(
                index,
                BlockGeometry {
                    top,
                    height,
                    content_padding_top: padding_top,
                },
            )
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f32, height: f32, scroll_y: f32, touch: bool) {
        self.engine.set_viewport(Viewport {
            width,
            height,
            scroll_y,
            touch,
        });
    }

    #[wasm_bindgen(js_name = setScroll)]
    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.engine.set_scroll(scroll_y);
    }

    #[wasm_bindgen(js_name = hover)]
    pub fn hover(&self, block_id: &str) -> Result<usize, JsValue> {
        let id = parse_id(block_id)?;
        self.engine.hover(BlockRef { id }).map_err(js_err)
    }

    #[wasm_bindgen(js_name = focusBlock)]
    pub fn focus_block(&self, index: usize) -> Result<bool, JsValue> {
        self.engine.focus_block(index).map_err(js_err)
    }

    #[wasm_bindgen(js_name = moveAndOpen)]
    pub fn move_and_open(&self, block_id: Option<String>) -> Result<bool, JsValue> {
        let id = block_id.as_deref().map(parse_id).transpose()?;
        self.engine.move_and_open(id).map_err(js_err)
    }

    #[wasm_bindgen(js_name = open)]
    pub fn open(&self, with_actions: bool) {
        self.engine.open(with_actions);
    }

    #[wasm_bindgen(js_name = hideBlockActions)]
    pub fn hide_block_actions(&self) {
        self.engine.hide_block_actions();
    }

    #[wasm_bindgen(js_name = close)]
    pub fn close(&self) {
        self.engine.close();
    }

    #[wasm_bindgen(js_name = clickSettingsToggler)]
    pub fn click_settings_toggler(&self) -> Result<(), JsValue> {
        self.engine.click_settings_toggler().map_err(js_err)
    }

    #[wasm_bindgen(js_name = clickPlusButton)]
    pub fn click_plus_button(&self) -> Result<(), JsValue> {
        self.engine.click_plus_button().map_err(js_err)
    }

    #[wasm_bindgen(js_name = chooseTool)]
    pub fn choose_tool(&self, tool: &str) -> Result<Option<String>, JsValue> {
        let id = self.engine.choose_tool(tool).map_err(js_err)?;
        Ok(id.map(|id| id.to_string()))
    }

    #[wasm_bindgen(js_name = activateTune)]
    pub fn activate_tune(&self, name: &str) -> Result<JsValue, JsValue> {
        let activation = self.engine.activate_tune(name).map_err(js_err)?;
        to_js(&ActivationReport::from(activation))
    }

    #[wasm_bindgen(js_name = setReadOnly)]
    pub fn set_read_only(&mut self, enabled: bool) {
        self.engine.set_read_only(enabled, now());
    }

    #[wasm_bindgen(js_name = isReadOnly)]
    pub fn is_read_only(&self) -> bool {
        self.engine.is_read_only()
    }

    #[wasm_bindgen(js_name = onIdle)]
    pub fn on_idle(&mut self) -> bool {
        self.engine.on_idle()
    }

    #[wasm_bindgen(js_name = tick)]
    pub fn tick(&mut self) -> bool {
        self.engine.tick(now())
    }

    #[wasm_bindgen(js_name = rebuildPending)]
    pub fn rebuild_pending(&self) -> bool {
        self.engine.rebuild_pending()
    }

    #[wasm_bindgen(js_name = view)]
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.view())
    }

    #[wasm_bindgen(js_name = settingsView)]
    pub fn settings_view(&self) -> Result<JsValue, JsValue> {
        match self.engine.settings_view() {
            Some(view) => to_js(&view),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = toolboxTools)]
    pub fn toolbox_tools(&self) -> Result<JsValue, JsValue> {
        let Some(tools) = self.engine.toolbox_tools() else {
            return Ok(JsValue::NULL);
        };
        let entries: Vec<ToolEntry> = tools
            .iter()
            .map(|t| ToolEntry {
                name: t.name.to_string(),
                title: t.title.to_string(),
                icon: t.icon.to_string(),
            })
            .collect();
        to_js(&entries)
    }

    /// Call `callback(blockId)` once a block's settings panel is open, so
    /// `settingsView()` already returns it. Returns a handle for `off`.
    #[wasm_bindgen(js_name = onSettingsOpened)]
    pub fn on_settings_opened(&mut self, callback: js_sys::Function) -> f64 {
        let id = self.engine.on_settings_opened(move |block| {
            callback
                .call1(&JsValue::NULL, &JsValue::from_str(&block.to_string()))
                .map(|_| ())
                .map_err(|e| HandlerError::new(format!("{:?}", e)))
        });
        self.host_observers.push(id);
        (self.host_observers.len() - 1) as f64
    }

    #[wasm_bindgen(js_name = off)]
    pub fn off(&mut self, handle: f64) -> bool {
        match self.host_observers.get(handle as usize) {
            Some(id) => self.engine.remove_settings_observer(*id),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> JsValue {
        let blocks = self.blocks.borrow();
        let empty = blocks.blocks().iter().filter(|b| b.is_empty()).count();
        serde_wasm_bindgen::to_value(&serde_json::json!({
            "blockCount": blocks.len(),
            "emptyBlocks": empty,
            "currentIndex": blocks.current_index(),
            "contentHeight": blocks.content_height(),
        }))
        .unwrap_or(JsValue::NULL)
    }
}

#[derive(Serialize)]
struct ToolEntry {
    name: String,
    title: String,
    icon: String,
}

#[derive(Serialize)]
struct ActivationReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<bt_engine::TuneOutcome>,
}

impl From<TuneActivation> for ActivationReport {
    fn from(activation: TuneActivation) -> Self {
        let (status, outcome) = match activation {
            TuneActivation::NotOpen => ("not-open", None),
            TuneActivation::Unknown => ("unknown", None),
            TuneActivation::Disabled => ("disabled", None),
            TuneActivation::AwaitingConfirmation => ("awaiting-confirmation", None),
            TuneActivation::Completed(outcome) => ("completed", Some(outcome)),
        };
        Self { status, outcome }
    }
}

fn parse_id(raw: &str) -> Result<Uuid, JsValue> {
    Uuid::parse_str(raw).map_err(|e| js_err(format!("invalid block id `{}`: {}", raw, e)))
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_err(format!("serialization failed: {}", e)))
}

fn now() -> Duration {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| Duration::from_secs_f64(p.now().max(0.0) / 1000.0))
        .unwrap_or(Duration::ZERO)
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    web_sys::console::debug_1(&JsValue::from_str("bt_bridge ready"));
}
