//! Browser adapter for the workbook bridge.
//!
//! This module provides the WASM-exported `AppExcel` struct that:
//! - Builds the sheet model from a forum snapshot or a raw patch script
//! - Mounts the grid widget through its global factory
//! - Routes pointer, double-click and Enter input into the bridge
//! - Calls the host's JS callbacks once internal borrows are released
//! - Remounts when the container width changes the column width

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use serde_json::{Map, Value};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, ResizeObserver};

use super::{
    compute_cell_width, dispatch_events, BridgeOptions, CellPresentation, Capability, GridWidget,
    PointerInput, SheetHost, WidgetConfig, WorkbookBridge,
};
use crate::action::ActionHandler;
use crate::error::{describe_js_error, AppExcelError, Result};
use crate::forum::{self, ForumSnapshot};
use crate::sheet::{build, SheetInput};
use crate::types::{Cell, Coord, SelectedCell};

/// Rendered cell elements carry their grid coordinate in these attributes.
const CELL_SELECTOR: &str = "td[data-x][data-y]";
/// Instance-scoped column width variable, set on the container.
const WIDTH_VAR: &str = "--app-excel-cell-width";

type SelectionCallback = Closure<dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue, JsValue)>;

/// Widget callbacks passed in the construction config.
pub struct WidgetCallbacks {
    pub onload: Closure<dyn FnMut()>,
    pub onselection: SelectionCallback,
}

/// The external grid widget, driven through its JS object.
pub struct DomGridWidget {
    container: HtmlElement,
    factory: JsValue,
    instance: JsValue,
    cells: HashMap<Coord, HtmlElement>,
    _callbacks: WidgetCallbacks,
}

impl DomGridWidget {
    /// Call `window[global](container, config)`.
    pub fn create(
        container: &HtmlElement,
        global: &str,
        config: &WidgetConfig,
        callbacks: WidgetCallbacks,
    ) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| AppExcelError::Dom("no window".into()))?;
        let factory = Reflect::get(window.as_ref(), &JsValue::from_str(global))
            .map_err(|e| AppExcelError::Widget(describe_js_error(&e)))?;
        let factory_fn = factory
            .dyn_ref::<Function>()
            .ok_or_else(|| AppExcelError::Widget(format!("window.{global} is not a function")))?;

        let js_config = to_js(config)?;
        set_property(&js_config, "onload", callbacks.onload.as_ref())?;
        set_property(&js_config, "onselection", callbacks.onselection.as_ref())?;

        let instance = factory_fn
            .call2(&JsValue::NULL, container.as_ref(), &js_config)
            .map_err(|e| AppExcelError::Widget(describe_js_error(&e)))?;
        Ok(Self {
            container: container.clone(),
            factory,
            instance,
            cells: HashMap::new(),
            _callbacks: callbacks,
        })
    }

    fn collect_cells(&mut self) {
        self.cells.clear();
        let Ok(nodes) = self.container.query_selector_all(CELL_SELECTOR) else {
            return;
        };
        for i in 0..nodes.length() {
            let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            if let Some(at) = element_coord(&element) {
                self.cells.insert(at, element);
            }
        }
    }
}

impl GridWidget for DomGridWidget {
    fn begin_presentation(&mut self) {
        self.collect_cells();
    }

    fn paint_cell(&mut self, at: Coord, presentation: &CellPresentation) {
        let Some(element) = self.cells.get(&at) else {
            return;
        };
        element.set_class_name(&presentation.class_name);
        let style = element.style();
        for (property, value) in presentation.style.declarations() {
            let _ = style.set_property(property, &value);
        }
        element.set_text_content(Some(&presentation.text));
    }

    fn has_capability(&self, capability: Capability) -> bool {
        method(&self.instance, capability_method(capability)).is_some()
    }

    fn invoke(&mut self, capability: Capability) -> Result<()> {
        let name = capability_method(capability);
        let f = method(&self.instance, name)
            .ok_or_else(|| AppExcelError::Widget(format!("{name} is missing")))?;
        f.call0(&self.instance)
            .map(|_| ())
            .map_err(|e| AppExcelError::Widget(describe_js_error(&e)))
    }

    fn destroy(&mut self) -> Result<()> {
        self.cells.clear();
        let result = if let Some(f) = method(&self.factory, "destroy") {
            f.call1(&self.factory, self.container.as_ref())
        } else if let Some(f) = method(&self.instance, "destroy") {
            f.call0(&self.instance)
        } else {
            return Ok(());
        };
        result
            .map(|_| ())
            .map_err(|e| AppExcelError::Widget(describe_js_error(&e)))
    }
}

fn capability_method(capability: Capability) -> &'static str {
    match capability {
        Capability::HideIndexColumn => "hideIndex",
        Capability::ClearCopySelection => "removeCopySelection",
    }
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    if !target.is_object() && !target.is_function() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

fn set_property(target: &JsValue, name: &str, value: &JsValue) -> Result<()> {
    Reflect::set(target, &JsValue::from_str(name), value)
        .map(|_| ())
        .map_err(|e| AppExcelError::Dom(describe_js_error(&e)))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| AppExcelError::Other(e.to_string()))
}

fn element_coord(element: &Element) -> Option<Coord> {
    let col = element.get_attribute("data-x")?.trim().parse().ok()?;
    let row = element.get_attribute("data-y")?.trim().parse().ok()?;
    Some(Coord::new(col, row))
}

/// Grid coordinate of the cell an event happened in.
fn event_coord(event: &Event) -> Option<Coord> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let cell = target.closest(CELL_SELECTOR).ok()??;
    element_coord(&cell)
}

/// Widget callback index argument; numbers or numeric strings.
// Non-negative integral values checked before the cast.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn js_index(value: &JsValue) -> Option<u32> {
    let n = value
        .as_f64()
        .or_else(|| value.as_string().and_then(|s| s.trim().parse().ok()))?;
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

/// Host callbacks object supplied from JS. Missing functions are skipped.
#[derive(Clone)]
struct JsHost {
    callbacks: JsValue,
}

impl JsHost {
    fn call(&self, name: &str, args: &[JsValue]) {
        let Some(f) = method(&self.callbacks, name) else {
            return;
        };
        let args: Array = args.iter().collect();
        if let Err(e) = f.apply(&self.callbacks, &args) {
            log::warn!("{name} threw: {}", describe_js_error(&e));
        }
    }

    fn call_with<T: Serialize + ?Sized>(&self, name: &str, value: &T) {
        match to_js(value) {
            Ok(value) => self.call(name, &[value]),
            Err(e) => log::warn!("{name}: {e}"),
        }
    }
}

impl ActionHandler for JsHost {
    fn open_guide(&mut self) {
        self.call("onOpenGuide", &[]);
    }

    fn toggle_theme(&mut self) {
        self.call("onToggleTheme", &[]);
    }

    fn logout(&mut self) {
        self.call("onLogout", &[]);
    }

    fn open_my_posts(&mut self) {
        self.call("onMyPosts", &[]);
    }

    fn open_my_comments(&mut self) {
        self.call("onMyComments", &[]);
    }

    fn open_admin(&mut self) {
        self.call("onAdmin", &[]);
    }

    fn open_notifications(&mut self) {
        self.call("onNotifications", &[]);
    }

    fn open_mobile_push(&mut self) {
        self.call("onMobilePush", &[]);
    }

    fn open_composer(&mut self) {
        self.call("onCompose", &[]);
    }

    fn select_board(&mut self, board_id: &str) {
        self.call("onSelectBoard", &[JsValue::from_str(board_id)]);
    }

    fn sort(&mut self, mode: &str) {
        self.call("onSort", &[JsValue::from_str(mode)]);
    }

    fn page(&mut self, page: u32) {
        self.call("onPage", &[JsValue::from(page)]);
    }

    fn open_post(&mut self, post_id: &str, board_id: &str) {
        self.call(
            "onOpenPost",
            &[JsValue::from_str(post_id), JsValue::from_str(board_id)],
        );
    }

    fn on_action(&mut self, action_type: &str, payload: Option<&Map<String, Value>>, cell: &Cell) {
        let payload = match payload {
            Some(payload) => to_js(payload).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        };
        let cell = to_js(cell).unwrap_or(JsValue::NULL);
        self.call("onAction", &[JsValue::from_str(action_type), payload, cell]);
    }
}

impl SheetHost for JsHost {
    fn on_select_cell(&mut self, selected: &SelectedCell) {
        self.call_with("onSelectCell", selected);
    }
}

/// Shared state reachable from listeners and widget callbacks.
struct Inner {
    container: HtmlElement,
    options: BridgeOptions,
    host: JsHost,
    input: Option<SheetInput>,
    bridge: Option<WorkbookBridge<DomGridWidget>>,
    /// Selections the widget reported from inside its constructor
    early_selections: Vec<Coord>,
    /// Bumped on every mount and teardown; stale deferred work compares against it
    generation: u64,
}

/// An event listener that can be detached again.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            log::warn!("failed to attach {kind}: {}", describe_js_error(&e));
        }
        Self {
            target: target.clone(),
            kind,
            closure,
        }
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Spreadsheet-styled presentation surface mounted into a container element.
#[wasm_bindgen]
pub struct AppExcel {
    state: Rc<RefCell<Inner>>,
    listeners: Vec<Listener>,
    resize_observer: Option<ResizeObserver>,
    resize_closure: Option<Closure<dyn FnMut(Array)>>,
}

#[wasm_bindgen]
impl AppExcel {
    /// Create the surface. Nothing is mounted until a snapshot or sheet arrives.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        callbacks: JsValue,
        options: JsValue,
    ) -> std::result::Result<AppExcel, JsValue> {
        console_error_panic_hook::set_once();

        let options: BridgeOptions = if options.is_undefined() || options.is_null() {
            BridgeOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| AppExcelError::Config(e.to_string()))?
        };
        crate::logging::init(options.level_filter());

        let state = Rc::new(RefCell::new(Inner {
            container: container.clone(),
            options,
            host: JsHost { callbacks },
            input: None,
            bridge: None,
            early_selections: Vec::new(),
            generation: 0,
        }));

        let mut listeners = Vec::new();
        {
            let state = Rc::clone(&state);
            listeners.push(Listener::attach(container.as_ref(), "pointerdown", move |event| {
                on_pointer_down(&state, &event);
            }));
        }
        {
            let state = Rc::clone(&state);
            listeners.push(Listener::attach(container.as_ref(), "dblclick", move |event| {
                on_double_click(&state, &event);
            }));
        }
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                let state = Rc::clone(&state);
                listeners.push(Listener::attach(document.as_ref(), "keydown", move |event| {
                    on_key_down(&state, &event);
                }));
            }
            let state = Rc::clone(&state);
            listeners.push(Listener::attach(window.as_ref(), "resize", move |_event| {
                on_resize(&state);
            }));
        }

        let resize_closure = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |_entries: Array| {
                on_resize(&state);
            }) as Box<dyn FnMut(Array)>)
        };
        let resize_observer = match ResizeObserver::new(resize_closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&container);
                Some(observer)
            }
            Err(e) => {
                log::warn!("ResizeObserver unavailable: {}", describe_js_error(&e));
                None
            }
        };

        Ok(AppExcel {
            state,
            listeners,
            resize_observer,
            resize_closure: Some(resize_closure),
        })
    }

    /// Lay a forum snapshot out and mount it.
    #[wasm_bindgen(js_name = "setSnapshot")]
    pub fn set_snapshot(&self, snapshot: JsValue) -> std::result::Result<(), JsValue> {
        let snapshot: ForumSnapshot = serde_wasm_bindgen::from_value(snapshot)
            .map_err(|e| AppExcelError::Config(e.to_string()))?;
        self.set_input(forum::layout(&snapshot))
    }

    /// Mount a raw patch script.
    #[wasm_bindgen(js_name = "setSheet")]
    pub fn set_sheet(&self, input: JsValue) -> std::result::Result<(), JsValue> {
        let input: SheetInput = serde_wasm_bindgen::from_value(input)
            .map_err(|e| AppExcelError::Config(e.to_string()))?;
        self.set_input(input)
    }

    /// Re-run the presentation pass on the current mount.
    pub fn reapply(&self) {
        let Ok(mut inner) = self.state.try_borrow_mut() else {
            return;
        };
        if let Some(bridge) = inner.bridge.as_mut() {
            bridge.reapply_presentation();
        }
    }

    /// Current column width in CSS pixels, 0 when nothing is mounted.
    #[wasm_bindgen(js_name = "cellWidth")]
    pub fn cell_width(&self) -> u32 {
        self.state
            .try_borrow()
            .ok()
            .and_then(|inner| inner.bridge.as_ref().map(WorkbookBridge::cell_width))
            .unwrap_or(0)
    }

    /// Detach listeners, destroy the widget and clear the container.
    pub fn destroy(&mut self) {
        self.teardown();
    }
}

impl AppExcel {
    fn set_input(&self, input: SheetInput) -> std::result::Result<(), JsValue> {
        self.state
            .try_borrow_mut()
            .map_err(|_| AppExcelError::Dom("surface is busy".into()))?
            .input = Some(input);
        remount(&self.state, "new sheet").map_err(JsValue::from)
    }

    fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        if let Some(observer) = self.resize_observer.take() {
            observer.disconnect();
        }
        self.resize_closure = None;

        let (old, container) = match self.state.try_borrow_mut() {
            Ok(mut inner) => {
                inner.generation += 1;
                inner.input = None;
                inner.early_selections.clear();
                (inner.bridge.take(), Some(inner.container.clone()))
            }
            Err(_) => (None, None),
        };
        if let Some(old) = old {
            old.unmount();
        }
        if let Some(container) = container {
            container.set_inner_html("");
        }
    }
}

impl Drop for AppExcel {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Destroy the current widget (if any) and mount the stored input again.
fn remount(state: &Rc<RefCell<Inner>>, reason: &str) -> Result<()> {
    let (old, input, options, container, generation) = {
        let mut inner = state
            .try_borrow_mut()
            .map_err(|_| AppExcelError::Dom("surface is busy".into()))?;
        let Some(input) = inner.input.clone() else {
            return Ok(());
        };
        inner.generation += 1;
        inner.early_selections.clear();
        (
            inner.bridge.take(),
            input,
            inner.options.clone(),
            inner.container.clone(),
            inner.generation,
        )
    };
    log::debug!("remounting ({reason}), generation {generation}");

    if let Some(old) = old {
        old.unmount();
    }
    container.set_inner_html("");

    let model = build(&input);
    let width = compute_cell_width(
        f64::from(container.client_width()),
        model.col_count(),
        options.min_cell_width,
    );
    if let Err(e) = container.style().set_property(WIDTH_VAR, &format!("{width}px")) {
        log::debug!("failed to set {WIDTH_VAR}: {}", describe_js_error(&e));
    }

    let weak = Rc::downgrade(state);
    let (mut bridge, mut events) = WorkbookBridge::mount(model, &options, width, |config| {
        DomGridWidget::create(
            &container,
            &options.widget_global,
            config,
            widget_callbacks(&weak, generation),
        )
    })?;

    let mut host = match state.try_borrow_mut() {
        Ok(mut inner) => {
            let early = std::mem::take(&mut inner.early_selections);
            events.extend(bridge.replay_selections(early));
            inner.bridge = Some(bridge);
            inner.host.clone()
        }
        Err(_) => {
            bridge.unmount();
            return Err(AppExcelError::Dom("surface is busy".into()));
        }
    };
    dispatch_events(events, &mut host);
    schedule_reapply(state, generation);
    Ok(())
}

fn widget_callbacks(state: &Weak<RefCell<Inner>>, generation: u64) -> WidgetCallbacks {
    let onload = {
        let state = Weak::clone(state);
        Closure::wrap(Box::new(move || {
            reapply_if_current(&state, generation);
        }) as Box<dyn FnMut()>)
    };
    let onselection = {
        let state = Weak::clone(state);
        Closure::wrap(Box::new(
            move |_instance: JsValue, x1: JsValue, y1: JsValue, _x2: JsValue, _y2: JsValue, _origin: JsValue| {
                if let (Some(col), Some(row)) = (js_index(&x1), js_index(&y1)) {
                    on_widget_selection(&state, generation, Coord::new(col, row));
                }
            },
        )
            as Box<dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue, JsValue)>)
    };
    WidgetCallbacks { onload, onselection }
}

/// Two animation-frame passes so late widget rendering still gets presented.
fn schedule_reapply(state: &Rc<RefCell<Inner>>, generation: u64) {
    let weak = Rc::downgrade(state);
    let first = Closure::once_into_js(move || {
        reapply_if_current(&weak, generation);
        let second = Closure::once_into_js(move || reapply_if_current(&weak, generation));
        request_frame(&second);
    });
    request_frame(&first);
}

fn request_frame(callback: &JsValue) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.request_animation_frame(callback.unchecked_ref()) {
            log::debug!("requestAnimationFrame failed: {}", describe_js_error(&e));
        }
    }
}

fn reapply_if_current(state: &Weak<RefCell<Inner>>, generation: u64) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let Ok(mut inner) = state.try_borrow_mut() else {
        return;
    };
    if inner.generation != generation {
        return;
    }
    if let Some(bridge) = inner.bridge.as_mut() {
        bridge.reapply_presentation();
    }
}

fn on_widget_selection(state: &Weak<RefCell<Inner>>, generation: u64, at: Coord) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let (events, mut host) = {
        let Ok(mut inner) = state.try_borrow_mut() else {
            log::debug!("selection at {at} arrived while busy, dropped");
            return;
        };
        let inner = &mut *inner;
        if inner.generation != generation {
            return;
        }
        let Some(bridge) = inner.bridge.as_mut() else {
            inner.early_selections.push(at);
            return;
        };
        (bridge.widget_selection(at), inner.host.clone())
    };
    dispatch_events(events, &mut host);
}

fn on_pointer_down(state: &Rc<RefCell<Inner>>, event: &Event) {
    let Some(at) = event_coord(event) else {
        return;
    };
    let Some(button) = event.dyn_ref::<MouseEvent>().map(MouseEvent::button) else {
        return;
    };
    let Ok(mut inner) = state.try_borrow_mut() else {
        return;
    };
    if let Some(bridge) = inner.bridge.as_mut() {
        bridge.pointer_down(
            at,
            PointerInput {
                button,
                trusted: event.is_trusted(),
            },
        );
    }
}

fn on_double_click(state: &Rc<RefCell<Inner>>, event: &Event) {
    let Some(at) = event_coord(event) else {
        return;
    };
    let (events, mut host) = {
        let Ok(mut inner) = state.try_borrow_mut() else {
            return;
        };
        let inner = &mut *inner;
        let Some(bridge) = inner.bridge.as_mut() else {
            return;
        };
        (bridge.double_click(at, event.is_trusted()), inner.host.clone())
    };
    dispatch_events(events, &mut host);
}

fn on_key_down(state: &Rc<RefCell<Inner>>, event: &Event) {
    let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
        return;
    };
    let (outcome, mut host) = {
        let Ok(mut inner) = state.try_borrow_mut() else {
            return;
        };
        let inner = &mut *inner;
        let Some(bridge) = inner.bridge.as_mut() else {
            return;
        };
        (bridge.key_down(&key), inner.host.clone())
    };
    if outcome.prevent_default {
        event.prevent_default();
    }
    dispatch_events(outcome.events, &mut host);
}

fn on_resize(state: &Rc<RefCell<Inner>>) {
    let changed = {
        let Ok(inner) = state.try_borrow() else {
            return;
        };
        inner.bridge.as_ref().is_some_and(|bridge| {
            let width = compute_cell_width(
                f64::from(inner.container.client_width()),
                bridge.model().col_count(),
                inner.options.min_cell_width,
            );
            width != bridge.cell_width()
        })
    };
    if changed {
        if let Err(e) = remount(state, "container resized") {
            log::warn!("remount after resize failed: {e}");
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// Fake widget factory. Renders one row of `td[data-x][data-y]` cells,
    /// selects A1 from inside its constructor and logs its lifecycle.
    const FACTORY_BODY: &str = r#"
        var tr = document.createElement('tr');
        for (var x = 0; x < config.columns.length; x++) {
            var td = document.createElement('td');
            td.setAttribute('data-x', String(x));
            td.setAttribute('data-y', '0');
            tr.appendChild(td);
        }
        var table = document.createElement('table');
        table.appendChild(tr);
        el.appendChild(table);
        log.push('create');
        config.onselection(null, 0, 0, 0, 0);
        return {
            hideIndex: function () { log.push('hideIndex'); },
            select: function (x, y) { config.onselection(this, x, y, x, y, null); },
            destroy: function () { log.push('destroy with ' + el.childElementCount + ' children'); }
        };
    "#;

    const SHEET: &str = r#"{
        "rowCount": 1,
        "colCount": 3,
        "patches": [{"op": "action", "col": 0, "row": 0, "text": "Go", "actionType": "nav"}]
    }"#;

    fn document() -> web_sys::Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn entries(log: &Array) -> Vec<String> {
        log.iter().filter_map(|v| v.as_string()).collect()
    }

    /// Mount the one-row sheet on a fake widget registered as `window[global]`.
    fn mounted(global: &str) -> (AppExcel, HtmlElement, Array) {
        let log = Array::new();
        let factory = Function::new_with_args("log, el, config", FACTORY_BODY)
            .bind1(&JsValue::NULL, &log);
        let window = web_sys::window().unwrap();
        Reflect::set(window.as_ref(), &JsValue::from_str(global), &factory).unwrap();

        let callbacks = js_sys::Object::new();
        let on_select = Function::new_with_args(
            "log, sel",
            "log.push('select ' + sel.label + ' ' + sel.text);",
        )
        .bind1(&JsValue::NULL, &log);
        Reflect::set(&callbacks, &JsValue::from_str("onSelectCell"), &on_select).unwrap();

        let options = BridgeOptions {
            widget_global: global.to_string(),
            ..BridgeOptions::default()
        };
        let container: HtmlElement = document().create_element("div").unwrap().unchecked_into();
        let app =
            AppExcel::new(container.clone(), callbacks.into(), to_js(&options).unwrap()).unwrap();
        app.set_sheet(js_sys::JSON::parse(SHEET).unwrap()).unwrap();
        (app, container, log)
    }

    fn cell_at(container: &HtmlElement, col: u32) -> Element {
        container
            .query_selector(&format!("td[data-x='{col}'][data-y='0']"))
            .unwrap()
            .unwrap()
    }

    fn instance(app: &AppExcel) -> JsValue {
        let inner = app.state.borrow();
        inner.bridge.as_ref().unwrap().widget().instance.clone()
    }

    fn select(instance: &JsValue, col: u32) {
        let f = method(instance, "select").unwrap();
        let _ = f.call2(instance, &JsValue::from(col), &JsValue::from(0));
    }

    #[wasm_bindgen_test]
    fn test_js_index() {
        assert_eq!(js_index(&JsValue::from(3)), Some(3));
        assert_eq!(js_index(&JsValue::from_str(" 4 ")), Some(4));
        assert_eq!(js_index(&JsValue::from(-1)), None);
        assert_eq!(js_index(&JsValue::from(1.5)), None);
        assert_eq!(js_index(&JsValue::from(f64::NAN)), None);
        assert_eq!(js_index(&JsValue::from_str("B")), None);
        assert_eq!(js_index(&JsValue::UNDEFINED), None);
    }

    #[wasm_bindgen_test]
    fn test_element_coord() {
        let td = document().create_element("td").unwrap();
        assert_eq!(element_coord(&td), None);
        td.set_attribute("data-x", "2").unwrap();
        assert_eq!(element_coord(&td), None);
        td.set_attribute("data-y", "5").unwrap();
        assert_eq!(element_coord(&td), Some(Coord::new(2, 5)));
        td.set_attribute("data-y", "five").unwrap();
        assert_eq!(element_coord(&td), None);
    }

    #[wasm_bindgen_test]
    fn test_mount_paints_and_announces() {
        let (app, container, log) = mounted("appexcelMountGrid");
        assert_eq!(entries(&log), ["create", "hideIndex", "select  ="]);
        let go = cell_at(&container, 0);
        assert!(go.class_name().contains("has-action"));
        assert_eq!(go.text_content().as_deref(), Some("Go"));
        // Detached containers have no width, so columns take the minimum.
        assert_eq!(app.cell_width(), 72);
    }

    #[wasm_bindgen_test]
    fn test_selection_during_construction_consumes_guard() {
        let (app, _container, log) = mounted("appexcelEarlyGrid");
        select(&instance(&app), 2);
        assert_eq!(entries(&log).last().map(String::as_str), Some("select C1 "));
    }

    #[wasm_bindgen_test]
    fn test_destroy_detaches_then_destroys_then_clears() {
        let (mut app, container, log) = mounted("appexcelDestroyGrid");
        app.destroy();
        assert!(app.listeners.is_empty());
        assert!(app.resize_observer.is_none());
        // Listener and observer closures held the only other handles.
        assert_eq!(Rc::strong_count(&app.state), 1);
        assert_eq!(
            entries(&log).last().map(String::as_str),
            Some("destroy with 1 children")
        );
        assert_eq!(container.child_element_count(), 0);
        assert_eq!(app.cell_width(), 0);

        // A second teardown finds nothing left to do.
        app.destroy();
        assert_eq!(entries(&log).iter().filter(|e| e.starts_with("destroy")).count(), 1);
    }

    #[wasm_bindgen_test]
    fn test_stale_generation_is_ignored() {
        let (app, container, log) = mounted("appexcelStaleGrid");
        let generation = app.state.borrow().generation;
        let weak = Rc::downgrade(&app.state);

        let go = cell_at(&container, 0);
        go.set_class_name("stale");
        reapply_if_current(&weak, generation - 1);
        assert_eq!(go.class_name(), "stale");
        reapply_if_current(&weak, generation);
        assert!(go.class_name().contains("app-excel-cell"));

        let old = instance(&app);
        app.set_sheet(js_sys::JSON::parse(SHEET).unwrap()).unwrap();
        assert_eq!(app.state.borrow().generation, generation + 1);
        let before = entries(&log).len();
        select(&old, 2);
        assert_eq!(entries(&log).len(), before);
    }
}
