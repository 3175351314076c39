use console_error_panic_hook::set_once;
use gloo_events::EventListener;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlInputElement, MouseEvent};

use foundation::math::Vec2;
use layers::VisibleFire;
use layers::boundary::coord;
use layers::svg::{SVG_NS, render_duration_legend, render_size_legend};
use layers::symbology::{BoundaryStyle, CircleStyle};
use runtime::ToggleOutcome;
use scene::entity::CauseId;
use scene::key::FireKey;
use viewer::{
    CAUSE_FILTER_LABEL, FireMap, MapData, MapUpdate, SEARCH_LABEL, SEARCH_PLACEHOLDER,
    ViewerConfig,
};

const CONTAINER_STYLE: &str = "position: relative;";
const HEADING_STYLE: &str = "font-weight: bold; margin: 6px 0;";
const TOOLTIP_STYLE: &str = "position: absolute; background: white; border: 1px solid #ccc; \
    padding: 8px; font-size: 12px; border-radius: 4px; \
    box-shadow: 0 2px 4px rgba(0,0,0,0.1); max-width: 220px; \
    pointer-events: none; z-index: 1;";

/// Handles to the elements updates write into.
struct Dom {
    container: Element,
    heading: Element,
    slider: HtmlInputElement,
    picker: HtmlInputElement,
    play: Element,
    circles: Element,
    tooltip: Element,
}

struct Circle {
    element: Element,
    _click: EventListener,
}

struct App {
    map: FireMap,
    dom: Dom,
    circles: HashMap<FireKey, Circle>,
    _controls: Vec<EventListener>,
    /// Bumped on every play/pause so a stale timer loop exits on its next
    /// wake-up.
    playback_generation: u64,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn js_err(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Loads both datasets and builds the map inside `container_id`.
///
/// `config_json` is an optional partial [`ViewerConfig`]. A load failure is
/// logged and leaves the container empty.
#[wasm_bindgen]
pub fn start_map(container_id: String, config_json: Option<String>) {
    spawn_local(async move {
        if let Err(err) = start_map_inner(&container_id, config_json.as_deref()).await {
            log(&format!("fire map init error: {:?}", err));
        }
    });
}

/// Number of fires currently drawn.
#[wasm_bindgen]
pub fn visible_fire_count() -> usize {
    with_app(|app| app.circles.len()).unwrap_or(0)
}

async fn start_map_inner(container_id: &str, config_json: Option<&str>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => ViewerConfig::from_json_str(json).map_err(js_err)?,
        None => ViewerConfig::default(),
    };
    let fires = fetch_text(&config.fires).await?;
    let topology = fetch_text(&config.topology).await?;
    let data = MapData::from_json(&fires, &topology, &config).map_err(js_err)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document not available"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id {container_id:?}")))?;

    let map = FireMap::new(data, config);
    let (dom, controls) = build_dom(&document, container, &map)?;
    let mut app = App {
        map,
        dom,
        circles: HashMap::new(),
        _controls: controls,
        playback_generation: 0,
    };
    let update = app.map.update();
    app.apply(update);
    log(&format!("fire map ready: {} fires drawn", app.circles.len()));

    APP.with(|cell| *cell.borrow_mut() = Some(app));
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

impl App {
    /// Writes an update into the page: labels, control values, circles.
    fn apply(&mut self, update: MapUpdate) {
        self.dom.heading.set_text_content(Some(&update.heading));
        self.dom.picker.set_value(&update.picker_value);
        self.dom.slider.set_value(&update.slider_value.to_string());
        self.hide_tooltip();

        for key in &update.diff.removed {
            if let Some(circle) = self.circles.remove(key) {
                circle.element.remove();
            }
        }
        for fire in &update.diff.added {
            match create_circle(&self.dom.circles, fire) {
                Ok(circle) => {
                    self.circles.insert(fire.key.clone(), circle);
                }
                Err(err) => log(&format!("failed to draw fire {}: {:?}", fire.key, err)),
            }
        }
        for fire in &update.diff.updated {
            if let Some(circle) = self.circles.get(&fire.key)
                && let Err(err) = set_circle_geometry(&circle.element, fire)
            {
                log(&format!("failed to redraw fire {}: {:?}", fire.key, err));
            }
        }
    }

    fn show_tooltip(&mut self, key: &FireKey, pointer: Vec2) {
        let rect = self.dom.container.get_bounding_client_rect();
        let origin = Vec2::new(rect.left(), rect.top());
        let Some(tip) = self.map.click_fire(key, pointer, origin) else {
            return;
        };
        self.dom.tooltip.set_inner_html(&tip.content.to_html());
        let style = format!(
            "{TOOLTIP_STYLE} left: {}px; top: {}px; display: block;",
            coord(tip.position.x),
            coord(tip.position.y)
        );
        self.set_tooltip_style(&style);
    }

    fn hide_tooltip(&self) {
        self.set_tooltip_style(&format!("{TOOLTIP_STYLE} display: none;"));
    }

    fn set_tooltip_style(&self, style: &str) {
        if let Err(err) = self.dom.tooltip.set_attribute("style", style) {
            log(&format!("failed to style tooltip: {:?}", err));
        }
    }

    fn sync_play_label(&self) {
        self.dom.play.set_text_content(Some(self.map.play_label()));
    }

    /// Returns `false` once this timer loop should stop.
    fn on_tick(&mut self, generation: u64) -> bool {
        if generation != self.playback_generation {
            return false;
        }
        let (_, update) = self.map.tick();
        let advanced = update.is_some();
        if let Some(update) = update {
            self.apply(update);
        }
        if !advanced {
            self.sync_play_label();
        }
        advanced
    }
}

fn toggle_play() {
    let started = with_app(|app| {
        let outcome = app.map.toggle_play();
        app.playback_generation += 1;
        app.sync_play_label();
        match outcome {
            ToggleOutcome::Started => Some((app.playback_generation, app.map.tick_period())),
            ToggleOutcome::Paused | ToggleOutcome::AtEnd => None,
        }
    })
    .flatten();

    if let Some((generation, period)) = started {
        spawn_local(run_playback(generation, period));
    }
}

async fn run_playback(generation: u64, period: Duration) {
    let period = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
    loop {
        TimeoutFuture::new(period).await;
        if !with_app(|app| app.on_tick(generation)).unwrap_or(false) {
            break;
        }
    }
}

fn update_with(f: impl FnOnce(&mut FireMap) -> Option<MapUpdate>) {
    with_app(|app| {
        if let Some(update) = f(&mut app.map) {
            app.apply(update);
        }
    });
}

fn svg_element(document: &Document, tag: &str) -> Result<Element, JsValue> {
    document.create_element_ns(Some(SVG_NS), tag)
}

fn input(document: &Document, kind: &str) -> Result<HtmlInputElement, JsValue> {
    let el = document
        .create_element("input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(JsValue::from)?;
    el.set_type(kind);
    Ok(el)
}

fn labelled(document: &Document, text: &str) -> Result<Element, JsValue> {
    let label = document.create_element("label")?;
    label.set_text_content(Some(text));
    Ok(label)
}

fn create_circle(group: &Element, fire: &VisibleFire) -> Result<Circle, JsValue> {
    let document = group
        .owner_document()
        .ok_or_else(|| JsValue::from_str("circle group is detached"))?;
    let element = svg_element(&document, "circle")?;
    let style = CircleStyle::default();
    set_circle_geometry(&element, fire)?;
    element.set_attribute("fill-opacity", &style.fill_opacity.to_string())?;
    element.set_attribute("stroke", style.stroke)?;
    element.set_attribute("stroke-width", &style.stroke_width.to_string())?;
    element.set_attribute("style", &format!("cursor: {}", style.cursor))?;
    element.set_attribute("data-key", fire.key.as_str())?;

    let key = fire.key.clone();
    let click = EventListener::new(&element, "click", move |event: &Event| {
        event.stop_propagation();
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let pointer = Vec2::new(mouse.client_x() as f64, mouse.client_y() as f64);
        with_app(|app| app.show_tooltip(&key, pointer));
    });

    group.append_child(&element)?;
    Ok(Circle {
        element,
        _click: click,
    })
}

fn set_circle_geometry(element: &Element, fire: &VisibleFire) -> Result<(), JsValue> {
    element.set_attribute("cx", &coord(fire.position.x))?;
    element.set_attribute("cy", &coord(fire.position.y))?;
    element.set_attribute("r", &coord(fire.radius))?;
    element.set_attribute("fill", &fire.color.to_css())
}

/// Builds the heading, controls, map and tooltip inside `container`.
fn build_dom(
    document: &Document,
    container: Element,
    map: &FireMap,
) -> Result<(Dom, Vec<EventListener>), JsValue> {
    let mut listeners = Vec::new();
    let panel = map.controls();
    container.set_attribute("style", CONTAINER_STYLE)?;

    let heading = document.create_element("div")?;
    heading.set_attribute("style", HEADING_STYLE)?;
    container.append_child(&heading)?;

    let controls = document.create_element("div")?;
    let slider = input(document, "range")?;
    slider.set_min(&panel.slider.min.to_string());
    slider.set_max(&panel.slider.max.to_string());
    slider.set_step(&panel.slider.step.to_string());
    slider.set_value("0");
    let picker = input(document, "date")?;
    picker.set_min(&panel.picker.min);
    picker.set_max(&panel.picker.max);
    let play = document.create_element("button")?;
    play.set_text_content(Some(map.play_label()));
    controls.append_child(&slider)?;
    controls.append_child(&picker)?;
    controls.append_child(&play)?;
    container.append_child(&controls)?;

    let slider_for_input = slider.clone();
    listeners.push(EventListener::new(&slider, "input", move |_event: &Event| {
        let Ok(index) = slider_for_input.value().parse::<usize>() else {
            return;
        };
        update_with(|map| Some(map.set_day_index(index)));
    }));

    let picker_for_change = picker.clone();
    listeners.push(EventListener::new(&picker, "change", move |_event: &Event| {
        let value = picker_for_change.value();
        update_with(|map| map.pick_date(&value));
    }));

    listeners.push(EventListener::new(&play, "click", move |_event: &Event| {
        toggle_play();
    }));

    let causes = document.create_element("div")?;
    let causes_label = labelled(document, CAUSE_FILTER_LABEL)?;
    causes.append_child(&causes_label)?;
    for option in &panel.causes {
        let label = document.create_element("label")?;
        let checkbox = input(document, "checkbox")?;
        checkbox.set_checked(option.checked);
        label.append_child(&checkbox)?;
        label.append_with_str_1(&format!(" {}", option.name))?;
        causes.append_child(&label)?;

        let id: CauseId = option.id;
        let checkbox_for_change = checkbox.clone();
        listeners.push(EventListener::new(&checkbox, "change", move |_event: &Event| {
            let active = checkbox_for_change.checked();
            update_with(|map| Some(map.set_cause(id, active)));
        }));
    }
    container.append_child(&causes)?;

    let search_row = document.create_element("div")?;
    let search_label = labelled(document, SEARCH_LABEL)?;
    search_row.append_child(&search_label)?;
    let search = input(document, "text")?;
    search.set_placeholder(SEARCH_PLACEHOLDER);
    search_row.append_child(&search)?;
    container.append_child(&search_row)?;

    let search_for_input = search.clone();
    listeners.push(EventListener::new(&search, "input", move |_event: &Event| {
        let text = search_for_input.value();
        update_with(|map| Some(map.set_search(&text)));
    }));

    let config = map.config();
    let svg = svg_element(document, "svg")?;
    svg.set_attribute("xmlns", SVG_NS)?;
    svg.set_attribute("width", &config.width.to_string())?;
    svg.set_attribute("height", &config.height.to_string())?;
    svg.set_attribute("viewBox", &format!("0 0 {} {}", config.width, config.height))?;
    svg.set_attribute("style", "border: 1px solid #ccc")?;

    let boundary_style = BoundaryStyle::default();
    let boundary = svg_element(document, "path")?;
    boundary.set_attribute("fill", boundary_style.fill)?;
    boundary.set_attribute("stroke", boundary_style.stroke)?;
    boundary.set_attribute("d", map.boundary_path())?;
    svg.append_child(&boundary)?;

    let circles = svg_element(document, "g")?;
    svg.append_child(&circles)?;
    svg.insert_adjacent_html("beforeend", &render_duration_legend(map.duration_legend()))?;
    svg.insert_adjacent_html("beforeend", &render_size_legend(map.size_legend()))?;
    container.append_child(&svg)?;

    listeners.push(EventListener::new(&svg, "click", move |_event: &Event| {
        with_app(|app| {
            if app.map.click_background() {
                app.hide_tooltip();
            }
        });
    }));

    let tooltip = document.create_element("div")?;
    tooltip.set_attribute("style", &format!("{TOOLTIP_STYLE} display: none;"))?;
    container.append_child(&tooltip)?;

    Ok((
        Dom {
            container,
            heading,
            slider,
            picker,
            play,
            circles,
            tooltip,
        },
        listeners,
    ))
}
