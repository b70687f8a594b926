//! DOM renderer
//!
//! Draws a [`Frame`] as absolutely-positioned `div`s inside
//! `#timer-mode-container`, hiding the regular `#game-area` while attached.
//! Words and projectiles keep one element per entity; particles are drawn
//! from reusable pools.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use super::{Frame, ProjectileView, WordView};
use crate::sim::EntityId;

const CONTAINER_ID: &str = "timer-mode-container";
const GAME_AREA_ID: &str = "game-area";

fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    el.style().set_property(prop, value).ok();
}

fn place(el: &HtmlElement, x: f32, y: f32) {
    set_style(el, "left", &format!("{x}px"));
    set_style(el, "top", &format!("{y}px"));
}

/// Growable set of same-class elements reused between frames
struct Pool {
    class: &'static str,
    elements: Vec<HtmlElement>,
}

impl Pool {
    fn new(class: &'static str) -> Self {
        Self {
            class,
            elements: Vec::new(),
        }
    }

    /// Make exactly `len` elements exist, creating or removing as needed
    fn resize(
        &mut self,
        document: &Document,
        parent: &HtmlElement,
        len: usize,
    ) -> Result<&[HtmlElement], JsValue> {
        while self.elements.len() < len {
            let el = create_div(document, self.class)?;
            parent.append_child(&el)?;
            self.elements.push(el);
        }
        for el in self.elements.drain(len..) {
            el.remove();
        }
        Ok(&self.elements)
    }
}

fn create_div(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
    let el = document.create_element("div")?.unchecked_into::<HtmlElement>();
    el.set_class_name(class);
    Ok(el)
}

/// Keep one element per entity id, dropping those no longer present
fn sync_entities<T>(
    document: &Document,
    parent: &HtmlElement,
    elements: &mut HashMap<EntityId, HtmlElement>,
    items: &[T],
    id_of: impl Fn(&T) -> EntityId,
    class: &str,
    mut draw: impl FnMut(&HtmlElement, &T, bool),
) -> Result<(), JsValue> {
    elements.retain(|id, el| {
        let alive = items.iter().any(|item| id_of(item) == *id);
        if !alive {
            el.remove();
        }
        alive
    });

    for item in items {
        let id = id_of(item);
        let created = !elements.contains_key(&id);
        if created {
            let el = create_div(document, class)?;
            parent.append_child(&el)?;
            elements.insert(id, el);
        }
        if let Some(el) = elements.get(&id) {
            draw(el, item, created);
        }
    }
    Ok(())
}

pub struct DomRenderer {
    document: Document,
    container: HtmlElement,
    game_area: Option<HtmlElement>,
    plane: HtmlElement,
    input: HtmlElement,
    words: HashMap<EntityId, HtmlElement>,
    projectiles: HashMap<EntityId, HtmlElement>,
    sparks: Pool,
    wind: Pool,
    trail: Pool,
}

impl DomRenderer {
    /// Take over the container and hide the regular game area
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        let container = document
            .get_element_by_id(CONTAINER_ID)
            .ok_or_else(|| JsValue::from_str("missing #timer-mode-container"))?
            .dyn_into::<HtmlElement>()
            .map_err(JsValue::from)?;
        container.set_inner_html("");
        set_style(&container, "display", "block");

        let game_area = document
            .get_element_by_id(GAME_AREA_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(area) = &game_area {
            set_style(area, "display", "none");
        }

        let plane = create_div(document, "")?;
        plane.set_id("plane");
        container.append_child(&plane)?;

        let input = create_div(document, "")?;
        input.set_id("timer-mode-input");
        container.append_child(&input)?;

        log::debug!("DOM renderer attached");
        Ok(Self {
            document: document.clone(),
            container,
            game_area,
            plane,
            input,
            words: HashMap::new(),
            projectiles: HashMap::new(),
            sparks: Pool::new("explosion-particle"),
            wind: Pool::new("wind-particle"),
            trail: Pool::new("trail-particle"),
        })
    }

    pub fn render(&mut self, frame: &Frame) -> Result<(), JsValue> {
        place(&self.plane, frame.plane.x, frame.plane.y);
        set_style(
            &self.plane,
            "transform",
            &format!("translateY(-50%) rotate({}deg)", frame.plane.tilt),
        );
        self.input.set_text_content(Some(&frame.input));

        sync_entities(
            &self.document,
            &self.container,
            &mut self.words,
            &frame.words,
            |w: &WordView| w.id,
            "flying-word",
            |el, w, created| {
                if created {
                    el.set_text_content(Some(&w.text));
                    set_style(el, "position", "absolute");
                    set_style(el, "white-space", "nowrap");
                }
                place(el, w.x, w.y);
                set_style(el, "color", w.color);
            },
        )?;

        sync_entities(
            &self.document,
            &self.container,
            &mut self.projectiles,
            &frame.projectiles,
            |p: &ProjectileView| p.id,
            "projectile",
            |el, p, created| {
                if created {
                    el.set_text_content(Some(&p.ch.to_string()));
                    set_style(el, "position", "absolute");
                }
                place(el, p.x, p.y);
            },
        )?;

        let sparks = self
            .sparks
            .resize(&self.document, &self.container, frame.sparks.len())?;
        for (el, s) in sparks.iter().zip(&frame.sparks) {
            place(el, s.x, s.y);
            set_style(el, "opacity", &s.opacity.to_string());
            set_style(el, "background-color", s.color);
        }

        let wind = self
            .wind
            .resize(&self.document, &self.container, frame.wind.len())?;
        for (el, w) in wind.iter().zip(&frame.wind) {
            place(el, w.x, w.y);
            set_style(el, "width", &format!("{}px", w.length));
        }

        let trail = self
            .trail
            .resize(&self.document, &self.container, frame.trail.len())?;
        for (el, t) in trail.iter().zip(&frame.trail) {
            place(el, t.x, t.y);
            set_style(el, "opacity", &t.opacity.to_string());
        }

        Ok(())
    }

    /// Empty the container and give the screen back to the regular game
    pub fn detach(self) {
        self.container.set_inner_html("");
        set_style(&self.container, "display", "none");
        if let Some(area) = &self.game_area {
            set_style(area, "display", "flex");
        }
        log::debug!("DOM renderer detached");
    }
}
