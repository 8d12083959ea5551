//! The page around the canvas: scroll container, fruit name and scroll hint.
//!
//! In the browser these are DOM elements looked up by id and written directly.
//! Natively there is no document, so the page only remembers what it shows and
//! logs the text changes.

use crate::{context::Viewport, showcase::timeline::TimelineState};

pub const CONTAINER_ID: &str = "container";
pub const NAME_ID: &str = "name";
pub const NAME_SPAN_ID: &str = "namespan";
pub const SCROLL_TEXT_ID: &str = "scrolltext";

const START_FONT_SIZE: u32 = 16;
const MAX_FONT_SIZE: u32 = 4096;

/// Grow the font size one pixel at a time, starting at 16px, until the measured
/// width reaches `available`. Returns the first size that fills the width.
pub fn fit_font_size(available: f64, mut measure: impl FnMut(u32) -> f64) -> u32 {
    let mut size = START_FONT_SIZE;
    while measure(size) < available && size < MAX_FONT_SIZE {
        size += 1;
    }
    size
}

/// What changed on the page with the last [`Page::show`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageUpdate {
    pub background: bool,
    pub name: bool,
    pub scroll_hint: bool,
}

pub struct Page {
    shown: Option<TimelineState>,
    #[cfg(target_arch = "wasm32")]
    dom: Option<dom::Dom>,
}

impl Page {
    /// In the browser a page without the expected elements is logged and left
    /// alone, the canvas keeps rendering.
    pub fn new() -> Self {
        Self {
            shown: None,
            #[cfg(target_arch = "wasm32")]
            dom: dom::Dom::new()
                .inspect_err(|e| log::error!("page overlay disabled: {e:#}"))
                .ok(),
        }
    }

    pub fn shown(&self) -> Option<&TimelineState> {
        self.shown.as_ref()
    }

    /// Bring the page in line with `state`, touching only what changed.
    pub fn show(&mut self, state: &TimelineState) -> PageUpdate {
        let previous = self.shown.as_ref();
        let update = PageUpdate {
            background: previous.is_none_or(|p| p.background != state.background),
            name: previous.is_none_or(|p| p.name != state.name),
            scroll_hint: previous.is_none_or(|p| p.scroll_hint != state.scroll_hint),
        };
        #[cfg(target_arch = "wasm32")]
        let offset_changed = previous.is_none_or(|p| p.name_offset != state.name_offset);

        #[cfg(target_arch = "wasm32")]
        if let Some(dom) = &self.dom {
            if update.background {
                dom.set_background(&state.background.to_css());
            }
            if offset_changed {
                dom.set_name_offset(state.name_offset);
            }
            if update.name {
                dom.set_name(&state.name);
            }
            if update.scroll_hint {
                dom.set_scroll_hint(&state.scroll_hint);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            if update.name {
                log::info!("showing {}", state.name);
            }
            if update.scroll_hint {
                log::info!("{}", state.scroll_hint);
            }
        }

        self.shown = Some(state.clone());
        update
    }

    /// Size the scroll container. Only meaningful in the browser.
    pub fn set_container_height(&self, height: f64) {
        #[cfg(target_arch = "wasm32")]
        if let Some(dom) = &self.dom {
            dom.set_container_height(height);
        }
        #[cfg(not(target_arch = "wasm32"))]
        log::debug!("virtual page height {height}px");
    }

    /// Fit the fruit name to the viewport width minus `padding`.
    pub fn fit_name(&self, viewport: Viewport, padding: f64) -> u32 {
        let available = viewport.width - padding;
        #[cfg(target_arch = "wasm32")]
        if let Some(dom) = &self.dom {
            let size = fit_font_size(available, |size| dom.measure_name(size));
            log::debug!("name fitted at {size}px for {available}px");
            return size;
        }
        // Without a layout engine a glyph is assumed to be about 0.6em wide
        let glyphs = self.shown.as_ref().map_or(1, |s| s.name.chars().count().max(1));
        let size = fit_font_size(available, |size| glyphs as f64 * size as f64 * 0.6);
        log::debug!("name fitted at {size}px for {available}px");
        size
    }

    /// Current scroll offset of the document, `None` without a document.
    pub fn scroll_y(&self) -> Option<f64> {
        #[cfg(target_arch = "wasm32")]
        return self.dom.as_ref().and_then(|dom| dom.scroll_y());
        #[cfg(not(target_arch = "wasm32"))]
        None
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use anyhow::{Context, anyhow};
    use wasm_bindgen::JsCast;
    use web_sys::HtmlElement;

    use super::{CONTAINER_ID, NAME_ID, NAME_SPAN_ID, SCROLL_TEXT_ID};

    pub(super) struct Dom {
        window: web_sys::Window,
        container: HtmlElement,
        name: HtmlElement,
        name_span: HtmlElement,
        scroll_text: HtmlElement,
    }

    fn element(document: &web_sys::Document, id: &str) -> anyhow::Result<HtmlElement> {
        document
            .get_element_by_id(id)
            .with_context(|| format!("the page has no #{id} element"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| anyhow!("#{id} is not an html element"))
    }

    fn set_style(element: &HtmlElement, property: &str, value: &str) {
        if let Err(e) = element.style().set_property(property, value) {
            log::warn!("cannot set {property} to {value}: {e:?}");
        }
    }

    impl Dom {
        pub(super) fn new() -> anyhow::Result<Self> {
            let window = web_sys::window().context("no window")?;
            let document = window.document().context("no document")?;
            Ok(Self {
                container: element(&document, CONTAINER_ID)?,
                name: element(&document, NAME_ID)?,
                name_span: element(&document, NAME_SPAN_ID)?,
                scroll_text: element(&document, SCROLL_TEXT_ID)?,
                window,
            })
        }

        pub(super) fn set_container_height(&self, height: f64) {
            set_style(&self.container, "height", &format!("{height}px"));
        }

        pub(super) fn set_background(&self, css: &str) {
            set_style(&self.container, "background-color", css);
        }

        pub(super) fn set_name_offset(&self, percent: f32) {
            set_style(&self.name_span, "transform", &format!("translateY({percent}%)"));
        }

        pub(super) fn set_name(&self, name: &str) {
            self.name_span.set_text_content(Some(name));
        }

        pub(super) fn set_scroll_hint(&self, hint: &str) {
            self.scroll_text.set_text_content(Some(hint));
        }

        pub(super) fn measure_name(&self, font_size: u32) -> f64 {
            set_style(&self.name, "font-size", &format!("{font_size}px"));
            self.name.offset_width() as f64
        }

        pub(super) fn scroll_y(&self) -> Option<f64> {
            self.window.scroll_y().ok()
        }
    }
}
