//! SVG board renderer
//!
//! Elements are looked up by id on every write so the page may be rebuilt
//! underneath us. A missing element is reported once and then skipped.

use game_core::{Attr, Element, Renderer};
use std::collections::HashSet;
use web_sys::Document;

pub struct SvgRenderer {
    document: Document,
    missing: HashSet<Element>,
}

impl SvgRenderer {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            missing: HashSet::new(),
        }
    }
}

impl Renderer for SvgRenderer {
    fn set_position(&mut self, element: Element, attr: Attr, value: f32) {
        let Some(node) = self.document.get_element_by_id(element.id()) else {
            if self.missing.insert(element) {
                log::warn!("no #{} on the page, not drawing it", element.id());
            }
            return;
        };
        self.missing.remove(&element);

        if let Err(err) = node.set_attribute(attr.name(), &value.to_string()) {
            log::warn!("failed to set {} on #{}: {err:?}", attr.name(), element.id());
        }
    }
}
