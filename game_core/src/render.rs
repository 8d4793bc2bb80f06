//! Renderer contract consumed by the session
//!
//! The session pushes positions; whether an element exists on the page is
//! the renderer's business.

use crate::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    LeftPaddle,
    RightPaddle,
    Ball,
}

impl Element {
    pub fn paddle(side: Side) -> Self {
        match side {
            Side::Left => Element::LeftPaddle,
            Side::Right => Element::RightPaddle,
        }
    }

    /// DOM id of the SVG element
    pub fn id(self) -> &'static str {
        match self {
            Element::LeftPaddle => "left-paddle",
            Element::RightPaddle => "right-paddle",
            Element::Ball => "ball",
        }
    }
}

/// Position attribute: `x`/`y` for rects, `cx`/`cy` for the ball circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    X,
    Y,
    Cx,
    Cy,
}

impl Attr {
    pub fn name(self) -> &'static str {
        match self {
            Attr::X => "x",
            Attr::Y => "y",
            Attr::Cx => "cx",
            Attr::Cy => "cy",
        }
    }
}

pub trait Renderer {
    fn set_position(&mut self, element: Element, attr: Attr, value: f32);
}

/// Renderer for headless sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn set_position(&mut self, _element: Element, _attr: Attr, _value: f32) {}
}
