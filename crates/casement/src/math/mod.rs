//! Page-space geometry
//!
//! Positions are CSS pixels relative to the page viewport, matching the
//! coordinates reported by pointer events (`clientX`/`clientY`).

mod point;

pub use point::Vec2;
