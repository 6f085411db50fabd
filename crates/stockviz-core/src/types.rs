// File: crates/stockviz-core/src/types.rs
// Summary: Shared types and constants (sizes, paddings, render artifacts).

/// Default surface width in pixels.
pub const WIDTH: i32 = 800;
/// Default surface height in pixels.
pub const HEIGHT: i32 = 400;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
}

impl Default for Insets {
    /// Room for the right-hand price scale and the time labels below.
    fn default() -> Self {
        Self::new(12, 72, 12, 28)
    }
}

/// A rendered chart, ready to be attached to a container.
#[derive(Clone, Debug, PartialEq)]
pub enum Artifact {
    Png(Vec<u8>),
    Svg(String),
}

impl Artifact {
    pub fn extension(&self) -> &'static str {
        match self {
            Artifact::Png(_) => "png",
            Artifact::Svg(_) => "svg",
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Artifact::Png(bytes) => bytes,
            Artifact::Svg(text) => text.as_bytes(),
        }
    }
}
