/// UI layer: filter panel, top bar, and per-tab chart rendering.

pub mod charts;
pub mod panels;
pub mod tabs;
