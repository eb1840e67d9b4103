#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, render_pattern_set_to_png, render_pattern_to_png, PatternStyle, RenderConfig,
};
