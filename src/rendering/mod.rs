pub mod charts;
pub mod svg_to_png;

pub use charts::{render_example_charts, ExampleData};
pub use svg_to_png::SvgRasterizer;
