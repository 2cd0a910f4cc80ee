pub mod backend;
pub mod blur;
pub mod compositor;
pub mod cpu;
pub mod pattern;
pub mod plan;
pub mod shapes;
