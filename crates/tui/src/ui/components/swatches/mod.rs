mod color;
mod swatches_component;

pub use swatches_component::SwatchesComponent;
