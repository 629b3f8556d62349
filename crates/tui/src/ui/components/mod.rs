//! UI components: upload row, palette swatches, notification modal, hints.

pub mod common;
pub mod component;
pub mod hint_bar;
pub mod notification;
pub mod swatches;
pub mod upload;

pub(crate) use component::Component;
pub use hint_bar::HintBarComponent;
pub use notification::NotificationComponent;
pub use swatches::SwatchesComponent;
pub use upload::UploadComponent;
