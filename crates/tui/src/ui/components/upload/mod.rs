mod upload_component;

pub use upload_component::UploadComponent;
