mod notification_component;

pub use notification_component::NotificationComponent;
