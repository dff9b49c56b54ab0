pub mod message;
pub mod publish_wizard;
pub mod viewer;
