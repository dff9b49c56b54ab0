pub mod details;
pub mod list;
pub mod options;
pub mod publish;

pub use details::ArtifactViewer;
pub use list::ArtifactGallery;
pub use publish::PublishModal;
