//! Flow Artifact Viewer
//!
//! Прохождение опубликованного эксперимента: инструкции, песочница,
//! секундомер, анкета после завершения.
//!
//! Структура:
//! - model.rs: запросы к API (карточка, предпросмотр, plays/likes, сессии)
//! - view_model.rs: состояние прохождения и анкеты
//! - view.rs: компонент

mod model;
mod view;
mod view_model;

pub use view::ArtifactViewer;
pub use view_model::ArtifactViewerVm;
