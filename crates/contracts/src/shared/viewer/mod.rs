//! Логика просмотра артефакта: выбор песочницы и хронометраж прохождения

pub mod experiment_run;
pub mod sandbox;

pub use experiment_run::{ExperimentPhase, ExperimentRun};
pub use sandbox::{select_template, SandboxPreview, SandboxTemplate};
