pub mod workshop;

pub use workshop::FlowWorkshop;
