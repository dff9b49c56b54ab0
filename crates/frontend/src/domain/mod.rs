pub mod a001_flow_artifact;
pub mod a003_flow_agent;
