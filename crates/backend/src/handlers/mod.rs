pub mod a001_flow_artifact;
pub mod a002_artifact_session;
pub mod a003_flow_agent;
pub mod messages;
