pub mod agent;
pub mod config;
pub mod error;
pub mod kernel;
pub mod platform;
pub mod samplers;

pub use agent::{Agent, AgentStatus};
pub use config::AgentConfig;
pub use error::AgentError;
pub use kernel::permission::PermissionKind;
