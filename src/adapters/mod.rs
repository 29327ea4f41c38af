//! Forge adapters implementing ForgePort trait

pub mod forge_port;
pub mod github;
pub mod mock_forge;

pub use forge_port::{ForgeError, ForgePort, ForgeResult};
pub use github::GitHubAdapter;
pub use mock_forge::{MockCall, MockError, MockForge};
