mod linkage;
mod scc;
mod visibility;

pub use linkage::{LinkageMismatch, check_target};
pub use scc::strongly_connected_dependencies;
pub use visibility::Visibility;
