pub mod collapse;
pub mod orchestrator;
pub mod registry;

pub use collapse::CollapseController;
pub use orchestrator::{WidgetLoad, init_widgets, init_with_config};
pub use registry::{InstanceState, InstanceStatus, WidgetRegistry};
