pub mod layout;
pub mod renderer;
pub mod view;

pub use layout::{HitTarget, WidgetLayout};
pub use renderer::{RendererError, WidgetRenderer};
pub use view::{NodeKind, ViewModel, ViewNode, ViewTree, test_ids};
