pub mod home;
pub mod status_bar;

use gui::page::PageRegistry;
use std::sync::Arc;

pub fn build_registry() -> PageRegistry {
    let mut registry = PageRegistry::new();
    registry.register(Arc::new(home::HomePage));
    registry.register(Arc::new(status_bar::StatusBarPage));
    registry
}
