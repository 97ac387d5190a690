//! village - Explorable pixel village
//!
//! Re-exports the map data types and the world runtime, and adds the app
//! controller that switches between the walkable hub and content views.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use village::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins((VillageRuntimePlugin, VillageAppPlugin))
//!         .run();
//! }
//! ```

pub mod controller;

pub use village_core;
pub use village_runtime;

pub use controller::{AppSession, AppView, VillageAppPlugin};

/// Commonly used types
pub mod prelude {
    pub use crate::controller::{AppSession, AppView, VillageAppPlugin};
    pub use village_core::{AssetDefinition, MapDocument};
    pub use village_runtime::prelude::*;
}
