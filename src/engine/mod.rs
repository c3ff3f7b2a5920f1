// Engine module - reusable swimming components and systems
// The Swimmer is host-agnostic; systems.rs wires it into a bevy_ecs World.

pub mod area;
pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod swimmer;
pub mod systems;

// Re-export commonly used items
pub use area::{AnnulusArea, AreaSampler, FISH_REGION, SwimRegion};
pub use clock::{FixedClock, FixedStepper};
pub use components::*;
pub use config::{ConfigError, SimConfig};
pub use error::SwimError;
pub use swimmer::{SpeedJitter, SwimState, Swimmer, TickOutcome};
