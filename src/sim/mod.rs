//! Deterministic simulation module
//!
//! All driving logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by each run
//! - Stable iteration order (placement order for traffic)
//! - No rendering or platform dependencies

pub mod car;
pub mod geometry;
pub mod rng;
pub mod road;
pub mod sensor;
pub mod state;
pub mod tick;

pub use car::{Car, CarColor, CarId, CarRole, Footprint, FootprintSource, SpriteFootprints};
pub use geometry::{Line, Rect, intersects, rectangle_edges, segment_intersection};
pub use rng::{Randomizer, Seed};
pub use road::{Lane, LaneId, Road, Wall};
pub use sensor::{SENSOR_LAYOUT, Sensor};
pub use state::{SimPhase, SimulationState};
pub use tick::Action;
