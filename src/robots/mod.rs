//! Entity model.
//!
//! Robots carry position, facing, health, lives, flag progress, a backup
//! point and an open [`CapabilitySet`](crate::tiles::CapabilitySet). There
//! is no player/non-player type split: a non-player robot is simply one
//! without the flag-collecting capability.

mod robot;

pub use robot::{LifeChange, Robot, RobotSpec, RobotStatus};
