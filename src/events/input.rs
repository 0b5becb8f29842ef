use serde::{Deserialize, Serialize};

use crate::core::{EngineError, Result};

/// Camera zoom step from the presentation layer: `-1` out, `+1` in.
///
/// Zero-magnitude input is rejected at construction; larger magnitudes are
/// clamped to a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomInput(i32);

impl ZoomInput {
    pub fn new(direction: i32) -> Result<Self> {
        if direction == 0 {
            return Err(EngineError::ZeroZoom);
        }
        Ok(Self(direction.signum()))
    }

    pub fn step(self) -> i32 {
        self.0
    }

    pub fn is_zoom_in(self) -> bool {
        self.0 > 0
    }
}
