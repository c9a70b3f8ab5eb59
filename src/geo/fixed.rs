//! User-supplied position
//!
//! Stands in for a device capability when the user types a coordinate.

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::{PositionFix, PositionOptions, PositionProvider};

/// Position capability that always reports the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionProvider {
    coords: Coordinate,
}

impl FixedPositionProvider {
    pub fn new(coords: Coordinate) -> Self {
        Self { coords }
    }
}

impl PositionProvider for FixedPositionProvider {
    async fn current_position(&self, _options: &PositionOptions) -> Result<PositionFix> {
        self.coords
            .validate()
            .map_err(|e| Error::PositionUnavailable(e.to_string()))?;
        Ok(PositionFix::now(self.coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_position() {
        let provider = FixedPositionProvider::new(Coordinate::new(12.97, 77.59));
        let fix = provider
            .current_position(&PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(fix.coords, Coordinate::new(12.97, 77.59));
    }

    #[tokio::test]
    async fn test_out_of_range_is_unavailable() {
        let provider = FixedPositionProvider::new(Coordinate::new(120.0, 0.0));
        let err = provider
            .current_position(&PositionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PositionUnavailable(_)));
    }
}
