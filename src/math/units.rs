//! Unit boundaries.
//!
//! World geometry is kept in centimetres. Stored records use millimetres and
//! displayed areas use square metres.

/// Millimetres per world unit.
pub const STORE_UNITS_PER_WORLD: f64 = 10.0;

/// World units² per square metre.
pub const WORLD_AREA_PER_SQUARE_METRE: f64 = 10_000.0;

/// Converts a world length (cm) to store units (mm).
#[must_use]
pub fn to_store(world: f64) -> f64 {
    world * STORE_UNITS_PER_WORLD
}

/// Converts a store length (mm) to world units (cm).
#[must_use]
pub fn from_store(store: f64) -> f64 {
    store / STORE_UNITS_PER_WORLD
}

/// Converts a world area (cm²) to square metres.
#[must_use]
pub fn area_to_square_metres(world_area: f64) -> f64 {
    world_area / WORLD_AREA_PER_SQUARE_METRE
}

/// Converts square metres back to world area (cm²).
#[must_use]
pub fn area_from_square_metres(square_metres: f64) -> f64 {
    square_metres * WORLD_AREA_PER_SQUARE_METRE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_round_trip_has_no_drift() {
        let mut stored = 200.0;
        for _ in 0..50 {
            let world = from_store(stored);
            assert!((world - 20.0).abs() < f64::EPSILON, "world={world}");
            stored = to_store(world);
        }
        assert!((stored - 200.0).abs() < f64::EPSILON, "stored={stored}");
    }

    #[test]
    fn area_conversion() {
        assert!((area_to_square_metres(120_000.0) - 12.0).abs() < 1e-12);
        assert!((area_from_square_metres(12.0) - 120_000.0).abs() < 1e-9);
    }
}
