//! Geodetic to local Cartesian frame conversion.
//!
//! Uses an equirectangular approximation about the home reference, which
//! is accurate to well under a meter over the few-kilometer extents the
//! planner operates on. The local frame is (north, east, down).

use crate::colliders::HomePosition;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geodetic position (degrees, meters).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlobalPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

/// Local Cartesian position relative to home (meters, NED).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalPosition {
    pub north: f32,
    pub east: f32,
    pub down: f32,
}

/// Local velocity in the NED frame (m/s).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalVelocity {
    pub north: f32,
    pub east: f32,
    pub down: f32,
}

/// Convert a geodetic position to a local (north, east, down) offset
/// relative to the home reference.
pub fn global_to_local(global: GlobalPosition, home: HomePosition) -> LocalPosition {
    let north = (global.latitude - home.latitude).to_radians() * EARTH_RADIUS_M;
    let east = (global.longitude - home.longitude).to_radians()
        * EARTH_RADIUS_M
        * home.latitude.to_radians().cos();
    let down = -(global.altitude - home.altitude);

    LocalPosition {
        north: north as f32,
        east: east as f32,
        down: down as f32,
    }
}

/// Convert a local (north, east, down) offset back to a geodetic position.
pub fn local_to_global(local: LocalPosition, home: HomePosition) -> GlobalPosition {
    let latitude = home.latitude + (local.north as f64 / EARTH_RADIUS_M).to_degrees();
    let longitude = home.longitude
        + (local.east as f64 / (EARTH_RADIUS_M * home.latitude.to_radians().cos())).to_degrees();
    let altitude = home.altitude - local.down as f64;

    GlobalPosition {
        longitude,
        latitude,
        altitude,
    }
}
