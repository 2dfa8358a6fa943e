//! Telemetry-driven mission state machine.
//!
//! The controller reacts to [`TelemetryEvent`] values delivered one at a
//! time by a single consumer, so handlers run to completion before the
//! next event and no locking is needed around the flight state or the
//! waypoint queue.

use std::collections::VecDeque;
use std::path::Path;

use crate::colliders::{self, HomePosition};
use crate::config::NavConfig;
use crate::error::Result;
use crate::frame::{self, GlobalPosition, LocalPosition, LocalVelocity};
use crate::link::VehicleLink;
use crate::planning::{self, Connectivity, Waypoint};
use crate::wire::TelemetryEvent;

use super::state::FlightState;

/// Fraction of target altitude at which takeoff is considered complete.
const TAKEOFF_ALTITUDE_FRACTION: f32 = 0.95;
/// Horizontal capture radius for waypoints (meters).
const WAYPOINT_CAPTURE_RADIUS: f32 = 1.0;
/// Horizontal speed below which landing may begin (m/s).
const LANDING_SPEED_LIMIT: f32 = 1.0;
/// Altitude above home below which the vehicle counts as down (meters).
const TOUCHDOWN_ALTITUDE: f64 = 0.1;
/// Vertical position tolerance for touchdown (meters).
const TOUCHDOWN_POSITION_TOLERANCE: f32 = 0.01;

/// Read-only mirrors of vehicle telemetry, updated from events.
#[derive(Clone, Copy, Debug, Default)]
struct TelemetryMirror {
    local_position: LocalPosition,
    local_velocity: LocalVelocity,
    global_position: GlobalPosition,
    global_home: HomePosition,
    armed: bool,
    guided: bool,
}

/// Mission state machine sequencing arming, planning, takeoff, waypoint
/// following, landing, and disarming over a vehicle link.
pub struct MissionController<L: VehicleLink> {
    link: L,
    config: NavConfig,
    state: FlightState,
    /// Current commanded pose
    target: Waypoint,
    /// Remaining route, consumed front-first
    waypoints: VecDeque<Waypoint>,
    in_mission: bool,
    telemetry: TelemetryMirror,
}

impl<L: VehicleLink> MissionController<L> {
    pub fn new(link: L, config: NavConfig) -> Self {
        Self {
            link,
            config,
            state: FlightState::Manual,
            target: Waypoint::default(),
            waypoints: VecDeque::new(),
            in_mission: true,
            telemetry: TelemetryMirror::default(),
        }
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Mission is active until the DISARMING -> MANUAL transition clears it.
    pub fn in_mission(&self) -> bool {
        self.in_mission
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Dispatch one telemetry event. Updates the matching mirror first,
    /// then runs the handler for the current flight state.
    pub fn handle_event(&mut self, event: TelemetryEvent) -> Result<()> {
        match event {
            TelemetryEvent::LocalPosition { north, east, down } => {
                self.telemetry.local_position = LocalPosition { north, east, down };
                self.on_local_position()
            }
            TelemetryEvent::LocalVelocity { north, east, down } => {
                self.telemetry.local_velocity = LocalVelocity { north, east, down };
                self.on_velocity()
            }
            TelemetryEvent::GlobalPosition {
                longitude,
                latitude,
                altitude,
            } => {
                self.telemetry.global_position = GlobalPosition {
                    longitude,
                    latitude,
                    altitude,
                };
                Ok(())
            }
            TelemetryEvent::State { armed, guided } => {
                self.telemetry.armed = armed;
                self.telemetry.guided = guided;
                self.on_state()
            }
        }
    }

    fn on_local_position(&mut self) -> Result<()> {
        match self.state {
            FlightState::Takeoff => {
                let altitude = -self.telemetry.local_position.down;
                if altitude > TAKEOFF_ALTITUDE_FRACTION * self.target.altitude {
                    self.waypoint_transition()
                } else {
                    Ok(())
                }
            }
            FlightState::Waypoint => {
                let dn = self.target.north - self.telemetry.local_position.north;
                let de = self.target.east - self.telemetry.local_position.east;
                if (dn * dn + de * de).sqrt() < WAYPOINT_CAPTURE_RADIUS {
                    if !self.waypoints.is_empty() {
                        self.waypoint_transition()
                    } else {
                        let vn = self.telemetry.local_velocity.north;
                        let ve = self.telemetry.local_velocity.east;
                        if (vn * vn + ve * ve).sqrt() < LANDING_SPEED_LIMIT {
                            self.landing_transition()
                        } else {
                            Ok(())
                        }
                    }
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    fn on_velocity(&mut self) -> Result<()> {
        if self.state == FlightState::Landing {
            let above_home =
                self.telemetry.global_position.altitude - self.telemetry.global_home.altitude;
            if above_home < TOUCHDOWN_ALTITUDE
                && self.telemetry.local_position.down.abs() < TOUCHDOWN_POSITION_TOLERANCE
            {
                return self.disarming_transition();
            }
        }
        Ok(())
    }

    fn on_state(&mut self) -> Result<()> {
        if !self.in_mission {
            return Ok(());
        }
        match self.state {
            FlightState::Manual => self.arming_transition(),
            FlightState::Arming => {
                if self.telemetry.armed {
                    if let Err(e) = self.plan_path() {
                        // No recovery path for planning failure: leave the
                        // vehicle safe and end the mission via the normal
                        // disarm sequence
                        tracing::error!("Planning failed, aborting mission: {}", e);
                        self.disarming_transition()
                    } else {
                        Ok(())
                    }
                } else {
                    Ok(())
                }
            }
            FlightState::Planning => self.takeoff_transition(),
            FlightState::Disarming => {
                if !self.telemetry.armed && !self.telemetry.guided {
                    self.manual_transition()
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    fn arming_transition(&mut self) -> Result<()> {
        self.state = FlightState::Arming;
        tracing::info!("{} transition", self.state);
        self.link.arm()?;
        self.link.take_control()
    }

    /// Run the planning pipeline and populate the waypoint queue.
    fn plan_path(&mut self) -> Result<()> {
        self.state = FlightState::Planning;
        tracing::info!("Searching for a path ...");

        let target_altitude = self.config.planning.target_altitude;
        let safety_distance = self.config.planning.safety_distance;
        self.target.altitude = target_altitude;

        let data = colliders::load(Path::new(&self.config.planning.colliders_path))?;
        self.telemetry.global_home = data.home;
        self.link
            .set_home(data.home.longitude, data.home.latitude, data.home.altitude)?;

        // Convert current and goal positions exactly once each
        let start = frame::global_to_local(self.telemetry.global_position, data.home);
        let goal_global = GlobalPosition {
            longitude: self.config.mission.goal_longitude,
            latitude: self.config.mission.goal_latitude,
            altitude: self.config.mission.goal_altitude,
        };
        let goal = frame::global_to_local(goal_global, data.home);

        let connectivity = if self.config.planning.connectivity == 4 {
            Connectivity::Four
        } else {
            Connectivity::Eight
        };

        let waypoints = planning::plan_route(
            &data.obstacles,
            start,
            goal,
            target_altitude,
            safety_distance,
            connectivity,
            self.config.planning.max_iterations,
        )?;

        // Visualization side-effect only, never fatal to the mission
        if let Err(e) = self.link.broadcast_waypoints(&waypoints) {
            tracing::warn!("Waypoint broadcast failed: {}", e);
        }

        self.waypoints = waypoints.into();
        Ok(())
    }

    fn takeoff_transition(&mut self) -> Result<()> {
        self.state = FlightState::Takeoff;
        tracing::info!("{} transition", self.state);
        self.link.takeoff(self.target.altitude)
    }

    fn waypoint_transition(&mut self) -> Result<()> {
        self.state = FlightState::Waypoint;
        tracing::info!("{} transition", self.state);
        match self.waypoints.pop_front() {
            Some(waypoint) => {
                tracing::info!(
                    "target position ({:.1}, {:.1}, {:.1})",
                    waypoint.north,
                    waypoint.east,
                    waypoint.altitude
                );
                self.target = waypoint;
                self.link.cmd_position(
                    waypoint.north,
                    waypoint.east,
                    waypoint.altitude,
                    waypoint.heading,
                )
            }
            None => self.landing_transition(),
        }
    }

    fn landing_transition(&mut self) -> Result<()> {
        self.state = FlightState::Landing;
        tracing::info!("{} transition", self.state);
        self.link.land()
    }

    fn disarming_transition(&mut self) -> Result<()> {
        self.state = FlightState::Disarming;
        tracing::info!("{} transition", self.state);
        self.link.disarm()?;
        self.link.release_control()
    }

    fn manual_transition(&mut self) -> Result<()> {
        self.state = FlightState::Manual;
        tracing::info!("{} transition", self.state);
        self.link.stop()?;
        self.in_mission = false;
        Ok(())
    }
}
