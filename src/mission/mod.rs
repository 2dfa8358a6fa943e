//! Mission state machine sequencing a single autonomous flight.

mod controller;
mod state;

pub use controller::MissionController;
pub use state::FlightState;
