//! Wire format for the vehicle link.
//!
//! All TCP traffic is length-prefixed: a 4-byte big-endian length followed
//! by the serialized payload. Two payload formats are supported: postcard
//! (binary, default) and JSON for debugging with cross-language tools.
//! Messages above 1MB are rejected.

use serde::{Deserialize, Serialize};

use crate::error::{GaganError, Result};
use crate::planning::Waypoint;

/// Maximum message size (1MB)
pub const MAX_MESSAGE_SIZE: usize = 1_048_576;

/// Supported payload formats
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WireFormat {
    /// Binary format using postcard - fast and compact
    #[default]
    Postcard,
    /// JSON format - human-readable for debugging
    Json,
}

/// Command sent to the vehicle link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Arm,
    Disarm,
    TakeControl,
    ReleaseControl,
    Takeoff {
        altitude: f32,
    },
    Land,
    Position {
        north: f32,
        east: f32,
        altitude: f32,
        heading: f32,
    },
    SetHome {
        longitude: f64,
        latitude: f64,
        altitude: f64,
    },
    Stop,
    /// Full planned route, broadcast for visualization only
    WaypointPlan {
        waypoints: Vec<Waypoint>,
    },
}

/// Telemetry delivered asynchronously by the vehicle link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    LocalPosition {
        north: f32,
        east: f32,
        down: f32,
    },
    LocalVelocity {
        north: f32,
        east: f32,
        down: f32,
    },
    GlobalPosition {
        longitude: f64,
        latitude: f64,
        altitude: f64,
    },
    State {
        armed: bool,
        guided: bool,
    },
}

/// Serializer that can handle both formats
#[derive(Clone, Copy, Debug, Default)]
pub struct Serializer {
    format: WireFormat,
}

impl Serializer {
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    /// Serialize a message payload (without framing).
    pub fn serialize<T: Serialize>(&self, msg: &T) -> Result<Vec<u8>> {
        match self.format {
            WireFormat::Postcard => {
                postcard::to_allocvec(msg).map_err(|e| GaganError::Protocol(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::to_vec(msg).map_err(|e| GaganError::Protocol(e.to_string()))
            }
        }
    }

    /// Deserialize a message payload (without framing).
    pub fn deserialize<T: for<'de> Deserialize<'de>>(&self, bytes: &[u8]) -> Result<T> {
        match self.format {
            WireFormat::Postcard => {
                postcard::from_bytes(bytes).map_err(|e| GaganError::Protocol(e.to_string()))
            }
            WireFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| GaganError::Protocol(e.to_string()))
            }
        }
    }

    /// Serialize a message with the 4-byte big-endian length prefix.
    pub fn encode_frame<T: Serialize>(&self, msg: &T) -> Result<Vec<u8>> {
        let payload = self.serialize(msg)?;
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(GaganError::Protocol(format!(
                "Message of {} bytes exceeds maximum",
                payload.len()
            )));
        }

        let mut frame = Vec::with_capacity(4 + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Validate a frame length read from the length prefix.
    pub fn check_frame_len(&self, len: usize) -> Result<()> {
        if len > MAX_MESSAGE_SIZE {
            return Err(GaganError::Protocol(format!(
                "Frame of {} bytes exceeds maximum",
                len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_frame_round_trip() {
        let serializer = Serializer::new(WireFormat::Postcard);
        let cmd = Command::Position {
            north: 10.0,
            east: -3.5,
            altitude: 5.0,
            heading: 0.0,
        };

        let frame = serializer.encode_frame(&cmd).unwrap();
        let len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
        assert_eq!(len, frame.len() - 4);

        let decoded: Command = serializer.deserialize(&frame[4..]).unwrap();
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn test_json_format() {
        let serializer = Serializer::new(WireFormat::Json);
        let event = TelemetryEvent::State {
            armed: true,
            guided: false,
        };
        let bytes = serializer.serialize(&event).unwrap();
        let decoded: TelemetryEvent = serializer.deserialize(&bytes).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_waypoint_plan_encodes() {
        let serializer = Serializer::default();
        let cmd = Command::WaypointPlan {
            waypoints: vec![
                Waypoint {
                    north: 0.0,
                    east: 0.0,
                    altitude: 5.0,
                    heading: 0.0,
                },
                Waypoint {
                    north: 10.0,
                    east: 10.0,
                    altitude: 5.0,
                    heading: 0.0,
                },
            ],
        };
        let frame = serializer.encode_frame(&cmd).unwrap();
        assert!(frame.len() > 4);
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let serializer = Serializer::default();
        assert!(serializer.check_frame_len(MAX_MESSAGE_SIZE + 1).is_err());
        assert!(serializer.check_frame_len(64).is_ok());
    }
}
