//! TCP vehicle link client.
//!
//! Commands go out on the write half of the stream; a cloned read half
//! is handed to a dedicated reader so telemetry decoding never blocks
//! command delivery.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{GaganError, Result};
use crate::link::VehicleLink;
use crate::planning::Waypoint;
use crate::wire::{Command, Serializer, TelemetryEvent};

/// TCP client for the vehicle link.
pub struct VehicleClient {
    stream: TcpStream,
    serializer: Serializer,
}

impl VehicleClient {
    /// Connect with timeout.
    pub fn connect_timeout(addr: &str, timeout: Duration) -> Result<Self> {
        let sock_addr: std::net::SocketAddr = addr
            .parse()
            .map_err(|e| GaganError::Config(format!("Invalid address {:?}: {}", addr, e)))?;
        let stream = TcpStream::connect_timeout(&sock_addr, timeout)?;
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            serializer: Serializer::default(),
        })
    }

    /// Split off a telemetry reader sharing the same connection.
    pub fn telemetry_reader(&self) -> Result<TelemetryReader> {
        let stream = self.stream.try_clone()?;
        Ok(TelemetryReader {
            stream,
            serializer: self.serializer,
        })
    }

    fn send(&mut self, command: &Command) -> Result<()> {
        let frame = self.serializer.encode_frame(command)?;
        self.stream.write_all(&frame)?;
        self.stream.flush()?;
        Ok(())
    }
}

impl VehicleLink for VehicleClient {
    fn arm(&mut self) -> Result<()> {
        self.send(&Command::Arm)
    }

    fn disarm(&mut self) -> Result<()> {
        self.send(&Command::Disarm)
    }

    fn take_control(&mut self) -> Result<()> {
        self.send(&Command::TakeControl)
    }

    fn release_control(&mut self) -> Result<()> {
        self.send(&Command::ReleaseControl)
    }

    fn takeoff(&mut self, altitude: f32) -> Result<()> {
        self.send(&Command::Takeoff { altitude })
    }

    fn land(&mut self) -> Result<()> {
        self.send(&Command::Land)
    }

    fn cmd_position(&mut self, north: f32, east: f32, altitude: f32, heading: f32) -> Result<()> {
        self.send(&Command::Position {
            north,
            east,
            altitude,
            heading,
        })
    }

    fn set_home(&mut self, longitude: f64, latitude: f64, altitude: f64) -> Result<()> {
        self.send(&Command::SetHome {
            longitude,
            latitude,
            altitude,
        })
    }

    fn stop(&mut self) -> Result<()> {
        self.send(&Command::Stop)
    }

    fn broadcast_waypoints(&mut self, waypoints: &[Waypoint]) -> Result<()> {
        self.send(&Command::WaypointPlan {
            waypoints: waypoints.to_vec(),
        })
    }
}

/// Blocking telemetry frame reader over a cloned stream.
pub struct TelemetryReader {
    stream: TcpStream,
    serializer: Serializer,
}

impl TelemetryReader {
    /// Read the next telemetry event. Blocks until a full frame arrives.
    pub fn read_event(&mut self) -> Result<TelemetryEvent> {
        let mut len_buf = [0u8; 4];
        self.stream.read_exact(&mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;
        self.serializer.check_frame_len(len)?;

        let mut payload = vec![0u8; len];
        self.stream.read_exact(&mut payload)?;
        self.serializer.deserialize(&payload)
    }
}
