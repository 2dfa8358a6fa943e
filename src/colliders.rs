//! Obstacle data file parsing.
//!
//! The colliders file starts with a home reference line:
//!
//! ```text
//! lat0 37.792480, lon0 -122.397450
//! ```
//!
//! followed by a column header line and one CSV record per obstacle:
//! `north,east,alt,d_north,d_east,d_alt` (center + half-extents, meters).

use std::path::Path;

use crate::error::{GaganError, Result};

/// One physical obstacle: center and half-extents in local Cartesian meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleRecord {
    pub north: f32,
    pub east: f32,
    pub alt: f32,
    pub d_north: f32,
    pub d_east: f32,
    pub d_alt: f32,
}

/// Geodetic home reference from the file header.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HomePosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Parsed obstacle data file.
#[derive(Clone, Debug)]
pub struct ColliderData {
    pub home: HomePosition,
    pub obstacles: Vec<ObstacleRecord>,
}

/// Load home reference and obstacle records from a colliders file.
pub fn load(path: &Path) -> Result<ColliderData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GaganError::Config(format!("Failed to read {:?}: {}", path, e)))?;
    parse(&content)
}

/// Parse colliders file content.
pub fn parse(content: &str) -> Result<ColliderData> {
    let mut lines = content.lines();

    let home_line = lines
        .next()
        .ok_or_else(|| GaganError::Config("Obstacle file is empty".into()))?;
    let home = parse_home_line(home_line)?;

    // Column header line, ignored
    lines.next();

    let mut obstacles = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        obstacles.push(parse_record(line).map_err(|e| {
            GaganError::Config(format!("Bad obstacle record on line {}: {}", i + 3, e))
        })?);
    }

    Ok(ColliderData { home, obstacles })
}

/// Parse the `lat0 <f>, lon0 <f>` header line.
fn parse_home_line(line: &str) -> Result<HomePosition> {
    let mut lat = None;
    let mut lon = None;

    for part in line.split(',') {
        let mut tokens = part.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some("lat0"), Some(v)) => {
                lat = v.parse::<f64>().ok();
            }
            (Some("lon0"), Some(v)) => {
                lon = v.parse::<f64>().ok();
            }
            _ => {}
        }
    }

    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Ok(HomePosition {
            latitude,
            longitude,
            altitude: 0.0,
        }),
        _ => Err(GaganError::Config(format!(
            "Missing or malformed home line: {:?}",
            line
        ))),
    }
}

/// Parse one `north,east,alt,d_north,d_east,d_alt` record.
fn parse_record(line: &str) -> std::result::Result<ObstacleRecord, String> {
    let mut fields = [0.0f32; 6];
    let mut count = 0;

    for (i, field) in line.split(',').enumerate() {
        if i >= 6 {
            return Err("too many fields".into());
        }
        fields[i] = field
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("field {}: {}", i + 1, e))?;
        count += 1;
    }

    if count != 6 {
        return Err(format!("expected 6 fields, found {}", count));
    }

    Ok(ObstacleRecord {
        north: fields[0],
        east: fields[1],
        alt: fields[2],
        d_north: fields[3],
        d_east: fields[4],
        d_alt: fields[5],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "lat0 37.792480, lon0 -122.397450\n\
        posX,posY,posZ,halfSizeX,halfSizeY,halfSizeZ\n\
        -310.2389,-439.2315,85.5,5.0,5.0,85.5\n\
        -300.2389,-439.2315,85.5,5.0,5.0,85.5\n";

    #[test]
    fn test_parse_sample() {
        let data = parse(SAMPLE).unwrap();
        assert_eq!(data.home.latitude, 37.792480);
        assert_eq!(data.home.longitude, -122.397450);
        assert_eq!(data.home.altitude, 0.0);
        assert_eq!(data.obstacles.len(), 2);
        assert_eq!(data.obstacles[0].north, -310.2389);
        assert_eq!(data.obstacles[0].d_alt, 85.5);
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(parse("").is_err());
    }

    #[test]
    fn test_missing_home_rejected() {
        let result = parse("posX,posY,posZ\n1.0,2.0,3.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_record_rejected() {
        let content = "lat0 37.79, lon0 -122.40\nheader\n1.0,2.0,not_a_number,4.0,5.0,6.0\n";
        assert!(parse(content).is_err());
    }

    #[test]
    fn test_short_record_rejected() {
        let content = "lat0 37.79, lon0 -122.40\nheader\n1.0,2.0,3.0\n";
        assert!(parse(content).is_err());
    }

    #[test]
    fn test_no_obstacles_ok() {
        let data = parse("lat0 37.79, lon0 -122.40\nheader\n").unwrap();
        assert!(data.obstacles.is_empty());
    }
}
