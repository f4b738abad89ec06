//! Round configuration as consumed by the engine.
//!
//! A round is anchored either in the map's natural pixel space or in lat/lon
//! over a declared bounding box — exactly one of the two. The choice is fixed
//! at configuration-load time and conversion to display space happens once,
//! when the round's map becomes ready, never later.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::geometry::{CoordMode, GeoBounds};
use crate::models::{MapResource, MAX_TEAMS};

/// The hidden answer for one round, in the round's declared coordinate mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum Target {
    /// Natural (unscaled) image pixels.
    Pixel { x: f64, y: f64 },
    /// Latitude/longitude inside the round's bounding box.
    Geo { lat: f64, lon: f64 },
}

/// One immutable round definition: a map, a hidden target, and an optional
/// prompt shown to players.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundConfig {
    pub map: MapResource,
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<GeoBounds>,
}

impl RoundConfig {
    pub fn coord_mode(&self) -> CoordMode {
        match self.bounds {
            Some(bounds) => CoordMode::Geo(bounds),
            None => CoordMode::Pixel,
        }
    }
}

/// Target display size the renderer scales maps into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

fn default_team_count() -> u8 {
    2
}

/// A whole session: team count, viewport, and the ordered round list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default = "default_team_count")]
    pub team_count: u8,
    pub viewport: Viewport,
    /// Legacy behavior: wrap back to round 0 instead of finishing the
    /// session when the round list is exhausted.
    #[serde(default)]
    pub cycle: bool,
    pub rounds: Vec<RoundConfig>,
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: SessionConfig = serde_json::from_str(json)
            .map_err(|e| EngineError::BadConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.team_count < 1 || self.team_count > MAX_TEAMS {
            return Err(EngineError::InvalidTeamCount(self.team_count));
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(EngineError::InvalidGeometry(format!(
                "non-positive viewport {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.rounds.is_empty() {
            return Err(EngineError::BadConfig("round list is empty".to_string()));
        }
        for (i, round) in self.rounds.iter().enumerate() {
            if round.map.natural_width <= 0.0 || round.map.natural_height <= 0.0 {
                return Err(EngineError::InvalidGeometry(format!(
                    "round {i}: non-positive map dimensions for {}",
                    round.map.file_name
                )));
            }
            match (&round.target, &round.bounds) {
                (Target::Geo { .. }, None) => {
                    return Err(EngineError::InvalidGeometry(format!(
                        "round {i}: geo target without a bounding box"
                    )));
                }
                (Target::Pixel { .. }, Some(_)) => {
                    return Err(EngineError::InvalidGeometry(format!(
                        "round {i}: bounding box given for a pixel target"
                    )));
                }
                (Target::Geo { .. }, Some(bounds)) => bounds.validate()?,
                (Target::Pixel { .. }, None) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel_round(name: &str) -> String {
        format!(
            r#"{{
                "map": {{
                    "displayName": "{name}",
                    "fileName": "{name}.png",
                    "naturalWidth": 1024.0,
                    "naturalHeight": 888.0
                }},
                "target": {{ "mode": "pixel", "x": 512.0, "y": 444.0 }}
            }}"#
        )
    }

    fn config_json(team_count: u8, rounds: &[String]) -> String {
        format!(
            r#"{{
                "teamCount": {team_count},
                "viewport": {{ "width": 900.0, "height": 740.0 }},
                "rounds": [{}]
            }}"#,
            rounds.join(",")
        )
    }

    #[test]
    fn test_parse_pixel_round() {
        let config =
            SessionConfig::from_json(&config_json(3, &[pixel_round("sweden")])).unwrap();
        assert_eq!(config.team_count, 3);
        assert!(!config.cycle);
        assert_eq!(config.rounds.len(), 1);
        assert_eq!(
            config.rounds[0].target,
            Target::Pixel { x: 512.0, y: 444.0 }
        );
        assert!(matches!(config.rounds[0].coord_mode(), CoordMode::Pixel));
    }

    #[test]
    fn test_parse_geo_round() {
        let json = r#"{
            "viewport": { "width": 900.0, "height": 740.0 },
            "rounds": [{
                "map": {
                    "displayName": "Sweden",
                    "fileName": "sweden.png",
                    "naturalWidth": 1260.0,
                    "naturalHeight": 1540.0
                },
                "target": { "mode": "geo", "lat": 58.41, "lon": 15.62 },
                "prompt": "Where is Linköping?",
                "bounds": { "lonMin": 10.5, "lonMax": 24.2, "latMin": 55.2, "latMax": 69.1 }
            }]
        }"#;
        let config = SessionConfig::from_json(json).unwrap();
        // teamCount omitted: serde default applies, host overrides later.
        assert_eq!(config.team_count, 2);
        assert!(matches!(config.rounds[0].coord_mode(), CoordMode::Geo(_)));
        assert_eq!(config.rounds[0].prompt.as_deref(), Some("Where is Linköping?"));
    }

    #[test]
    fn test_team_count_out_of_range_rejected() {
        let err =
            SessionConfig::from_json(&config_json(0, &[pixel_round("a")])).unwrap_err();
        assert_eq!(err, EngineError::InvalidTeamCount(0));
        let err =
            SessionConfig::from_json(&config_json(11, &[pixel_round("a")])).unwrap_err();
        assert_eq!(err, EngineError::InvalidTeamCount(11));
    }

    #[test]
    fn test_empty_round_list_rejected() {
        let err = SessionConfig::from_json(&config_json(2, &[])).unwrap_err();
        assert!(matches!(err, EngineError::BadConfig(_)));
    }

    #[test]
    fn test_geo_target_requires_bounds() {
        let json = r#"{
            "viewport": { "width": 900.0, "height": 740.0 },
            "rounds": [{
                "map": {
                    "displayName": "Sweden",
                    "fileName": "sweden.png",
                    "naturalWidth": 1260.0,
                    "naturalHeight": 1540.0
                },
                "target": { "mode": "geo", "lat": 58.41, "lon": 15.62 }
            }]
        }"#;
        let err = SessionConfig::from_json(json).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGeometry(_)));
    }

    #[test]
    fn test_malformed_json_is_bad_config() {
        let err = SessionConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, EngineError::BadConfig(_)));
    }
}
