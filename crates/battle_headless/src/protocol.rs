//! JSON protocol for headless battle control.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller
//! **Output (stdout):** Responses and battle state
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0","tick":0}`
//! 2. Controller places units, then sends `start`
//! 3. Controller advances time with `tick`, reading `ticked` summaries
//! 4. When one side is eliminated, outputs `{"type":"battle_over",...}`
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","tick":0}
//! -> {"cmd":"select","kind":"Archer"}
//! <- {"type":"ack","cmd":"select"}
//! -> {"cmd":"place","x":450.0,"y":500.0}
//! <- {"type":"placed","unit_id":1,"kind":"Archer","team":"player","x":450.0,"y":510.0}
//! -> {"cmd":"start"}
//! <- {"type":"ack","cmd":"start"}
//! -> {"cmd":"tick","count":60}
//! <- {"type":"ticked","tick":60,"damage":4,"heals":0,"deaths":0,"spawned":0,"projectiles":2}
//! -> {"cmd":"query"}
//! <- {"type":"state","snapshot":{...},"hash":1234}
//! ```

use battle_core::components::Team;
use battle_core::simulation::Outcome;
use battle_core::snapshot::BattleSnapshot;
use serde::{Deserialize, Serialize};

/// Protocol version reported on startup.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Choose the unit type used by `place` without a kind.
    Select { kind: String },

    /// Place a unit under a battlefield point.
    ///
    /// Without `kind` the selected type is used; without `team` the
    /// territory under the point decides.
    Place {
        x: f32,
        y: f32,
        #[serde(default)]
        kind: Option<String>,
        #[serde(default)]
        team: Option<Team>,
    },

    /// Place a unit in a grid cell.
    PlaceCell {
        kind: String,
        team: Team,
        col: u32,
        row: u32,
    },

    /// Remove the unit in a grid cell.
    Remove { col: u32, row: u32 },

    /// Start the battle.
    Start,

    /// Freeze the battle.
    Pause,

    /// Unfreeze the battle.
    Resume,

    /// Clear the battlefield and return to setup.
    Reset,

    /// Set the cooldown time multiplier.
    Speed { multiplier: f32 },

    /// Advance the battle by N ticks (default: 1).
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },

    /// Query current battle state without advancing time.
    Query,

    /// Quit the runner.
    Quit,
}

fn default_tick_count() -> u32 {
    1
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready { version: String, tick: u64 },

    /// Acknowledgment of a command.
    Ack { cmd: String },

    /// A unit was placed.
    Placed {
        unit_id: u32,
        kind: String,
        team: Team,
        x: f32,
        y: f32,
    },

    /// Error processing a command.
    Error { message: String, cmd: Option<String> },

    /// Full battle state.
    State { snapshot: BattleSnapshot, hash: u64 },

    /// Ticks were run.
    Ticked {
        tick: u64,
        damage: usize,
        heals: usize,
        deaths: usize,
        spawned: usize,
        projectiles: usize,
    },

    /// One side was eliminated.
    BattleOver { outcome: Outcome, ticks: u64 },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    pub fn ready(tick: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            tick,
        }
    }

    /// Create an acknowledgment.
    pub fn ack(cmd: &str) -> Self {
        Self::Ack { cmd: cmd.to_string() }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"type":"error","message":"Serialization failed: {e}"}}"#));
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for acknowledgment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::Place { .. } => "place",
            Self::PlaceCell { .. } => "place_cell",
            Self::Remove { .. } => "remove",
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reset => "reset",
            Self::Speed { .. } => "speed",
            Self::Tick { .. } => "tick",
            Self::Query => "query",
            Self::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tick_command() {
        let cmd = Command::from_json(r#"{"cmd":"tick","count":60}"#).unwrap();
        assert_eq!(cmd, Command::Tick { count: 60 });
    }

    #[test]
    fn test_default_tick_count() {
        let cmd = Command::from_json(r#"{"cmd":"tick"}"#).unwrap();
        assert_eq!(cmd, Command::Tick { count: 1 });
    }

    #[test]
    fn test_parse_place_command() {
        let cmd = Command::from_json(r#"{"cmd":"place","x":100.0,"y":200.0,"team":"enemy"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Place {
                x: 100.0,
                y: 200.0,
                kind: None,
                team: Some(Team::Enemy),
            }
        );
        let cmd = Command::from_json(r#"{"cmd":"place_cell","kind":"Medic","team":"player","col":3,"row":9}"#).unwrap();
        assert_eq!(cmd.name(), "place_cell");
    }

    #[test]
    fn test_unknown_command_fails() {
        assert!(Command::from_json(r#"{"cmd":"teleport"}"#).is_err());
    }

    #[test]
    fn test_serialize_battle_over() {
        let resp = Response::BattleOver {
            outcome: Outcome::Victory(Team::Enemy),
            ticks: 300,
        };
        let json = resp.to_json_line();
        assert!(json.ends_with('\n'));
        assert!(json.contains(r#""type":"battle_over""#));
        assert!(json.contains(r#""outcome":{"victory":"enemy"}"#));
    }
}
