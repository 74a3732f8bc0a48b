//! Host protocol message definitions
//! JSON lines: one message per line in each direction

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{GameEvent, GameKind, HandMode};
use crate::hand::{HandRole, Landmark};
use crate::render::{Hud, Primitive, RenderFrame};

/// Landmarks the detector produced for one hand slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandInput {
    pub role: HandRole,
    /// Normalized points; anything other than 21 is malformed
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

/// One captured camera frame. Roles not listed were not detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    #[serde(default)]
    pub hands: Vec<HandInput>,
}

impl FrameInput {
    pub fn hand(&self, role: HandRole) -> Option<&HandInput> {
        self.hands.iter().find(|h| h.role == role)
    }
}

/// Messages sent from the host to the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMsg {
    /// Landmark snapshot for the next tick
    Frame(FrameInput),

    Pause,

    Resume,

    /// Start a fresh game in the same session
    Restart,

    /// Stop the driver at the next tick boundary
    Exit,
}

/// Messages sent from the core to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreMsg {
    /// Drawing commands for one tick
    Frame {
        tick: u64,
        width: f32,
        height: f32,
        primitives: Vec<Primitive>,
        hud: Hud,
        /// Events raised during the tick
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        events: Vec<GameEvent>,
    },

    /// Sent once when a game ends
    GameOver {
        session_id: Uuid,
        game: GameKind,
        mode: HandMode,
        final_score: u64,
        level: u32,
        /// Whether the score recorder acknowledged the score
        recorded: bool,
    },

    /// The session hit an internal error and stopped; restart to continue
    Fault { message: String },
}

impl CoreMsg {
    pub fn frame(frame: RenderFrame, events: Vec<GameEvent>) -> Self {
        Self::Frame {
            tick: frame.tick,
            width: frame.width,
            height: frame.height,
            primitives: frame.primitives,
            hud: frame.hud,
            events,
        }
    }
}
