//! Linear stage progression
//!
//! Stages only ever move forward. Each layer hands out one or more
//! discovered numbers when the player leaves it; the final reveal folds them
//! into the cipher key and produces the verification code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{CIPHER_MODULUS, CODE_SEED_MODULUS};
use crate::content;

/// Narrative stages in their only legal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Intro,
    Puzzle,
    Layer1,
    Layer2,
    Layer3,
    Layer4,
    Complete,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Intro,
        Stage::Puzzle,
        Stage::Layer1,
        Stage::Layer2,
        Stage::Layer3,
        Stage::Layer4,
        Stage::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Intro => "intro",
            Stage::Puzzle => "puzzle",
            Stage::Layer1 => "layer1",
            Stage::Layer2 => "layer2",
            Stage::Layer3 => "layer3",
            Stage::Layer4 => "layer4",
            Stage::Complete => "complete",
        }
    }

    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Intro => Some(Stage::Puzzle),
            Stage::Puzzle => Some(Stage::Layer1),
            Stage::Layer1 => Some(Stage::Layer2),
            Stage::Layer2 => Some(Stage::Layer3),
            Stage::Layer3 => Some(Stage::Layer4),
            Stage::Layer4 => Some(Stage::Complete),
            Stage::Complete => None,
        }
    }

    /// What moves the narrative out of this stage
    pub fn exit_trigger(&self) -> Option<Trigger> {
        match self {
            Stage::Puzzle => Some(Trigger::PuzzleSolved),
            Stage::Complete => None,
            _ => Some(Trigger::Click),
        }
    }

    /// Numbers discovered when leaving this stage
    pub fn discovered_on_exit(&self) -> &'static [u32] {
        match self {
            Stage::Layer1 => &[13],
            Stage::Layer2 => &[42],
            Stage::Layer3 => &[137, 255],
            _ => &[],
        }
    }

    /// Layer number shown in titles
    pub fn layer(&self) -> u32 {
        match self {
            Stage::Intro => 0,
            Stage::Puzzle | Stage::Layer1 => 1,
            Stage::Layer2 => 2,
            Stage::Layer3 => 3,
            Stage::Layer4 | Stage::Complete => 4,
        }
    }

    /// Background animation runs everywhere except the intro
    pub fn background_active(&self) -> bool {
        *self != Stage::Intro
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cause of a stage transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// A button press on the current stage
    Click,
    /// The pyramid puzzle's deferred completion
    PuzzleSolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The narrative has already ended
    Finished,
    /// The trigger doesn't advance the current stage
    WrongTrigger { stage: Stage, trigger: Trigger },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::Finished => write!(f, "narrative already complete"),
            TransitionError::WrongTrigger { stage, trigger } => {
                write!(f, "{trigger:?} does not advance stage {stage}")
            }
        }
    }
}

impl std::error::Error for TransitionError {}

/// Result of a successful transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    /// Elements appended by this transition
    pub found: Vec<u32>,
    /// Set when entering `Complete`
    pub code: Option<String>,
}

/// Stage, found elements and the final code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    stage: Stage,
    found: Vec<u32>,
    code: Option<String>,
}

impl Default for Narrative {
    fn default() -> Self {
        Self::new()
    }
}

impl Narrative {
    pub fn new() -> Self {
        Self {
            stage: Stage::Intro,
            found: Vec::new(),
            code: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn layer(&self) -> u32 {
        self.stage.layer()
    }

    pub fn found(&self) -> &[u32] {
        &self.found
    }

    pub fn found_sum(&self) -> u32 {
        self.found.iter().sum()
    }

    /// Sum of found elements modulo 256
    pub fn cipher_key(&self) -> u32 {
        self.found_sum() % CIPHER_MODULUS
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Move to the next stage. `unix_secs` only matters for the final reveal.
    pub fn advance(&mut self, trigger: Trigger, unix_secs: u64) -> Result<Transition, TransitionError> {
        let from = self.stage;
        let (Some(to), Some(expected)) = (from.next(), from.exit_trigger()) else {
            return Err(TransitionError::Finished);
        };
        if trigger != expected {
            return Err(TransitionError::WrongTrigger {
                stage: from,
                trigger,
            });
        }

        let found = from.discovered_on_exit().to_vec();
        self.found.extend_from_slice(&found);

        let code = if to == Stage::Complete {
            let code = completion_code(unix_secs);
            log::info!(
                "Found elements {:?} sum {} cipher key {}",
                self.found,
                self.found_sum(),
                self.cipher_key()
            );
            self.code = Some(code.clone());
            Some(code)
        } else {
            None
        };

        self.stage = to;
        log::info!("Stage {} -> {}", from, to);

        Ok(Transition {
            from,
            to,
            found,
            code,
        })
    }
}

/// Verification code seeded from the current unix time
pub fn completion_code(unix_secs: u64) -> String {
    format!(
        "{}{:05}{}",
        content::CODE_PREFIX,
        unix_secs % CODE_SEED_MODULUS,
        content::CODE_SUFFIX
    )
}
