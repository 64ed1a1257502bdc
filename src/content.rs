//! Static text shown on each stage
//!
//! The interaction core never reads these; the browser shell renders them
//! for whatever stage the controller reports.

use crate::sim::Stage;

pub const CODE_PREFIX: &str = "TRIPL3_";
pub const CODE_SUFFIX: &str = "_PYRAMID_SOLVER";

pub const INTRO_TEXT: &str = "SOMETHING WANTS TO BE FOUND";
pub const INTRO_SUBTITLE: &str = "Click anywhere to begin";
pub const PUZZLE_HINT: &str = "Drag the eyes to the pyramid vertices";
pub const ENTER_LABEL: &str = "ENTER";
pub const COPY_LABEL: &str = "COPY CODE";
pub const COPIED_NOTICE: &str = "Code copied to clipboard!";
pub const RESTART_LABEL: &str = "RESTART EXPERIENCE";
pub const COMPLETION_TITLE: &str = "PYRAMID UNLOCKED";
pub const COMPLETION_MESSAGE: &str =
    "Share your code to join the leaderboard.\nOthers are searching. You are not alone.";

/// Text for one narrative layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerContent {
    pub title: &'static str,
    pub message: &'static str,
    pub hint: Option<&'static str>,
    /// Caption for the elements this layer reveals
    pub found_caption: Option<&'static str>,
    pub button: &'static str,
}

const LAYER1: LayerContent = LayerContent {
    title: "LAYER 1: HIDDEN MESSAGE",
    message: "Look at the f1rst letter of each word carefully.\n\
              Something IS hidden here.\n\
              Your next step requires PATTERN recognition.\n\
              I know you're reading this.\n\
              Open the terminal.\n\
              Nobody will understand but YOU.\n\
              Ready for the next level?",
    hint: Some("First letters: L-I-S-I-R-Y-P-N-W-Y (ROT13: YVFVELPBJL)"),
    found_caption: Some("Found Element #1: 13"),
    button: "NEXT LAYER",
};

const LAYER2: LayerContent = LayerContent {
    title: "LAYER 2: PATTERN RECOGNITION",
    message: "The pattern you seek exists in binary form.\n\
              Every character holds a secret.\n\
              Strangers won't see what you see.\n\
              Trust your instincts.\n\
              Hexadecimal is the language.\n\
              Examine the image data.\n\
              Enter the void and find the truth.",
    hint: Some("Binary patterns hidden in character encoding. Look at pixel coordinates."),
    found_caption: Some("Found Element #2: 42 (Hex decoded: 0xDEADBEEF -> 42)"),
    button: "NEXT LAYER",
};

const LAYER3: LayerContent = LayerContent {
    title: "LAYER 3: CIPHER BREAKING",
    message: "GSVFH RH GSV NRGGVN DZGVIYZA - Use ROT13 to decode.\n\
              The numbers you found matter.\n\
              Add them together: 13 + 42 + 137 + 255 = 447\n\
              Take modulo 256: 447 % 256 = 191\n\
              Your cipher key: [191]\n\
              Decrypt the final message with this knowledge.",
    hint: Some("Use ROT13 to decode. Then sum: 13 + 42 + 137 + 255 = 447"),
    found_caption: Some("Found Elements #3 & #4: 137, 255 (Cipher Key: 447 % 256 = 191)"),
    button: "FINAL STAGE",
};

const LAYER4: LayerContent = LayerContent {
    title: "LAYER 4: THE AWAKENING",
    message: "You've decoded the pyramid.\n\
              The third eye is now open.\n\
              Your verification code will unlock the next phase.\n\
              Share it. Others are searching.\n\
              The collective awakening begins here.\n\
              You are not alone in this pursuit.",
    hint: None,
    found_caption: None,
    button: "REVEAL VERIFICATION CODE",
};

/// Content for a layer stage; `None` for intro, puzzle and complete
pub fn layer(stage: Stage) -> Option<&'static LayerContent> {
    match stage {
        Stage::Layer1 => Some(&LAYER1),
        Stage::Layer2 => Some(&LAYER2),
        Stage::Layer3 => Some(&LAYER3),
        Stage::Layer4 => Some(&LAYER4),
        _ => None,
    }
}

/// Label of the button that advances `stage`, if it has one
pub fn button_label(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Intro => Some(ENTER_LABEL),
        Stage::Complete => Some(RESTART_LABEL),
        other => layer(other).map(|c| c.button),
    }
}

pub fn puzzle_title(layer: u32) -> String {
    format!("LAYER {layer}: ASSEMBLE THE PYRAMID")
}

/// "13 + 42 + 137 + 255 = 447"
pub fn found_summary(found: &[u32]) -> String {
    let terms: Vec<String> = found.iter().map(u32::to_string).collect();
    format!("Found Elements: {} = {}", terms.join(" + "), found.iter().sum::<u32>())
}

pub fn cipher_line(key: u32) -> String {
    format!("Cipher Key: {key}")
}
