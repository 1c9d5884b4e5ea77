//! Errors raised at the crate boundary (bindings, mode selection, settings, GPU setup)
//!
//! The simulation itself never fails; these only reject bad configuration early.

use crate::input::Control;

/// Crate error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Control name outside up/down/left/right
    #[error("unknown control `{0}` (expected up, down, left or right)")]
    UnknownControl(String),

    /// Game mode outside single/1v1
    #[error("unknown game mode `{0}` (expected single or 1v1)")]
    UnknownMode(String),

    /// Quality preset outside low/medium/high
    #[error("unknown quality preset `{0}`")]
    UnknownQuality(String),

    /// A control was bound to an empty key
    #[error("no key bound for {0}")]
    EmptyBinding(Control),

    /// The same key drives two controls
    #[error("key `{0}` is bound more than once")]
    DuplicateBinding(String),

    /// Rules that would break the simulation invariants
    #[error("invalid rules: {0}")]
    InvalidRules(String),

    /// Settings JSON could not be parsed
    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Settings file could not be read
    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),

    /// No usable GPU device
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

pub type Result<T> = std::result::Result<T, Error>;
