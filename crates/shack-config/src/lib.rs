//! Persisted User Selections
//!
//! A small JSON settings file holding the last-used hardware and transport
//! choices per daemon. The core reads these to pre-fill the next session;
//! it never stores built argument vectors, only the inputs that produce
//! them.

pub mod settings;

pub use settings::{
    restore_selection, AmplifierSelection, RadioSelection, RotorSelection, Settings,
};
