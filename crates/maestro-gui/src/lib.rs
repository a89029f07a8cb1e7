//! Playback widget for maestro.
//!
//! [`PlaybackWidget`] is a pure consumer of the shared store: it drives an
//! injected [`MediaSurface`](maestro_core::MediaSurface) and turns manual
//! controls into commands. [`NowPlaying`] is the view model it presents.

#![deny(unused_crate_dependencies)]

pub mod view;
pub mod widget;

pub use view::{Button, NowPlaying, SongRow};
pub use widget::PlaybackWidget;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
