//! Media rendering surface.

/// Something that can load and play an audio resource.
///
/// The surface keeps its own notion of whether audio is playing; its native
/// controls act on it directly.
pub trait MediaSurface: Send + Sync {
    /// Replace the current source with `url`. Playback stops.
    fn load(&self, url: &str);

    fn play(&self);

    fn pause(&self);

    /// Whether the surface itself believes audio is playing.
    fn is_playing(&self) -> bool;

    /// Currently loaded source, if any.
    fn source(&self) -> Option<String>;
}
