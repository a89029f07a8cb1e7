//! Subcommands.

use clap::Subcommand;

/// Available commands. Without one, `run` is assumed.
#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session (polling, voice, gesture, playback)
    Run,

    /// Poll the backend once and print the playback state
    State {
        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send one playback command and print the result
    Send {
        /// play, pause, next, prev, volume_up, volume_down, like or dislike
        action: String,
    },

    /// Play the track at the given position in the song list
    PlayIndex {
        /// Zero-based track index
        index: usize,
    },
}
