//! Continuous voice command session.
//!
//! ```text
//!   Idle ──start()──▶ Listening ──stop() / session error / session end──▶ Idle
//! ```
//!
//! While listening, every finalized transcript is matched against the
//! keyword table and a matching command is fired with `Origin::Voice`.
//! Partial transcripts are ignored. A session that errors or ends is not
//! restarted.

use std::sync::Arc;

use maestro_core::{ClientConfig, Command, Origin, SpeechEvent, SpeechRecognizer};
use maestro_runtime::CommandDispatcher;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::error::VoiceError;
use crate::keywords::match_transcript;

/// Whether the adapter currently holds an open recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Idle,
    Listening,
}

#[derive(Debug, Default)]
struct Listen {
    state: VoiceState,
    /// Bumped on every start so a finished listener cannot end a newer session.
    generation: u64,
    task: Option<JoinHandle<()>>,
}

struct Shared {
    recognizer: Arc<dyn SpeechRecognizer>,
    dispatcher: Arc<CommandDispatcher>,
    listen: Mutex<Listen>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        let listen = self.listen.lock();
        listen.generation == generation && listen.state == VoiceState::Listening
    }

    /// Return to Idle after the recognizer gave up on its own.
    fn session_over(&self, generation: u64) {
        {
            let mut listen = self.listen.lock();
            if listen.generation != generation || listen.state != VoiceState::Listening {
                return;
            }
            listen.state = VoiceState::Idle;
            listen.task = None;
        }
        self.dispatcher.fire(Command::VoiceStop.with_origin(Origin::Voice));
    }

    async fn listen(
        self: Arc<Self>,
        generation: u64,
        mut events: mpsc::UnboundedReceiver<SpeechEvent>,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                SpeechEvent::Transcript {
                    text,
                    is_final: true,
                } => {
                    let Some(command) = match_transcript(&text) else {
                        debug!(transcript = %text, "No voice command recognized");
                        continue;
                    };
                    if !self.is_current(generation) {
                        break;
                    }
                    info!(transcript = %text, %command, "Voice command");
                    self.dispatcher.fire(command.with_origin(Origin::Voice));
                }
                SpeechEvent::Transcript { text, .. } => {
                    trace!(transcript = %text, "Partial transcript ignored");
                }
                SpeechEvent::Error(message) => {
                    warn!(error = %message, "Speech recognition failed");
                    break;
                }
                SpeechEvent::Ended => {
                    debug!("Speech recognition session ended");
                    break;
                }
            }
        }
        self.session_over(generation);
    }
}

/// Drives playback from spoken keywords.
pub struct VoiceCommandAdapter {
    shared: Arc<Shared>,
    language: String,
}

impl VoiceCommandAdapter {
    pub fn new(
        config: &ClientConfig,
        recognizer: Arc<dyn SpeechRecognizer>,
        dispatcher: Arc<CommandDispatcher>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                recognizer,
                dispatcher,
                listen: Mutex::new(Listen::default()),
            }),
            language: config.speech_language().to_string(),
        }
    }

    pub fn state(&self) -> VoiceState {
        self.shared.listen.lock().state
    }

    pub fn is_listening(&self) -> bool {
        self.state() == VoiceState::Listening
    }

    /// Open a recognition session and start reacting to transcripts.
    ///
    /// Must be called from within a tokio runtime. If the recognizer cannot
    /// open a session the adapter stays Idle.
    pub fn start(&self) -> Result<(), VoiceError> {
        let mut listen = self.shared.listen.lock();
        if listen.state == VoiceState::Listening {
            return Err(VoiceError::AlreadyActive);
        }

        let events = self.shared.recognizer.start(&self.language)?;

        listen.generation += 1;
        listen.state = VoiceState::Listening;
        let generation = listen.generation;

        self.shared
            .dispatcher
            .fire(Command::VoiceStart.with_origin(Origin::Voice));
        listen.task = Some(tokio::spawn(Arc::clone(&self.shared).listen(generation, events)));

        info!(language = %self.language, "Voice control started");
        Ok(())
    }

    /// Close the recognition session.
    pub fn stop(&self) -> Result<(), VoiceError> {
        let task = {
            let mut listen = self.shared.listen.lock();
            if listen.state != VoiceState::Listening {
                return Err(VoiceError::NotActive);
            }
            listen.state = VoiceState::Idle;
            listen.task.take()
        };

        if let Some(task) = task {
            task.abort();
        }
        self.shared.recognizer.stop();
        self.shared
            .dispatcher
            .fire(Command::VoiceStop.with_origin(Origin::Voice));

        info!("Voice control stopped");
        Ok(())
    }
}

impl Drop for VoiceCommandAdapter {
    fn drop(&mut self) {
        if let Some(task) = self.shared.listen.lock().task.take() {
            task.abort();
        }
    }
}
