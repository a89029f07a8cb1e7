//! Terminal stand-ins for the media element and the speech engine.

use maestro_core::{MediaSurface, SpeechError, SpeechEvent, SpeechRecognizer};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

/// Prints what a media element would be doing.
#[derive(Debug, Default)]
pub struct ConsoleMediaSurface {
    source: Mutex<Option<String>>,
    playing: Mutex<bool>,
}

impl MediaSurface for ConsoleMediaSurface {
    fn load(&self, url: &str) {
        println!("[media] loaded {url}");
        *self.source.lock() = Some(url.to_string());
        *self.playing.lock() = false;
    }

    fn play(&self) {
        let mut playing = self.playing.lock();
        if !*playing {
            println!("[media] playing");
            *playing = true;
        }
    }

    fn pause(&self) {
        let mut playing = self.playing.lock();
        if *playing {
            println!("[media] paused");
            *playing = false;
        }
    }

    fn is_playing(&self) -> bool {
        *self.playing.lock()
    }

    fn source(&self) -> Option<String> {
        self.source.lock().clone()
    }
}

/// Speech "recognition" fed from typed lines.
///
/// Each [`say`](Self::say) is delivered as one finalized transcript to the
/// open session.
#[derive(Debug, Default)]
pub struct TypedSpeech {
    session: Mutex<Option<mpsc::UnboundedSender<SpeechEvent>>>,
}

impl TypedSpeech {
    /// Deliver `text` to the open session. Returns `false` if none is open.
    pub fn say(&self, text: &str) -> bool {
        self.session.lock().as_ref().is_some_and(|tx| {
            tx.send(SpeechEvent::Transcript {
                text: text.to_string(),
                is_final: true,
            })
            .is_ok()
        })
    }
}

impl SpeechRecognizer for TypedSpeech {
    fn start(&self, language: &str) -> Result<mpsc::UnboundedReceiver<SpeechEvent>, SpeechError> {
        debug!(language, "Opening typed speech session");
        let (tx, rx) = mpsc::unbounded_channel();
        *self.session.lock() = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        if let Some(tx) = self.session.lock().take() {
            tx.send(SpeechEvent::Ended).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_say_requires_open_session() {
        let speech = TypedSpeech::default();
        assert!(!speech.say("play"));

        let mut rx = speech.start("en-US").unwrap();
        assert!(speech.say("play"));
        assert_eq!(
            rx.try_recv().unwrap(),
            SpeechEvent::Transcript {
                text: "play".into(),
                is_final: true
            }
        );

        speech.stop();
        assert_eq!(rx.try_recv().unwrap(), SpeechEvent::Ended);
        assert!(!speech.say("pause"));
    }

    #[test]
    fn test_surface_tracks_its_own_playback() {
        let surface = ConsoleMediaSurface::default();
        surface.load("http://localhost:5000/music/a.mp3");
        assert!(!surface.is_playing());
        surface.play();
        assert!(surface.is_playing());
        surface.load("http://localhost:5000/music/b.mp3");
        assert!(!surface.is_playing());
        assert_eq!(
            surface.source().as_deref(),
            Some("http://localhost:5000/music/b.mp3")
        );
    }
}
