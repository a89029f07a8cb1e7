//! Interactive session: poll in the background, read commands from the
//! terminal, and drive the widget, voice and gesture controls from them.

use std::sync::Arc;

use maestro_gui::PlaybackWidget;
use maestro_runtime::{DispatchError, DispatchOutcome, Session};
use maestro_voice::VoiceCommandAdapter;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::bootstrap::CliContext;
use crate::console::{ConsoleMediaSurface, TypedSpeech};
use crate::error::CliError;
use crate::interactive::{HELP, Input, parse_input};

const PROMPT: &str = "maestro> ";

/// Run the interactive session until the user quits.
pub async fn execute(ctx: CliContext) -> Result<(), CliError> {
    let CliContext { config, api } = ctx;
    let session = Session::start(config, api)?;

    let speech = Arc::new(TypedSpeech::default());
    let voice = VoiceCommandAdapter::new(
        session.config(),
        speech.clone(),
        Arc::clone(session.dispatcher()),
    );

    let widget = Arc::new(PlaybackWidget::new(
        session.config(),
        Arc::clone(session.store()),
        Arc::clone(session.dispatcher()),
        Arc::new(ConsoleMediaSurface::default()),
    ));
    let cancel = CancellationToken::new();
    let follower = {
        let widget = Arc::clone(&widget);
        let cancel = cancel.clone();
        tokio::spawn(async move { widget.run(cancel).await })
    };

    println!("Connected to {}. Type 'help' for commands.", session.config().base_url());

    let (tx, mut lines) = mpsc::unbounded_channel();
    let reader = tokio::task::spawn_blocking(move || read_lines(&tx));

    while let Some(line) = lines.recv().await {
        match parse_input(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Empty) => {}
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Show) => print!("{}", widget.now_playing()),
            Ok(Input::Press(button)) => report(widget.press(button)),
            Ok(Input::Select(index)) => report(widget.select(index)),
            Ok(Input::NativePlay) => widget.native_play(),
            Ok(Input::NativePause) => widget.native_pause(),
            Ok(Input::GestureToggle) => report(session.gesture().toggle()),
            Ok(Input::Gesture(true)) => report(session.gesture().start()),
            Ok(Input::Gesture(false)) => report(session.gesture().stop()),
            Ok(Input::Voice(on)) => {
                let result = if on { voice.start() } else { voice.stop() };
                if let Err(e) = result {
                    println!("voice: {e}");
                }
            }
            Ok(Input::Say(words)) => {
                if !speech.say(&words) {
                    println!("voice control is off (try 'voice on')");
                }
            }
            Err(message) => println!("{message}"),
        }
    }

    if voice.is_listening() {
        voice.stop().ok();
    }
    cancel.cancel();
    follower.await.ok();
    session.end().await;

    // The reader has already returned unless input ended abnormally.
    reader.await.map_err(|e| CliError::Io(e.to_string()))?
}

/// Blocking line reader. Sends each line until the user leaves.
fn read_lines(tx: &mpsc::UnboundedSender<String>) -> Result<(), CliError> {
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                editor.add_history_entry(line.as_str()).ok();
                let quit = matches!(parse_input(&line), Ok(Input::Quit));
                if tx.send(line).is_err() || quit {
                    return Ok(());
                }
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                tx.send("quit".to_string()).ok();
                return Ok(());
            }
            Err(e) => {
                tx.send("quit".to_string()).ok();
                return Err(e.into());
            }
        }
    }
}

/// Print the outcome of a fired command once it settles.
fn report(pending: JoinHandle<Result<DispatchOutcome, DispatchError>>) {
    tokio::spawn(async move {
        match pending.await {
            Ok(Ok(outcome)) => debug!(command = %outcome.command.command, "Acknowledged"),
            Ok(Err(e)) => println!("! {e}"),
            Err(e) => warn!(error = %e, "Dispatch task panicked"),
        }
    });
}
