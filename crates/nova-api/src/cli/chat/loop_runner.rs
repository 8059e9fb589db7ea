//! Main chat loop orchestration.
//!
//! Reads utterances (typed, or transcribed in voice mode), handles slash
//! commands and exit words, routes everything else through the dispatcher
//! and delivers the result: streamed to the terminal in text mode, spoken
//! through the playback controller in voice mode.

use std::time::{Duration, Instant};

use console::style;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use nova_core::brain::stream::GenerationStream;
use nova_core::dispatch::{FrontEndAction, Response};
use nova_core::playback::controller::PlaybackController;
use nova_core::playback::interrupt::InterruptSignal;
use nova_core::service::transcriber::Transcriber;
use nova_infra::speech::{CommandSpeechSink, CommandTranscriber};
use nova_types::chat::{InputMode, Utterance};
use nova_types::error::{DispatchError, TranscriptionError};
use nova_types::speech::PlaybackOutcome;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand, GOODBYE};
use super::input::{ChatInput, InputEvent};
use super::renderer::{ChatRenderer, TerminalDisplay};

const SPEC_FOLLOW_UP: &str = "Do you want to know more about its specs or stop here?";

type VoiceController = PlaybackController<CommandSpeechSink, TerminalDisplay>;

fn prompt_for(mode: InputMode) -> String {
    match mode {
        InputMode::Text => format!("  {} ", style("You >").green().bold()),
        InputMode::Voice => format!("  {} ", style("You (voice) >").green().bold()),
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run the interactive chat loop until the user leaves.
pub async fn run_chat_loop(
    state: &AppState,
    mut mode: InputMode,
    mut use_remote: bool,
) -> anyhow::Result<()> {
    let dispatcher = state.dispatcher.clone();
    let name = state.config.assistant.name.clone();

    print_welcome_banner(
        &name,
        mode,
        &dispatcher.active_model().await,
        dispatcher.brain().remote_model(),
    );

    let renderer = ChatRenderer::new(name.clone());
    let sink = CommandSpeechSink::from_config(&state.config.voice);
    if sink.is_silent() {
        info!("no speak command configured, voice replies are printed only");
    }
    let controller = PlaybackController::new(
        sink,
        TerminalDisplay::new(ChatRenderer::new(name.clone())),
        InterruptSignal::new(),
    );
    let transcriber = CommandTranscriber::from_config(&state.config.voice);

    let (mut input, _writer) = ChatInput::new(prompt_for(mode))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match next_input(mode, &mut input, transcriber.as_ref()).await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };
        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => input.clear(),
                ChatCommand::Remote => {
                    use_remote = true;
                    println!("\n  {} Using the remote backend.\n", style("*").cyan().bold());
                }
                ChatCommand::Local => {
                    use_remote = false;
                    println!("\n  {} Using the local model.\n", style("*").cyan().bold());
                }
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Unknown(cmd_name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(cmd_name).dim()
                    );
                }
            }
            continue;
        }

        if commands::is_exit_word(&text) && !dispatcher.in_specification_mode().await {
            deliver(mode, &renderer, &controller, &mut input, GOODBYE).await;
            break;
        }

        let backend_label = if use_remote {
            dispatcher.brain().remote_model().unwrap_or("remote").to_string()
        } else {
            dispatcher.active_model().await
        };

        let utterance = Utterance::new(&text);
        let response = match dispatcher.route_and_respond(&utterance, use_remote).await {
            Ok(response) => response,
            Err(DispatchError::InputEmpty) => continue,
        };

        match response {
            Response::Reply(reply) => match reply.action {
                Some(FrontEndAction::ReadBack) => {
                    let text = read_back_text(mode, &controller, reply.text);
                    deliver(mode, &renderer, &controller, &mut input, &text).await;
                }
                Some(FrontEndAction::SwitchMode(next)) => {
                    deliver(mode, &renderer, &controller, &mut input, &reply.text).await;
                    mode = next;
                    input.update_prompt(&prompt_for(mode));
                    info!(%mode, "input mode switched");
                }
                None => deliver(mode, &renderer, &controller, &mut input, &reply.text).await,
            },
            Response::Stream { notice, stream } => {
                if let Some(notice) = notice {
                    match mode {
                        InputMode::Text => renderer.print_notice(&notice),
                        InputMode::Voice => {
                            speak_interruptibly(&controller, &mut input, &notice).await;
                        }
                    }
                }

                match mode {
                    InputMode::Text => stream_to_terminal(&renderer, stream, &backend_label).await,
                    InputMode::Voice => {
                        let spinner = thinking_spinner();
                        let (reply, outcome) = stream.collect_text().await;
                        spinner.finish_and_clear();
                        debug!(?outcome, "generation collected for playback");
                        speak_interruptibly(&controller, &mut input, &reply).await;
                    }
                }

                if dispatcher.in_specification_mode().await {
                    deliver(mode, &renderer, &controller, &mut input, SPEC_FOLLOW_UP).await;
                }
            }
        }
    }

    Ok(())
}

/// Text to replay for a read-back. In voice mode the controller's slot wins
/// since it also holds spoken notices and interrupted replies.
fn read_back_text(mode: InputMode, controller: &VoiceController, fallback: String) -> String {
    match mode {
        InputMode::Voice => controller.last_response().unwrap_or(fallback),
        InputMode::Text => fallback,
    }
}

/// Next utterance: transcribed in voice mode when a transcriber is
/// configured, typed otherwise.
async fn next_input(
    mode: InputMode,
    input: &mut ChatInput,
    transcriber: Option<&CommandTranscriber>,
) -> InputEvent {
    let Some(transcriber) = transcriber.filter(|_| mode == InputMode::Voice) else {
        return input.read_line().await;
    };

    println!("  {}", style("Listening...").dim());
    match transcriber.listen().await {
        Ok(text) => {
            println!("  {} {}", style("You >").green().bold(), text);
            InputEvent::Message(text)
        }
        Err(TranscriptionError::Unintelligible) => {
            println!("  {}", style("Sorry, I didn't catch that.").dim());
            InputEvent::Message(String::new())
        }
        Err(e) => {
            warn!(error = %e, "transcriber unavailable, falling back to typed input");
            input.read_line().await
        }
    }
}

/// Print (text mode) or speak (voice mode) a complete reply.
async fn deliver(
    mode: InputMode,
    renderer: &ChatRenderer,
    controller: &VoiceController,
    input: &mut ChatInput,
    text: &str,
) {
    match mode {
        InputMode::Text => renderer.print_reply(text),
        InputMode::Voice => {
            speak_interruptibly(controller, input, text).await;
        }
    }
}

/// Speak `text`; any line entered meanwhile interrupts playback and is
/// discarded.
async fn speak_interruptibly(
    controller: &VoiceController,
    input: &mut ChatInput,
    text: &str,
) -> PlaybackOutcome {
    let interrupt = controller.interrupt_signal();
    let speak = controller.speak(text);
    tokio::pin!(speak);

    let mut signalled = false;
    loop {
        tokio::select! {
            outcome = &mut speak => return outcome,
            _ = input.read_line(), if !signalled => {
                interrupt.signal();
                signalled = true;
            }
        }
    }
}

/// Print fragments as they arrive, with a spinner until the first one.
async fn stream_to_terminal(renderer: &ChatRenderer, mut stream: GenerationStream, label: &str) {
    let spinner = thinking_spinner();
    let start = Instant::now();
    let mut started = false;

    while let Some(fragment) = stream.next().await {
        if !started {
            spinner.finish_and_clear();
            renderer.print_stream_start();
            started = true;
        }
        renderer.print_fragment(&fragment);
    }
    if !started {
        spinner.finish_and_clear();
    }

    debug!(outcome = ?stream.outcome(), "generation streamed");
    println!();
    renderer.print_stats_footer(start.elapsed(), label);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_controller() -> VoiceController {
        PlaybackController::new(
            CommandSpeechSink::new(Vec::new()),
            TerminalDisplay::new(ChatRenderer::new("Nova")),
            InterruptSignal::new(),
        )
    }

    #[tokio::test]
    async fn voice_read_back_prefers_spoken_text() {
        let controller = silent_controller();
        let fallback = || "I haven't said anything yet to read.".to_string();
        assert_eq!(read_back_text(InputMode::Voice, &controller, fallback()), fallback());

        controller.speak("Hmm, let me think deeper about that.").await;
        controller.speak("It is sunny. Mostly.").await;
        assert_eq!(
            read_back_text(InputMode::Voice, &controller, fallback()),
            "It is sunny. Mostly."
        );
        assert_eq!(read_back_text(InputMode::Text, &controller, "typed".to_string()), "typed");
    }
}
