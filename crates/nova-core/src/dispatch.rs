//! Dispatcher: routes an utterance to a short-circuit reply or a generation.
//!
//! This is the single entry point both front ends (terminal and HTTP) call.
//! Specification mode is consulted before classification; every other
//! utterance goes through the intent router.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use nova_types::chat::{InputMode, Utterance};
use nova_types::error::{DispatchError, ModelSwitchError};
use nova_types::intent::{Intent, IntentKind, SiteEntry};

use crate::brain::StreamingBrain;
use crate::brain::stream::GenerationStream;
use crate::chat::session::{Session, SharedSession};
use crate::intent::router::IntentRouter;
use crate::intent::specification::{SpecStep, specification_prompt};
use crate::llm::backend::ModelAliasTable;
use crate::service::knowledge::KnowledgeSource;
use crate::service::launcher::Launcher;

const MUSIC_SITE: &str = "youtube";

/// Something the front end must do besides showing the reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "mode", rename_all = "snake_case")]
pub enum FrontEndAction {
    SwitchMode(InputMode),
    ReadBack,
}

/// A complete answer that needed no generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub action: Option<FrontEndAction>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
        }
    }

    fn with_action(text: impl Into<String>, action: FrontEndAction) -> Self {
        Self {
            text: text.into(),
            action: Some(action),
        }
    }
}

/// Result of routing one utterance.
#[derive(Debug)]
pub enum Response {
    Reply(Reply),
    /// A generation; `notice` is shown (or spoken) before the first fragment.
    Stream {
        notice: Option<String>,
        stream: GenerationStream,
    },
}

impl Response {
    fn stream(notice: Option<String>, stream: GenerationStream) -> Self {
        Response::Stream { notice, stream }
    }
}

/// Routes utterances for the single conversation of this process.
pub struct Dispatcher {
    router: IntentRouter,
    brain: StreamingBrain,
    session: SharedSession,
    aliases: Arc<ModelAliasTable>,
    launcher: Arc<dyn Launcher>,
    knowledge: Option<Arc<dyn KnowledgeSource>>,
}

impl Dispatcher {
    pub fn new(
        router: IntentRouter,
        brain: StreamingBrain,
        session: SharedSession,
        aliases: Arc<ModelAliasTable>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        Self {
            router,
            brain,
            session,
            aliases,
            launcher,
            knowledge: None,
        }
    }

    pub fn with_knowledge(mut self, knowledge: Arc<dyn KnowledgeSource>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    pub fn aliases(&self) -> &ModelAliasTable {
        &self.aliases
    }

    pub fn brain(&self) -> &StreamingBrain {
        &self.brain
    }

    /// Model the local backend currently targets.
    pub async fn active_model(&self) -> String {
        self.session.lock().await.active_model().to_string()
    }

    pub async fn in_specification_mode(&self) -> bool {
        self.session.lock().await.specification.is_active()
    }

    /// Switch the local model by alias. History is untouched.
    pub async fn switch_model(&self, alias: &str) -> Result<String, ModelSwitchError> {
        self.session.lock().await.switch_model(alias, &self.aliases)
    }

    /// Route one utterance.
    ///
    /// Waits for any in-flight generation to finish first: the session lock
    /// is held by a generation until its stream ends or is dropped.
    pub async fn route_and_respond(
        &self,
        utterance: &Utterance,
        use_remote: bool,
    ) -> Result<Response, DispatchError> {
        let mut session = self.session.clone().lock_owned().await;

        if session.specification.is_active() {
            let backend = session.select_backend(use_remote);
            let reply = match session.specification.step(utterance.text()) {
                SpecStep::Exit => Reply::text("Got it. Exiting specification mode."),
                SpecStep::Repeat => Reply::text("Didn't catch that. Please repeat."),
                SpecStep::Topic(topic) => {
                    return Ok(Response::stream(
                        Some("Alright, what else about the specifications?".to_string()),
                        self.brain.generate(session, specification_prompt(&topic), backend),
                    ));
                }
            };
            session.record_response(&reply.text);
            return Ok(Response::Reply(reply));
        }

        if utterance.is_empty() {
            return Err(DispatchError::InputEmpty);
        }

        let intent = self.router.classify(utterance.text());
        debug!(kind = %intent.kind, use_remote, "dispatching utterance");

        let reply = match intent.kind {
            IntentKind::ReadBack => return Ok(Response::Reply(read_back_reply(&session))),
            IntentKind::ModeSwitch => mode_switch_reply(&intent),
            IntentKind::SiteOpen => self.open_site(&intent),
            IntentKind::MusicPlay => self.play_music(&intent.payload),
            IntentKind::TimeQuery => {
                let now = chrono::Local::now().format("%I:%M %p");
                Reply::text(format!("The time is {now}"))
            }
            IntentKind::ModelSwitch => {
                let alias = intent.target.as_deref().unwrap_or_default();
                match session.switch_model(alias, &self.aliases) {
                    Ok(confirmation) => Reply::text(confirmation),
                    Err(e) => Reply::text(e.to_string()),
                }
            }
            IntentKind::Specification => {
                let backend = session.select_backend(use_remote);
                session.specification.enter(intent.payload.clone());
                return Ok(Response::stream(
                    Some(format!(
                        "Okay, let's talk only about {}'s specifications.",
                        intent.payload
                    )),
                    self.brain
                        .generate(session, specification_prompt(&intent.payload), backend),
                ));
            }
            IntentKind::Lookup => {
                drop(session);
                return Ok(self.lookup(&intent, utterance, use_remote).await);
            }
            IntentKind::Chat => {
                let backend = session.select_backend(use_remote);
                return Ok(Response::stream(
                    None,
                    self.brain
                        .generate(session, utterance.text().to_string(), backend),
                ));
            }
        };

        session.record_response(&reply.text);
        Ok(Response::Reply(reply))
    }

    fn open_site(&self, intent: &Intent) -> Reply {
        let Some(site) = intent
            .target
            .as_deref()
            .and_then(|key| self.router.sites().get(key))
        else {
            return Reply::text("I don't know that site.");
        };

        let term = intent.payload.as_str();
        let (url, text) = match site.search_for(term).filter(|_| !term.is_empty()) {
            Some(url) => (url, format!("Searching {term} on {}...", site.name)),
            None => (site.home_url.clone(), format!("Opening {}...", site.name)),
        };
        self.launch(site, &url, text)
    }

    fn play_music(&self, song: &str) -> Reply {
        let Some(site) = self.router.sites().get(MUSIC_SITE) else {
            return Reply::text("Music playback is not configured.");
        };

        match site.search_for(song).filter(|_| !song.is_empty()) {
            Some(url) => self.launch(site, &url, format!("Playing {song} on {}.", site.name)),
            None => self.launch(site, &site.home_url, format!("Opening {}...", site.name)),
        }
    }

    fn launch(&self, site: &SiteEntry, url: &str, text: String) -> Reply {
        match self.launcher.open_url(url) {
            Ok(()) => Reply::text(text),
            Err(e) => {
                warn!(error = %e, site = %site.key, "failed to open site");
                Reply::text(format!("Sorry, I couldn't open {} right now.", site.name))
            }
        }
    }

    /// Encyclopedia summary, else a generation over the whole utterance.
    ///
    /// The session is only locked once the knowledge source has answered.
    async fn lookup(&self, intent: &Intent, utterance: &Utterance, use_remote: bool) -> Response {
        let summary = match &self.knowledge {
            Some(knowledge) => Some(knowledge.summary(&intent.payload).await),
            None => None,
        };

        let mut session = self.session.clone().lock_owned().await;
        match summary {
            Some(Ok(summary)) => {
                session.record_response(&summary);
                Response::Reply(Reply::text(summary))
            }
            miss => {
                if let Some(Err(e)) = miss {
                    debug!(error = %e, topic = %intent.payload, "knowledge lookup missed");
                }
                let backend = session.select_backend(use_remote);
                Response::stream(
                    Some("Hmm, let me think deeper about that.".to_string()),
                    self.brain
                        .generate(session, utterance.text().to_string(), backend),
                )
            }
        }
    }
}

fn read_back_reply(session: &Session) -> Reply {
    let text = session
        .last_response()
        .unwrap_or("I haven't said anything yet to read.")
        .to_string();
    Reply::with_action(text, FrontEndAction::ReadBack)
}

fn mode_switch_reply(intent: &Intent) -> Reply {
    let mode = intent
        .target
        .as_deref()
        .and_then(|target| target.parse::<InputMode>().ok())
        .unwrap_or(InputMode::Text);
    let text = match mode {
        InputMode::Voice => "Switched to Voice Mode. I'm listening.",
        InputMode::Text => "Switched to Text Mode. Type your command.",
    };
    Reply::with_action(text, FrontEndAction::SwitchMode(mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::{BackendSlot, GenerationSettings};
    use crate::intent::sites::SiteRegistry;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::testing::{FixedKnowledge, GatedKnowledge, RecordingLauncher, ScriptedProvider};
    use futures_util::StreamExt;
    use nova_types::chat::TurnRole;
    use nova_types::intent::ModelAlias;
    use nova_types::llm::GenerationOutcome;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Harness {
        dispatcher: Dispatcher,
        calls: Arc<AtomicUsize>,
        launcher: Arc<RecordingLauncher>,
        session: SharedSession,
    }

    fn harness_with(provider: ScriptedProvider, launcher: RecordingLauncher) -> Harness {
        let calls = provider.calls.clone();
        let aliases = Arc::new(ModelAliasTable::new(vec![
            ModelAlias::new("llama", "llama3.1"),
            ModelAlias::new("coder", "X"),
        ]));
        let sites = SiteRegistry::new(vec![SiteEntry::new(
            "youtube",
            "YouTube",
            "https://youtube.com/",
            Some("https://www.youtube.com/results?search_query={}"),
        )]);
        let brain = StreamingBrain::new("be brief", GenerationSettings::default()).with_local(
            BackendSlot {
                provider: Arc::new(BoxLlmProvider::new(provider)),
                max_tokens: 4096,
            },
        );
        let session = Session::new("llama3.1").shared();
        let launcher = Arc::new(launcher);
        let dispatcher = Dispatcher::new(
            IntentRouter::new(sites, aliases.clone()),
            brain,
            session.clone(),
            aliases,
            launcher.clone(),
        );
        Harness {
            dispatcher,
            calls,
            launcher,
            session,
        }
    }

    fn harness() -> Harness {
        harness_with(
            ScriptedProvider::replying(&["Sure", "."]),
            RecordingLauncher::default(),
        )
    }

    async fn route(h: &Harness, text: &str) -> Response {
        h.dispatcher
            .route_and_respond(&Utterance::new(text), false)
            .await
            .unwrap()
    }

    fn reply(response: Response) -> Reply {
        match response {
            Response::Reply(reply) => reply,
            Response::Stream { .. } => panic!("expected a reply, got a stream"),
        }
    }

    async fn drain(response: Response) -> (Option<String>, String, Option<GenerationOutcome>) {
        match response {
            Response::Stream { notice, stream } => {
                let (text, outcome) = stream.collect_text().await;
                (notice, text, outcome)
            }
            Response::Reply(reply) => panic!("expected a stream, got reply {:?}", reply.text),
        }
    }

    #[tokio::test]
    async fn mode_switch_never_calls_backend() {
        let h = harness();
        let reply = reply(route(&h, "Switch to voice mode").await);

        assert_eq!(reply.text, "Switched to Voice Mode. I'm listening.");
        assert_eq!(reply.action, Some(FrontEndAction::SwitchMode(InputMode::Voice)));
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
        assert!(h.session.lock().await.history.is_empty());
    }

    #[tokio::test]
    async fn empty_utterance_is_input_empty() {
        let h = harness();
        let err = h
            .dispatcher
            .route_and_respond(&Utterance::new("   "), false)
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::InputEmpty);
    }

    #[tokio::test]
    async fn chat_streams_and_records_turns() {
        let h = harness();
        let (notice, text, outcome) = drain(route(&h, "Tell a joke").await).await;

        assert_eq!(notice, None);
        assert_eq!(text, "Sure.");
        assert_eq!(outcome, Some(GenerationOutcome::Completed));
        let session = h.session.lock().await;
        assert_eq!(session.history.context()[0].content, "tell a joke");
        assert_eq!(session.history.context()[1].role, TurnRole::Assistant);
    }

    #[tokio::test]
    async fn read_back_returns_last_generated_text() {
        let h = harness();
        let first = reply(route(&h, "read it").await);
        assert_eq!(first.text, "I haven't said anything yet to read.");
        assert_eq!(first.action, Some(FrontEndAction::ReadBack));

        drain(route(&h, "hello").await).await;
        assert_eq!(reply(route(&h, "read it").await).text, "Sure.");
    }

    #[tokio::test]
    async fn read_back_replays_short_circuit_replies() {
        let h = harness();
        let time = reply(route(&h, "what time is it").await).text;
        assert_eq!(reply(route(&h, "read that").await).text, time);

        reply(route(&h, "open youtube").await);
        let again = reply(route(&h, "read that").await);
        assert_eq!(again.text, "Opening YouTube...");
        assert_eq!(again.action, Some(FrontEndAction::ReadBack));
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_generation_in_flight_at_a_time() {
        let h = harness_with(
            ScriptedProvider::hanging_after(&["Hel"]),
            RecordingLauncher::default(),
        );

        let Response::Stream { mut stream, .. } = route(&h, "first question").await else {
            panic!("expected a stream");
        };
        assert_eq!(stream.next().await.map(|f| f.text).as_deref(), Some("Hel"));

        let second_utterance = Utterance::new("second question");
        let second = h.dispatcher.route_and_respond(&second_utterance, false);
        tokio::pin!(second);
        assert!(
            tokio::time::timeout(Duration::from_millis(50), &mut second)
                .await
                .is_err()
        );
        assert!(
            tokio::time::timeout(Duration::from_millis(50), h.dispatcher.switch_model("coder"))
                .await
                .is_err()
        );
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);

        drop(stream);
        let Response::Stream { mut stream, .. } = second.await.unwrap() else {
            panic!("expected a stream");
        };
        assert_eq!(stream.next().await.map(|f| f.text).as_deref(), Some("Hel"));
        drop(stream);

        let session = h.session.lock().await;
        let turns: Vec<(TurnRole, &str)> = session
            .history
            .context()
            .iter()
            .map(|t| (t.role, t.content.as_str()))
            .collect();
        assert_eq!(
            turns,
            [
                (TurnRole::User, "first question"),
                (TurnRole::Assistant, "Hel"),
                (TurnRole::User, "second question"),
                (TurnRole::Assistant, "Hel"),
            ]
        );
    }

    #[tokio::test]
    async fn site_open_launches_search_or_home() {
        let h = harness();
        assert_eq!(reply(route(&h, "open youtube lofi beats").await).text, "Searching lofi beats on YouTube...");
        assert_eq!(reply(route(&h, "open youtube").await).text, "Opening YouTube...");

        let opened = h.launcher.opened.lock().unwrap().clone();
        assert_eq!(
            opened,
            [
                "https://www.youtube.com/results?search_query=lofi+beats",
                "https://youtube.com/"
            ]
        );
    }

    #[tokio::test]
    async fn launcher_failure_is_reported() {
        let h = harness_with(
            ScriptedProvider::replying(&[]),
            RecordingLauncher {
                fail: true,
                ..Default::default()
            },
        );
        assert_eq!(
            reply(route(&h, "play kesariya").await).text,
            "Sorry, I couldn't open YouTube right now."
        );
    }

    #[tokio::test]
    async fn music_plays_on_youtube() {
        let h = harness();
        assert_eq!(reply(route(&h, "play kesariya on youtube").await).text, "Playing kesariya on YouTube.");
    }

    #[tokio::test]
    async fn time_query_formats_clock() {
        let h = harness();
        let text = reply(route(&h, "what time is it").await).text;
        assert!(text.starts_with("The time is "));
        assert!(text.ends_with("AM") || text.ends_with("PM"));
    }

    #[tokio::test]
    async fn model_switch_by_alias() {
        let h = harness();
        h.session.lock().await.history.append(TurnRole::User, "earlier");

        assert_eq!(h.dispatcher.switch_model("coder").await.unwrap(), "Switched to X");
        assert_eq!(h.dispatcher.active_model().await, "X");
        assert_eq!(h.session.lock().await.history.len(), 1);

        let hit = reply(route(&h, "switch to llama").await);
        assert_eq!(hit.text, "Switched to llama3.1");
        let err = h.dispatcher.switch_model("gpt").await.unwrap_err();
        assert_eq!(err.to_string(), "Model 'gpt' not found. Available: llama, coder");
    }

    #[tokio::test]
    async fn specification_mode_generates_once_then_exits() {
        let h = harness();

        let (notice, _, _) = drain(route(&h, "give specs of phone x").await).await;
        assert_eq!(
            notice.as_deref(),
            Some("Okay, let's talk only about phone x's specifications.")
        );
        assert!(h.dispatcher.in_specification_mode().await);

        let exit = reply(route(&h, "stop").await);
        assert_eq!(exit.text, "Got it. Exiting specification mode.");
        assert!(!h.dispatcher.in_specification_mode().await);
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn specification_follow_ups_skip_classification() {
        let h = harness();
        drain(route(&h, "specs of phone x").await).await;

        // "open youtube" would be a site-open outside the mode.
        let (notice, _, _) = drain(route(&h, "open youtube").await).await;
        assert_eq!(notice.as_deref(), Some("Alright, what else about the specifications?"));
        assert!(h.launcher.opened.lock().unwrap().is_empty());

        let repeat = reply(route(&h, "").await);
        assert_eq!(repeat.text, "Didn't catch that. Please repeat.");
        assert!(h.dispatcher.in_specification_mode().await);
        assert_eq!(h.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn lookup_uses_knowledge_then_falls_back() {
        let h = harness();
        let dispatcher = h.dispatcher.with_knowledge(Arc::new(FixedKnowledge {
            topic: "ada lovelace",
            summary: "Ada Lovelace was a mathematician.",
        }));

        let hit = dispatcher
            .route_and_respond(&Utterance::new("who is Ada Lovelace"), false)
            .await
            .unwrap();
        assert_eq!(reply(hit).text, "Ada Lovelace was a mathematician.");

        let miss = dispatcher
            .route_and_respond(&Utterance::new("who is nobody"), false)
            .await
            .unwrap();
        let (notice, text, _) = drain(miss).await;
        assert_eq!(notice.as_deref(), Some("Hmm, let me think deeper about that."));
        assert_eq!(text, "Sure.");
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_lookup_does_not_block_model_switch() {
        let h = harness();
        let gate = Arc::new(tokio::sync::Notify::new());
        let dispatcher = h.dispatcher.with_knowledge(Arc::new(GatedKnowledge {
            gate: gate.clone(),
            summary: "Ada Lovelace was a mathematician.",
        }));

        let utterance = Utterance::new("who is Ada Lovelace");
        let lookup = dispatcher.route_and_respond(&utterance, false);
        tokio::pin!(lookup);
        assert!(
            tokio::time::timeout(Duration::from_millis(20), &mut lookup)
                .await
                .is_err()
        );

        let switched = tokio::time::timeout(Duration::from_millis(200), dispatcher.switch_model("coder"))
            .await
            .expect("switch_model waited on the lookup");
        assert_eq!(switched.unwrap(), "Switched to X");

        gate.notify_one();
        assert_eq!(reply(lookup.await.unwrap()).text, "Ada Lovelace was a mathematician.");
        assert_eq!(
            h.session.lock().await.last_response(),
            Some("Ada Lovelace was a mathematician.")
        );
    }
}
