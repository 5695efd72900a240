use std::{io, time::Duration};

use crossterm::event::KeyCode;
use ratatui::{prelude::CrosstermBackend, Terminal};
use request_status::{
    config::Config,
    navigation::{LoadingState, NavigationEvent},
    notification::{Messages, Notifier, Operation, OperationId, Policy},
};
use tokio::{
    sync::mpsc::{Receiver, Sender},
    task,
};

use crate::{event::input::AppEvent, ui::render};

const REQUEST_DURATION: Duration = Duration::from_millis(1500);
const NAVIGATION_DURATION: Duration = Duration::from_millis(1000);
const NOTICE_SEVERITY: u32 = 50;

pub struct App {
    pub config: Config,
    pub notifier: Notifier,
    pub loading: LoadingState,
    receiver: Receiver<AppEvent>,
    sender: Sender<AppEvent>,
    notices: Vec<OperationId>,
    requests: usize,
    quit: bool,
}

impl App {
    pub fn new(config: Config, receiver: Receiver<AppEvent>, sender: Sender<AppEvent>) -> App {
        App {
            notifier: Notifier::new(&config),
            config,
            loading: LoadingState::default(),
            receiver,
            sender,
            notices: Vec::new(),
            requests: 0,
            quit: false,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<(), anyhow::Error> {
        loop {
            terminal.autoresize()?;
            terminal.draw(|frame| {
                render(self, frame);
            })?;

            tokio::select! {
                event = self.receiver.recv() => match event {
                    Some(event) => self.handle_event(event).await?,
                    None => return Ok(()),
                },
                Some(event) = self.notifier.next_event() => self.notifier.handle(event),
            }

            if self.quit {
                return Ok(());
            }
        }
    }

    async fn handle_event(&mut self, event: AppEvent) -> Result<(), anyhow::Error> {
        match event {
            AppEvent::Quit => self.quit = true,
            AppEvent::Startup => {
                // lowest severity, shows whenever nothing else is going on
                self.notifier.notify(None, "[h] for help", Some(0));
            }
            AppEvent::Navigation(event) => self.loading.handle(event),
            AppEvent::Input(e) => match e.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Char('r') => self.request(true),
                KeyCode::Char('e') => self.request(false),
                KeyCode::Char('n') => {
                    let id = self.notifier.notify(
                        None,
                        format!("notice {}", self.notices.len() + 1),
                        Some(NOTICE_SEVERITY),
                    );
                    self.notices.push(id);
                }
                KeyCode::Char('d') => {
                    if let Some(id) = self.notices.pop() {
                        self.notifier.dismiss(id);
                    }
                }
                KeyCode::Char('g') => self.navigate().await?,
                KeyCode::Char('h') => {
                    self.notifier.track_with(
                        Operation::timer(self.config.message_timeout),
                        Messages::default().with_start(
                            "[r] request [e] failing request [n] notice [d] dismiss [g] navigate [q] quit",
                        ),
                        Policy::StartOnly,
                        Some(NOTICE_SEVERITY + 1),
                    );
                }
                _ => (),
            },
        };
        Ok(())
    }

    fn request(&mut self, succeed: bool) {
        self.requests += 1;
        let number = self.requests;
        let operation = Operation::new(async move {
            tokio::time::sleep(REQUEST_DURATION).await;
            match succeed {
                true => Ok(()),
                false => Err(format!("request {} timed out", number)),
            }
        });
        let messages = Messages::default()
            .with_start(format!("Loading request {}...", number))
            .with_success(format!("Request {} done", number));
        self.notifier.track_with(operation, messages, Policy::All, None);
    }

    async fn navigate(&mut self) -> Result<(), anyhow::Error> {
        self.sender
            .send(AppEvent::Navigation(NavigationEvent::Start {
                resolves: true,
                unload_guarded: false,
            }))
            .await?;

        let sender = self.sender.clone();
        task::spawn(async move {
            tokio::time::sleep(NAVIGATION_DURATION).await;
            let _ = sender
                .send(AppEvent::Navigation(NavigationEvent::Success))
                .await;
        });
        Ok(())
    }

    pub fn active_notices(&self) -> usize {
        self.notices.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use request_status::notification::{CurrentMessage, Phase};
    use tokio::sync::mpsc;

    fn app() -> (App, Receiver<AppEvent>) {
        let (sender, receiver) = mpsc::channel(16);
        let (_, unused) = mpsc::channel(1);
        // events the app sends to itself end up with the test
        (App::new(Config::default(), unused, sender), receiver)
    }

    fn key(c: char) -> AppEvent {
        AppEvent::Input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_and_dismiss() -> Result<(), anyhow::Error> {
        let (mut app, _events) = app();
        app.handle_event(AppEvent::Startup).await?;
        assert_eq!(Some(0), app.notifier.current().severity);

        app.handle_event(key('n')).await?;
        assert_eq!(Some("notice 1".to_string()), app.notifier.current().text);
        assert_eq!(1, app.active_notices());

        app.handle_event(key('d')).await?;
        assert_eq!(Some("[h] for help".to_string()), app.notifier.current().text);
        assert_eq!(0, app.active_notices());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_request() -> Result<(), anyhow::Error> {
        let (mut app, _events) = app();
        app.handle_event(key('e')).await?;
        assert_eq!(
            Some("Loading request 1...".to_string()),
            app.notifier.current().text
        );

        app.notifier.process().await;
        assert_eq!(Some(Phase::Fail), app.notifier.current().phase);

        app.notifier.process().await;
        assert_eq!(CurrentMessage::none(), app.notifier.current());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_toggles_loading() -> Result<(), anyhow::Error> {
        let (mut app, mut events) = app();
        app.handle_event(key('g')).await?;

        let Some(started) = events.recv().await else {
            panic!("navigation did not start");
        };
        app.handle_event(started).await?;
        assert!(app.loading.is_loading());

        let Some(finished) = events.recv().await else {
            panic!("navigation did not finish");
        };
        app.handle_event(finished).await?;
        assert!(!app.loading.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn test_quit() -> Result<(), anyhow::Error> {
        let (mut app, _events) = app();
        app.handle_event(key('q')).await?;
        assert!(app.quit);
        Ok(())
    }
}
