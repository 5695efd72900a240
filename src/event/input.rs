use std::{thread, time::Duration};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyModifiers};
use log::error;
use request_status::navigation::NavigationEvent;
use tokio::sync::mpsc::Sender;

#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Quit,
    Startup,
    Navigation(NavigationEvent),
}

pub type EventSender = Sender<AppEvent>;

pub fn start(event_sender: EventSender) {
    thread::spawn(move || {
        if event_sender.blocking_send(AppEvent::Startup).is_err() {
            return;
        }
        loop {
            let key = match poll(Duration::from_millis(1000)) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => key,
                    Ok(_) => continue,
                    Err(e) => {
                        error!("could not read terminal event: {}", e);
                        continue;
                    }
                },
                Ok(false) => continue,
                Err(e) => {
                    error!("could not poll terminal: {}", e);
                    return;
                }
            };

            // handle global keys
            let action = match key.modifiers {
                KeyModifiers::CONTROL => match key.code {
                    KeyCode::Char('c') => AppEvent::Quit,
                    _ => AppEvent::Input(key),
                },
                _ => AppEvent::Input(key),
            };

            // the app has shut down
            if event_sender.blocking_send(action).is_err() {
                return;
            }
        }
    });
}
