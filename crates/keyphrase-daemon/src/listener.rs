use crate::keyboard::rdev_event_to_key;
use keyphrase_core::{KeyGate, KeyphraseError, Offer, Result};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info, trace, warn};

const MAX_RETRIES: u32 = 5;

/// Starts listening for keyboard events and offers them to the engine thread.
///
/// The callback never runs a substitution itself. While one is running on
/// the engine thread the gate discards what the hook reports, including the
/// echo of our own synthetic keystrokes.
pub fn start_keyboard_listener(gate: KeyGate) -> std::io::Result<JoinHandle<Result<()>>> {
    thread::Builder::new()
        .name("keyboard-listener".to_string())
        .spawn(move || listen_with_retry(gate))
}

fn listen_with_retry(gate: KeyGate) -> Result<()> {
    let mut retry_count = 0;

    while retry_count < MAX_RETRIES {
        let gate = gate.clone();
        let callback = move |event: rdev::Event| {
            let Some(key) = rdev_event_to_key(&event) else {
                return;
            };
            match gate.offer(key) {
                Offer::Accepted => {}
                Offer::Dropped => trace!("Key dropped at the hook"),
                Offer::Closed => trace!("Engine stopped, ignoring key"),
            }
        };

        info!("Listening for keyboard events");
        match rdev::listen(callback) {
            Ok(()) => {
                // Normally this shouldn't happen since listen() blocks
                return Ok(());
            }
            Err(err) => {
                retry_count += 1;
                warn!(
                    error = ?err,
                    attempt = retry_count,
                    max = MAX_RETRIES,
                    "Keyboard listener failed, retrying"
                );
                thread::sleep(Duration::from_secs(1));
            }
        }
    }

    error!(attempts = MAX_RETRIES, "Failed to start keyboard listener");
    Err(KeyphraseError::Keyboard(format!(
        "keyboard listener failed after {} attempts",
        MAX_RETRIES
    )))
}
