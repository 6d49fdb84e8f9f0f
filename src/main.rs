use std::path::PathBuf;
use std::time::Duration;

use envelope_surprise::{AppResult, CardConfig, CardExperience, Event, PresentationState};

/// Console log output, filterable via RUST_LOG
fn initialize_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> AppResult<()> {
    initialize_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => CardConfig::load(&PathBuf::from(path))?,
        None => CardConfig::default(),
    };

    println!("A surprise for {}!\n", config.recipient_name);

    let experience = CardExperience::new(config);
    let (events, _subscription) = experience.subscribe();

    experience.set_music_playing(true);
    experience.open();

    // Follow the reveal to the celebration, then play the greeting
    while let Ok(event) = events.recv_timeout(Duration::from_secs(10)) {
        match event {
            Event::StageChanged { stage } => {
                println!("  {stage}");
                if stage == PresentationState::CelebrationActive {
                    break;
                }
            }
            Event::MusicStateChanged { playing } => {
                tracing::debug!(playing, "music state changed");
            }
            other => tracing::debug!(?other, "event"),
        }
    }

    experience.play_greeting();
    while experience.greeting_in_progress() {
        std::thread::sleep(Duration::from_millis(50));
    }

    // Drain the greeting outcome so failures reach the user
    while let Ok(event) = events.try_recv() {
        if let Event::VoiceGreetingFailed { message } = event {
            eprintln!("Could not play the greeting: {message}");
        }
    }

    println!("\n{}", experience.config().message);
    Ok(())
}
