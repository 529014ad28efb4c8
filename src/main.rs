use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use mediasim::{
    LogBuffer, LogSink, MediaMetadata, MediaSession, MonotonicClock, SessionCommand,
    SessionMirror, SimulatedPlayer, SimulatorConfig, TokioScheduler,
};

const USAGE: &str = "commands: play | pause | stop | seek <ms> | state | log | clear | quit";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let log = LogBuffer::new();
    let logger: Arc<dyn LogSink> = Arc::new(log.clone());

    let mut player = SimulatedPlayer::new(
        Arc::new(MonotonicClock::new()),
        Arc::new(TokioScheduler::new()),
        Arc::clone(&logger),
        SimulatorConfig::default(),
    );

    let metadata = MediaMetadata {
        title: Some("Nice Title".to_string()),
        artist: None,
        duration_ms: None,
    };
    let session = Arc::new(Mutex::new(MediaSession::new(metadata, Arc::clone(&logger))));
    session.lock().unwrap().set_active(true);
    player.add_playback_listener(Box::new(SessionMirror::new(Arc::clone(&session))));

    info!("mediasim ready; {}", USAGE);
    println!("{}", USAGE);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "state" => {
                let snapshot = session.lock().unwrap().snapshot();
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            "log" => print!("{}", log.render()),
            "clear" => log.clear(),
            "quit" | "exit" => break,
            "help" => println!("{}", USAGE),
            other => match SessionCommand::parse(other) {
                Ok(command) => command.dispatch(&mut player, logger.as_ref()),
                Err(error) => eprintln!("{}", error),
            },
        }
    }

    // Host shutdown: pause, take the session down, then release the player
    player.pause();
    session.lock().unwrap().set_active(false);
    player.release();
    info!("mediasim shut down");

    Ok(())
}
