//! Line-based chat loop over stdin/stdout.
//!
//! Sends run as tracked background tasks so commands stay responsive while
//! a reply is pending; they are drained before the session shuts down.
//! Replies and state changes are printed from the event stream.

use ticai_common::Event;
use ticai_session::{
    ClearState, ModeRegistry, ModeSection, SessionController, SessionError, SessionSnapshot,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::{JoinHandle, JoinSet};

use crate::command::{self, Command, HELP};

/// Run the chat loop until `/quit` or end of input, then wait for pending
/// replies and shut the session down.
pub async fn run<R>(controller: SessionController, input: R) -> ticai_common::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    print_history(&controller.snapshot());
    println!("{HELP}");

    let printer = spawn_printer(controller.clone());
    let mut sends = JoinSet::new();
    let result = read_commands(&controller, input, &mut sends).await;

    if !sends.is_empty() {
        tracing::debug!(pending = sends.len(), "waiting for pending replies");
    }
    while let Some(joined) = sends.join_next().await {
        if let Err(e) = joined {
            tracing::warn!("send task failed: {e}");
        }
    }

    controller.shutdown().await;
    if let Err(e) = printer.await {
        tracing::debug!("chat printer ended abnormally: {e}");
    }
    result
}

async fn read_commands<R>(
    controller: &SessionController,
    input: R,
    sends: &mut JoinSet<()>,
) -> ticai_common::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match command::parse(&line) {
            Command::Say(text) => {
                controller.update_draft(&text);
                let sender = controller.clone();
                sends.spawn(async move {
                    if let Err(e) = sender.send_message(&text).await {
                        if let Some(notice) = rejection_notice(&e) {
                            println!("{notice}");
                        }
                    }
                });
            }
            Command::Modes(filter) => {
                let sections = match filter {
                    Some(query) => controller.registry().filter(&query),
                    None => controller.registry().sections().to_vec(),
                };
                print_modes(controller.registry(), &sections, &controller.snapshot().mode);
            }
            Command::Mode(key) => {
                if let Err(e) = controller.select_mode(&key) {
                    println!("! {e}");
                }
            }
            Command::Clear => {
                controller.request_clear();
                println!("Clear the conversation? /yes or /no");
            }
            Command::Yes => {
                if let Err(e) = controller.confirm_clear() {
                    println!("! {e}");
                }
            }
            Command::No => {
                if let Err(e) = controller.cancel_clear() {
                    println!("! {e}");
                }
            }
            Command::Status => print_status(&controller.snapshot()),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(name) => println!("! unknown command /{name}, try /help"),
        }
    }
    Ok(())
}

/// Line shown for a rejected send. Blank input is ignored silently.
fn rejection_notice(error: &SessionError) -> Option<String> {
    match error {
        SessionError::EmptyInput => None,
        other => Some(format!("! {other}")),
    }
}

fn spawn_printer(controller: SessionController) -> JoinHandle<()> {
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "chat printer fell behind");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match event {
                Event::MessageAppended {
                    id,
                    sent_by_user: false,
                } => {
                    let snapshot = controller.snapshot();
                    if let Some(message) = usize::try_from(id)
                        .ok()
                        .and_then(|index| snapshot.messages.get(index))
                    {
                        println!("ticai> {}", message.text);
                    }
                    if snapshot.needs_new_topic {
                        println!("-- Start a new topic: /clear to continue --");
                    }
                }
                Event::LoadingChanged(true) => println!("..."),
                Event::ModeChanged(mode) => println!("mode: {mode}"),
                Event::ClearCancelled => println!("clear cancelled"),
                Event::Cleared => println!("conversation cleared"),
                Event::RateWindowReset => println!("request limit reset"),
                Event::PersistenceFailed(reason) => println!("! could not save: {reason}"),
                Event::Shutdown => break,
                _ => {}
            }
        }
    })
}

fn print_history(snapshot: &SessionSnapshot) {
    for message in &snapshot.messages {
        let who = if message.sent_by_user { "you" } else { "ticai" };
        println!("{who}> {}", message.text);
    }
    println!("mode: {}", snapshot.mode);
}

fn print_modes(registry: &ModeRegistry, sections: &[ModeSection], current: &str) {
    if sections.is_empty() {
        println!("no matching modes");
        return;
    }
    for section in sections {
        // Headings come from the full section, filtering may drop the key entry.
        let title = registry
            .sections()
            .iter()
            .find(|full| full.name == section.name)
            .map_or(section.name.as_str(), ModeSection::title);
        println!("{title}:");
        for mode in &section.modes {
            let marker = if mode.key == current { '*' } else { ' ' };
            let note = if mode.available { "" } else { " (coming soon)" };
            println!(" {marker} {:<10} {}{note}", mode.key, mode.label);
        }
    }
}

fn print_status(snapshot: &SessionSnapshot) {
    println!(
        "messages: {}  mode: {}  requests: {}{}{}",
        snapshot.messages.len(),
        snapshot.mode,
        snapshot.request_count,
        if snapshot.loading { "  (waiting for reply)" } else { "" },
        if snapshot.clear_state == ClearState::PendingConfirm {
            "  (clear pending)"
        } else {
            ""
        },
    );
    if snapshot.rate_limited {
        println!("request limit reached, wait for the window to reset");
    }
}
