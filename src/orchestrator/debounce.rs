use std::time::Duration;
use tokio::sync::mpsc;

use super::service::Command;

/// Input to the search debouncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    /// The search box now holds this text.
    Text(String),
    /// Drop any pending text without forwarding it.
    Cancel,
}

/// Forwards search text only after it has stopped changing
///
/// Settled text is sent as [`Command::SubmitSearchText`] on the same channel
/// as every other view command, so it is ordered with respect to them.
pub struct SearchDebouncer {
    /// How long the text must be unchanged before it is forwarded
    quiet_period: Duration,
    input: mpsc::Receiver<Keystroke>,
    commands: mpsc::Sender<Command>,
}

impl SearchDebouncer {
    pub fn new(
        quiet_period: Duration,
        input: mpsc::Receiver<Keystroke>,
        commands: mpsc::Sender<Command>,
    ) -> Self {
        Self {
            quiet_period,
            input,
            commands,
        }
    }

    /// Run until the input channel closes or the receiver goes away.
    pub async fn run(mut self) {
        while let Some(first) = self.input.recv().await {
            let mut pending = match first {
                Keystroke::Text(text) => text,
                Keystroke::Cancel => continue,
            };

            loop {
                tokio::select! {
                    // Queued input beats an elapsed quiet period, so a Cancel
                    // sent at the boundary still drops the text.
                    biased;

                    next = self.input.recv() => match next {
                        Some(Keystroke::Text(text)) => pending = text,
                        Some(Keystroke::Cancel) => {
                            tracing::trace!("Pending search text cancelled");
                            break;
                        }
                        None => {
                            let _ = self.forward(pending).await;
                            return;
                        }
                    },
                    _ = tokio::time::sleep(self.quiet_period) => {
                        tracing::trace!(text = %pending, "Search text settled");
                        if self.forward(pending).await.is_err() {
                            return;
                        }
                        break;
                    }
                }
            }
        }
    }

    async fn forward(&self, text: String) -> Result<(), mpsc::error::SendError<Command>> {
        self.commands.send(Command::SubmitSearchText(text)).await
    }
}
