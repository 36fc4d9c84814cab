use log::{debug, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use tlk_core::{NpcId, TalkError, TalkOutput};
use tlk_runtime::{TalkEngine, TalkEngineOptions};

pub const DEFAULT_OUTPUT_BUFFER: usize = 64;

const INPUT_BUFFER: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    pub output_buffer: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            output_buffer: DEFAULT_OUTPUT_BUFFER,
        }
    }
}

/// Consumer side of a conversation running on its own task. The output
/// channel closes once the conversation ends or is cancelled; dropping the
/// handle cancels it.
pub struct ConversationStream {
    outputs: mpsc::Receiver<TalkOutput>,
    inputs: mpsc::Sender<String>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Starts a conversation with `npc` on a new task. Must be called from
/// within a tokio runtime.
pub fn spawn_conversation(
    options: TalkEngineOptions,
    npc: NpcId,
    stream: StreamOptions,
) -> ConversationStream {
    let (output_tx, output_rx) = mpsc::channel(stream.output_buffer.max(1));
    let (input_tx, input_rx) = mpsc::channel(INPUT_BUFFER);
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let engine = TalkEngine::new(options);
    let task = tokio::spawn(drive(engine, npc, output_tx, input_rx, cancel_rx));

    ConversationStream {
        outputs: output_rx,
        inputs: input_tx,
        cancel: cancel_tx,
        task,
    }
}

impl ConversationStream {
    /// Next fragment, or `None` once the conversation is over.
    pub async fn recv(&mut self) -> Option<TalkOutput> {
        self.outputs.recv().await
    }

    /// Collects fragments up to and including the next input request or end.
    /// Stops early if the channel closes.
    pub async fn recv_until_boundary(&mut self) -> Vec<TalkOutput> {
        let mut fragments = Vec::new();
        while let Some(output) = self.outputs.recv().await {
            let boundary = output.is_boundary();
            fragments.push(output);
            if boundary {
                break;
            }
        }
        fragments
    }

    pub async fn send_input(&self, text: impl Into<String>) -> Result<(), TalkError> {
        self.inputs
            .send(text.into())
            .await
            .map_err(|_| TalkError::InactiveConversation)
    }

    pub fn cancel(&self) {
        // The task may already be gone; nothing left to stop then.
        let _ = self.cancel.send(true);
    }

    pub async fn join(self) {
        let Self {
            outputs,
            inputs,
            cancel,
            task,
        } = self;
        drop(inputs);
        drop(outputs);
        if let Err(error) = task.await {
            warn!("conversation task failed: {}", error);
        }
        drop(cancel);
    }
}

async fn drive(
    mut engine: TalkEngine,
    npc: NpcId,
    outputs: mpsc::Sender<TalkOutput>,
    mut inputs: mpsc::Receiver<String>,
    mut cancel: watch::Receiver<bool>,
) {
    if let Err(error) = engine.start(npc) {
        let _ = outputs.send(TalkOutput::error(&error)).await;
        return;
    }

    loop {
        if *cancel.borrow() {
            engine.cancel();
            break;
        }

        let output = match engine.next_output() {
            Ok(output) => output,
            Err(error) => {
                let fatal = error.is_fatal();
                if !send(&outputs, &mut cancel, TalkOutput::error(&error)).await || !fatal {
                    engine.cancel();
                    break;
                }
                continue;
            }
        };

        let awaiting = matches!(output, TalkOutput::Input { .. });
        let finished = matches!(output, TalkOutput::End);
        if !send(&outputs, &mut cancel, output).await {
            engine.cancel();
            break;
        }
        if finished {
            break;
        }
        if !awaiting {
            continue;
        }

        let reply = tokio::select! {
            biased;
            _ = cancel.changed() => None,
            reply = inputs.recv() => reply,
        };
        let Some(text) = reply else {
            debug!("{}: input closed or cancelled while waiting", npc);
            engine.cancel();
            break;
        };
        if let Err(error) = engine.submit_input(&text) {
            if !send(&outputs, &mut cancel, TalkOutput::error(&error)).await {
                engine.cancel();
                break;
            }
        }
    }
    drop(inputs);
    debug!("{}: conversation stream closed", npc);
}

/// Returns false when the consumer is gone or cancellation arrived first.
async fn send(
    outputs: &mpsc::Sender<TalkOutput>,
    cancel: &mut watch::Receiver<bool>,
    output: TalkOutput,
) -> bool {
    tokio::select! {
        biased;
        _ = cancel.changed() => false,
        sent = outputs.send(output) => sent.is_ok(),
    }
}
