//! Per-player output channels.
//!
//! The core never talks to a socket. Each online player owns an [`Output`]
//! that accepts lines (`say`), fragments (`write`) and prompts. Sinks must not
//! block: they are called from inside command handlers of other players.

use std::sync::Mutex;
use tokio::sync::mpsc;

use crate::mud::messages::Message;

pub trait Output: Send + Sync {
    /// Send `text` followed by a line break.
    fn say(&self, text: &str);

    /// Send `text` without a trailing line break.
    fn write(&self, text: &str);

    /// Redraw the status line/prompt.
    fn prompt(&self, status: &str) {
        self.write(status);
    }

    fn say_msg(&self, message: &Message) {
        self.say(&message.to_string());
    }

    fn write_msg(&self, message: &Message) {
        self.write(&message.to_string());
    }
}

/// Output that forwards text to a session task over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelOutput {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelOutput {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Convenience constructor returning the receiving half as well.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Output for ChannelOutput {
    fn say(&self, text: &str) {
        // A closed receiver means the session is gone; nothing left to tell.
        let _ = self.tx.send(format!("{}\r\n", text));
    }

    fn write(&self, text: &str) {
        let _ = self.tx.send(text.to_string());
    }
}

/// Output that keeps everything in memory. Used for bots and tests.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    buffer: Mutex<String>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, `say` lines terminated by `\n`.
    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drain the buffer.
    pub fn take(&self) -> String {
        match self.buffer.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    fn push(&self, text: &str) {
        match self.buffer.lock() {
            Ok(mut guard) => guard.push_str(text),
            Err(poisoned) => poisoned.into_inner().push_str(text),
        }
    }
}

impl Output for RecordingOutput {
    fn say(&self, text: &str) {
        self.push(text);
        self.push("\n");
    }

    fn write(&self, text: &str) {
        self.push(text);
    }
}
