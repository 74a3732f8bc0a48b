//! Host feed: decoding host lines and coalescing them per tick

pub mod protocol;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, warn};

pub use protocol::{CoreMsg, FrameInput, HandInput, HostMsg};

/// Host messages queued before the driver drops input
pub const INBOX_CAPACITY: usize = 256;

/// Control signals applied at a tick boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    Restart,
    Exit,
}

/// Everything that arrived since the previous tick
#[derive(Debug, Default)]
pub struct Drained {
    /// Latest frame only; older ones are superseded
    pub frame: Option<FrameInput>,
    /// Controls in arrival order
    pub controls: Vec<Control>,
    /// The host side hung up
    pub closed: bool,
}

/// Receiving end of the host feed
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::Receiver<HostMsg>,
}

pub fn channel() -> (mpsc::Sender<HostMsg>, Inbox) {
    let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
    (tx, Inbox { rx })
}

impl Inbox {
    /// Take everything queued without waiting
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        let mut superseded = 0u32;
        loop {
            match self.rx.try_recv() {
                Ok(msg) => {
                    if drained.push(msg).is_some() {
                        superseded += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    drained.closed = true;
                    break;
                }
            }
        }
        if superseded > 0 {
            debug!(superseded, "Coalesced host frames");
        }
        drained
    }

    /// Wait for the next message; `None` once the host hangs up
    pub async fn recv(&mut self) -> Option<HostMsg> {
        self.rx.recv().await
    }
}

impl Drained {
    /// Returns the frame this message replaced, if any
    fn push(&mut self, msg: HostMsg) -> Option<FrameInput> {
        match msg {
            HostMsg::Frame(frame) => self.frame.replace(frame),
            HostMsg::Pause => self.control(Control::Pause),
            HostMsg::Resume => self.control(Control::Resume),
            HostMsg::Restart => self.control(Control::Restart),
            HostMsg::Exit => self.control(Control::Exit),
        }
    }

    fn control(&mut self, control: Control) -> Option<FrameInput> {
        self.controls.push(control);
        None
    }
}

/// Parse one host line. Blank lines are ignored; bad ones are logged and skipped.
pub fn decode_line(line: &str) -> Option<HostMsg> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(msg) => Some(msg),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed host message");
            None
        }
    }
}

/// Serialize one core message as a single line
pub fn encode(msg: &CoreMsg) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HandRole;

    fn frame_with(role: HandRole) -> HostMsg {
        HostMsg::Frame(FrameInput {
            hands: vec![HandInput {
                role,
                landmarks: Vec::new(),
            }],
        })
    }

    #[test]
    fn test_latest_frame_wins() {
        let (tx, mut inbox) = channel();
        tx.try_send(frame_with(HandRole::Left)).unwrap();
        tx.try_send(HostMsg::Pause).unwrap();
        tx.try_send(frame_with(HandRole::Right)).unwrap();
        tx.try_send(HostMsg::Resume).unwrap();

        let drained = inbox.drain();
        let frame = drained.frame.unwrap();
        assert_eq!(frame.hands[0].role, HandRole::Right);
        assert_eq!(drained.controls, vec![Control::Pause, Control::Resume]);
        assert!(!drained.closed);

        let drained = inbox.drain();
        assert!(drained.frame.is_none());
        assert!(drained.controls.is_empty());
    }

    #[test]
    fn test_drain_reports_hangup() {
        let (tx, mut inbox) = channel();
        tx.try_send(HostMsg::Exit).unwrap();
        drop(tx);
        let drained = inbox.drain();
        assert_eq!(drained.controls, vec![Control::Exit]);
        assert!(drained.closed);
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line("  "), None);
        assert_eq!(decode_line("{\"type\":\"pause\"}\n"), Some(HostMsg::Pause));
        assert_eq!(decode_line("{oops"), None);
    }

    #[test]
    fn test_encode_is_single_line() {
        let line = encode(&CoreMsg::Fault {
            message: "line\nbreak".into(),
        })
        .unwrap();
        assert!(!line.contains('\n'));
    }
}
