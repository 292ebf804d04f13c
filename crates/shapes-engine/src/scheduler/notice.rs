use std::fmt;
use std::sync::mpsc;

/// User-facing message posted when generation or upload fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Building or uploading `what` ran out of memory.
    OutOfMemory { what: String },
    /// Building `what` failed for another reason.
    GenerationFailed { what: String, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::OutOfMemory { what } => write!(f, "Out of memory while building {what}"),
            Notice::GenerationFailed { what, reason } => write!(f, "Could not build {what}: {reason}"),
        }
    }
}

/// Cloneable handle to the host's notice channel.
///
/// Posting never blocks or fails; without a receiver notices are only logged.
#[derive(Debug, Clone, Default)]
pub struct NoticeSender {
    tx: Option<mpsc::Sender<Notice>>,
}

impl NoticeSender {
    pub fn new(tx: mpsc::Sender<Notice>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sender that only logs.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn post(&self, notice: Notice) {
        log::info!("notice: {notice}");
        if let Some(tx) = &self.tx {
            if tx.send(notice).is_err() {
                log::debug!("notice receiver is gone");
            }
        }
    }
}

/// Creates a connected notice sender/receiver pair.
pub fn notice_channel() -> (NoticeSender, mpsc::Receiver<Notice>) {
    let (tx, rx) = mpsc::channel();
    (NoticeSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posted_notices_reach_the_receiver() {
        let (tx, rx) = notice_channel();
        tx.post(Notice::OutOfMemory { what: "spheres".into() });
        assert_eq!(rx.try_recv().unwrap(), Notice::OutOfMemory { what: "spheres".into() });
    }

    #[test]
    fn posting_without_a_receiver_is_harmless() {
        let (tx, rx) = notice_channel();
        drop(rx);
        tx.post(Notice::GenerationFailed { what: "quad".into(), reason: "bad".into() });
        NoticeSender::disabled().post(Notice::OutOfMemory { what: "boxes".into() });
    }

    #[test]
    fn messages_name_the_shape() {
        let n = Notice::GenerationFailed { what: "quad".into(), reason: "two zero extents".into() };
        assert_eq!(n.to_string(), "Could not build quad: two zero extents");
    }
}
