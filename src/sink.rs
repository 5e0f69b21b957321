//! Where the collector reports what it is doing.
//!
//! A [`Sink`] receives user-facing log lines and progress updates while a
//! collection runs. Drivers decide how to render them: the CLI prints them,
//! the [`crate::worker`] forwards them over a channel.

use std::sync::mpsc;

/// A progress update: a percentage, or the marker for an aborted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Completion in percent, always in `0..=100`.
    Percent(u8),
    /// The run hit a fatal error and stopped.
    Failed,
}

impl Progress {
    /// `floor(done / total * 100)`, clamped to 100. An empty run counts as done.
    pub fn from_counts(done: usize, total: usize) -> Self {
        if total == 0 {
            return Progress::Percent(100);
        }
        let pct = (done.min(total) * 100) / total;
        Progress::Percent(pct as u8)
    }

    pub fn percent(self) -> Option<u8> {
        match self {
            Progress::Percent(p) => Some(p),
            Progress::Failed => None,
        }
    }
}

/// Receives log messages and progress updates from a collection run.
///
/// Calls are made synchronously from the thread running the collector and
/// should return quickly.
pub trait Sink {
    fn log(&mut self, message: &str);
    fn progress(&mut self, progress: Progress);
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn log(&mut self, message: &str) {
        (**self).log(message)
    }

    fn progress(&mut self, progress: Progress) {
        (**self).progress(progress)
    }
}

/// A sink built from a pair of closures.
pub struct FnSink<L, P> {
    on_log: L,
    on_progress: P,
}

impl<L, P> FnSink<L, P>
where
    L: FnMut(&str),
    P: FnMut(Progress),
{
    pub fn new(on_log: L, on_progress: P) -> Self {
        Self {
            on_log,
            on_progress,
        }
    }
}

impl<L, P> Sink for FnSink<L, P>
where
    L: FnMut(&str),
    P: FnMut(Progress),
{
    fn log(&mut self, message: &str) {
        (self.on_log)(message)
    }

    fn progress(&mut self, progress: Progress) {
        (self.on_progress)(progress)
    }
}

/// A sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn log(&mut self, _message: &str) {}
    fn progress(&mut self, _progress: Progress) {}
}

/// A message carried from a collection thread to whoever renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Log(String),
    Progress(Progress),
}

impl SinkEvent {
    /// Delivers this event to `sink` as if the collector had called it directly.
    pub fn replay(self, sink: &mut impl Sink) {
        match self {
            SinkEvent::Log(message) => sink.log(&message),
            SinkEvent::Progress(progress) => sink.progress(progress),
        }
    }
}

/// Forwards every call as a [`SinkEvent`] over a channel.
///
/// Sending never blocks. If the receiving side has gone away the events are
/// dropped and the run carries on.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<SinkEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SinkEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            log::trace!("sink receiver disconnected, dropping event");
        }
    }
}

impl Sink for ChannelSink {
    fn log(&mut self, message: &str) {
        self.send(SinkEvent::Log(message.to_string()));
    }

    fn progress(&mut self, progress: Progress) {
        self.send(SinkEvent::Progress(progress));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_counts_floors() {
        assert_eq!(Progress::from_counts(1, 3), Progress::Percent(33));
        assert_eq!(Progress::from_counts(2, 3), Progress::Percent(66));
        assert_eq!(Progress::from_counts(3, 3), Progress::Percent(100));
        assert_eq!(Progress::from_counts(0, 7), Progress::Percent(0));
    }

    #[test]
    fn test_progress_from_counts_edge_cases() {
        assert_eq!(Progress::from_counts(0, 0), Progress::Percent(100));
        assert_eq!(Progress::from_counts(9, 4), Progress::Percent(100));
        assert_eq!(Progress::Failed.percent(), None);
    }

    #[test]
    fn test_fn_sink_calls_closures() {
        let mut lines = Vec::new();
        let mut values = Vec::new();
        {
            let mut sink = FnSink::new(|m: &str| lines.push(m.to_string()), |p| values.push(p));
            sink.log("hello");
            sink.progress(Progress::Percent(50));
            sink.progress(Progress::Failed);
        }
        assert_eq!(lines, vec!["hello"]);
        assert_eq!(values, vec![Progress::Percent(50), Progress::Failed]);
    }

    #[test]
    fn test_channel_sink_forwards_events() {
        let (tx, rx) = mpsc::channel();
        let mut sink = ChannelSink::new(tx);
        sink.log("processing: a.cs");
        sink.progress(Progress::Percent(100));
        drop(sink);

        let events: Vec<SinkEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                SinkEvent::Log("processing: a.cs".to_string()),
                SinkEvent::Progress(Progress::Percent(100)),
            ]
        );
    }

    #[test]
    fn test_replay_reaches_sink() {
        let mut lines = Vec::new();
        let mut values = Vec::new();
        {
            let mut sink = FnSink::new(|m: &str| lines.push(m.to_string()), |p| values.push(p));
            SinkEvent::Log("done".to_string()).replay(&mut sink);
            SinkEvent::Progress(Progress::Percent(100)).replay(&mut sink);
        }
        assert_eq!(lines, vec!["done"]);
        assert_eq!(values, vec![Progress::Percent(100)]);
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        sink.log("nobody listens");
        sink.progress(Progress::Percent(10));
    }
}
