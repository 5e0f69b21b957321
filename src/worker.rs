//! Running a collection on a background thread.
//!
//! The worker owns the collection; the caller only ever sees [`SinkEvent`]s
//! arriving on a channel and the final [`CollectionResult`] from `join`. This
//! keeps a driver's own state (a terminal line, a window) on the driver's
//! thread.

use crate::collector::{self, CollectOptions, CollectionResult};
use crate::sink::{ChannelSink, SinkEvent};
use std::io;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

/// A collection running on its own thread.
pub struct CollectionHandle {
    events: mpsc::Receiver<SinkEvent>,
    thread: JoinHandle<CollectionResult>,
}

impl CollectionHandle {
    /// Events produced so far and in the future. The iterator ends once the
    /// collection has finished.
    pub fn events(&self) -> mpsc::Iter<'_, SinkEvent> {
        self.events.iter()
    }

    /// Events that are ready right now, without blocking.
    pub fn try_events(&self) -> mpsc::TryIter<'_, SinkEvent> {
        self.events.try_iter()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the collection to end.
    pub fn join(self) -> anyhow::Result<CollectionResult> {
        self.thread
            .join()
            .map_err(|_| anyhow::anyhow!("collection thread panicked"))
    }
}

/// Starts collecting with `options` on a new thread.
pub fn spawn(options: CollectOptions) -> io::Result<CollectionHandle> {
    let (tx, rx) = mpsc::channel();
    let thread = thread::Builder::new()
        .name("collector".to_string())
        .spawn(move || {
            log::debug!("collector thread started for {}", options.root.display());
            collector::collect_with(&options, ChannelSink::new(tx))
        })?;

    Ok(CollectionHandle {
        events: rx,
        thread,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Progress;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    #[test]
    fn test_events_arrive_then_result() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child("src/A.cs").write_str("class A{}")?;
        dir.child("src/B.cs").write_str("class B{}")?;
        let output = dir.path().join("out.txt");

        let handle = spawn(CollectOptions::new(dir.path().join("src"), &output, ".cs"))?;
        let events: Vec<SinkEvent> = handle.events().collect();
        let result = handle.join()?;

        assert!(result.is_success());
        assert_eq!(result.processed, 2);

        let progress: Vec<Progress> = events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Progress(p) => Some(*p),
                SinkEvent::Log(_) => None,
            })
            .collect();
        assert_eq!(
            progress,
            vec![
                Progress::Percent(50),
                Progress::Percent(100),
                Progress::Percent(100)
            ]
        );
        assert!(events.contains(&SinkEvent::Log("Processing: A.cs".to_string())));
        Ok(())
    }

    #[test]
    fn test_polling_without_blocking() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        for i in 0..4 {
            dir.child(format!("src/F{i}.cs")).write_str("class F{}")?;
        }
        let output = dir.path().join("out.txt");

        let handle = spawn(CollectOptions::new(dir.path().join("src"), &output, ".cs"))?;
        let mut events = Vec::new();
        while !handle.is_finished() {
            events.extend(handle.try_events());
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        events.extend(handle.try_events());
        let result = handle.join()?;

        assert!(result.is_success());
        assert_eq!(result.processed, 4);
        let logged = events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Log(l) if l.starts_with("Processing: ")))
            .count();
        assert_eq!(logged, 4);
        assert_eq!(
            events.last(),
            Some(&SinkEvent::Progress(Progress::Percent(100)))
        );
        Ok(())
    }

    #[test]
    fn test_failed_run_reports_sentinel() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let handle = spawn(CollectOptions::new(
            dir.path().join("gone"),
            dir.path().join("out.txt"),
            ".cs",
        ))?;
        let events: Vec<SinkEvent> = handle.events().collect();
        let result = handle.join()?;

        assert!(result.is_failed());
        assert_eq!(events.last(), Some(&SinkEvent::Progress(Progress::Failed)));
        Ok(())
    }
}
