//! Bounded log of human-readable lines fed by the push channel.

use std::collections::VecDeque;

use crate::protocol::LiveEvent;

/// Hard cap on retained lines. Inserting into a full log drops the
/// oldest entry.
pub const EVENT_LOG_CAPACITY: usize = 8;

/// Newest-first buffer of rendered event lines.
///
/// This is a pure side channel: the events carry no correlation key back
/// to any in-flight request, so the log never tries to match them up.
#[derive(Debug, Default)]
pub struct EventLog {
    lines: VecDeque<String>,
}

impl EventLog {
    /// Renders and stores one event. Unrecognized events are dropped.
    pub fn record(&mut self, event: &LiveEvent) {
        let Some(line) = render(event) else {
            return;
        };
        self.lines.push_front(line);
        self.lines.truncate(EVENT_LOG_CAPACITY);
    }

    /// Lines in display order, newest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

fn render(event: &LiveEvent) -> Option<String> {
    match event {
        LiveEvent::Progress { status, file } => Some(format!("{status}: {file}")),
        LiveEvent::Complete { repo_id, total_gb } => {
            Some(format!("complete: {repo_id} {total_gb}GB"))
        }
        LiveEvent::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(n: usize) -> LiveEvent {
        LiveEvent::Progress {
            status: "starting".into(),
            file: format!("file-{n}.gguf"),
        }
    }

    #[test]
    fn test_render_formats() {
        let mut log = EventLog::default();
        log.record(&progress(1));
        log.record(&LiveEvent::Complete {
            repo_id: "org/repo".into(),
            total_gb: 4.2,
        });

        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines, ["complete: org/repo 4.2GB", "starting: file-1.gguf"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = EventLog::default();
        for n in 1..=9 {
            log.record(&progress(n));
        }

        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines[0], "starting: file-9.gguf");
        assert!(!lines.contains(&"starting: file-1.gguf"));
        assert_eq!(*lines.last().unwrap(), "starting: file-2.gguf");
    }

    #[test]
    fn test_unknown_events_are_dropped() {
        let mut log = EventLog::default();
        log.record(&LiveEvent::Unknown);
        assert!(log.is_empty());
    }
}
