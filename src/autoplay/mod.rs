//! Continuation through the list a track was started from.
//!
//! The queue is a snapshot of the search results or playlist songs at the
//! moment the user picked a track. Edits to the playing playlist are pushed in
//! with [`Autoplay::sync_entries`].

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueKind {
    SearchResults,
    Playlist(String),
}

impl QueueKind {
    pub fn end_message(&self) -> &'static str {
        match self {
            QueueKind::SearchResults => "End of results.",
            QueueKind::Playlist(_) => "End of playlist.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub title: String,
    pub reference: String,
}

#[derive(Debug, Clone)]
struct Context {
    kind: QueueKind,
    index: usize,
    /// Position the next advance plays. Usually `index + 1`, but equal to
    /// `index` once the playing entry has been removed from the list.
    next: usize,
    entries: Vec<QueueEntry>,
}

/// What the tick should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Resolve and load `entry`; report back with the same `token`.
    Advance {
        token: u64,
        index: usize,
        kind: QueueKind,
        entry: QueueEntry,
    },
    /// Ran off the end; the context is gone.
    EndOfQueue(QueueKind),
}

#[derive(Debug, Clone)]
pub struct Autoplay {
    enabled: bool,
    context: Option<Context>,
    in_flight: bool,
    token: u64,
}

impl Autoplay {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            context: None,
            in_flight: false,
            token: 0,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn current_index(&self) -> Option<usize> {
        self.context.as_ref().map(|c| c.index)
    }

    pub fn kind(&self) -> Option<&QueueKind> {
        self.context.as_ref().map(|c| &c.kind)
    }

    /// The user started `index` of `entries`; any advance still in flight is
    /// superseded.
    pub fn start(&mut self, kind: QueueKind, index: usize, entries: Vec<QueueEntry>) {
        self.token += 1;
        self.in_flight = false;
        self.context = Some(Context {
            kind,
            index,
            next: index + 1,
            entries,
        });
    }

    pub fn clear(&mut self) {
        self.token += 1;
        self.in_flight = false;
        self.context = None;
    }

    /// Replace the snapshot if `kind` is what is playing. The playing entry is
    /// followed to its new position; if it was removed, the entry that took
    /// its place plays next.
    pub fn sync_entries(&mut self, kind: &QueueKind, entries: Vec<QueueEntry>) {
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        if &ctx.kind != kind {
            return;
        }
        let playing = ctx.entries.get(ctx.index).map(|e| e.reference.clone());
        let found = playing.and_then(|reference| {
            entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.reference == reference)
                .map(|(i, _)| i)
                .min_by_key(|i| i.abs_diff(ctx.index))
        });
        match found {
            Some(pos) => {
                ctx.index = pos;
                ctx.next = pos + 1;
            }
            None => {
                let removed_before = ctx.entries[..ctx.index.min(ctx.entries.len())]
                    .iter()
                    .filter(|old| !entries.iter().any(|e| e.reference == old.reference))
                    .count();
                ctx.next = (ctx.index - removed_before.min(ctx.index)).min(entries.len());
                ctx.index = ctx.next.min(entries.len().saturating_sub(1));
            }
        }
        ctx.entries = entries;
    }

    pub fn rename_playlist(&mut self, from: &str, to: &str) {
        if let Some(ctx) = self.context.as_mut()
            && ctx.kind == QueueKind::Playlist(from.to_string())
        {
            ctx.kind = QueueKind::Playlist(to.to_string());
        }
    }

    /// Called once per tick. `idle` must already exclude the window between a
    /// stop and the following load completing.
    pub fn poll(&mut self, idle: bool) -> Option<Step> {
        if !self.enabled || self.in_flight || !idle {
            return None;
        }
        let ctx = self.context.as_ref()?;
        let next = ctx.next;
        if let Some(entry) = ctx.entries.get(next) {
            self.token += 1;
            self.in_flight = true;
            return Some(Step::Advance {
                token: self.token,
                index: next,
                kind: ctx.kind.clone(),
                entry: entry.clone(),
            });
        }
        let ctx = self.context.take()?;
        tracing::info!(kind = ?ctx.kind, "autoplay reached end of queue");
        Some(Step::EndOfQueue(ctx.kind))
    }

    /// The advance for `token` loaded. Stale tokens are ignored.
    pub fn advanced(&mut self, token: u64, index: usize) -> bool {
        if !self.in_flight || token != self.token {
            return false;
        }
        self.in_flight = false;
        if let Some(ctx) = self.context.as_mut() {
            ctx.index = index;
            ctx.next = index + 1;
        }
        true
    }

    /// The advance for `token` failed: drop the context so the next idle
    /// tick does not retry forever.
    pub fn failed(&mut self, token: u64) -> bool {
        if !self.in_flight || token != self.token {
            return false;
        }
        self.in_flight = false;
        self.context = None;
        true
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.in_flight && token == self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<QueueEntry> {
        (0..n)
            .map(|i| QueueEntry {
                title: format!("t{i}"),
                reference: format!("u{i}"),
            })
            .collect()
    }

    #[test]
    fn advances_only_when_idle_and_enabled() {
        let mut a = Autoplay::new(true);
        assert_eq!(a.poll(true), None);

        a.start(QueueKind::SearchResults, 0, entries(3));
        assert_eq!(a.poll(false), None);

        let Some(Step::Advance { token, index, entry, .. }) = a.poll(true) else {
            panic!("expected advance");
        };
        assert_eq!(index, 1);
        assert_eq!(entry.reference, "u1");
        // in flight: no second advance
        assert_eq!(a.poll(true), None);
        assert!(a.advanced(token, index));
        assert_eq!(a.current_index(), Some(1));

        a.toggle();
        assert_eq!(a.poll(true), None);
    }

    #[test]
    fn last_index_ends_the_queue() {
        let mut a = Autoplay::new(true);
        a.start(QueueKind::SearchResults, 2, entries(3));
        assert_eq!(a.poll(true), Some(Step::EndOfQueue(QueueKind::SearchResults)));
        assert_eq!(a.current_index(), None);
        assert_eq!(a.poll(true), None);
    }

    #[test]
    fn failure_clears_context() {
        let mut a = Autoplay::new(true);
        a.start(QueueKind::Playlist("p".into()), 0, entries(3));
        let Some(Step::Advance { token, .. }) = a.poll(true) else {
            panic!("expected advance");
        };
        assert!(a.failed(token));
        assert_eq!(a.current_index(), None);
        assert_eq!(a.poll(true), None);
    }

    #[test]
    fn user_start_supersedes_in_flight_advance() {
        let mut a = Autoplay::new(true);
        a.start(QueueKind::SearchResults, 0, entries(3));
        let Some(Step::Advance { token, .. }) = a.poll(true) else {
            panic!("expected advance");
        };
        a.start(QueueKind::Playlist("p".into()), 4, entries(6));
        assert!(!a.advanced(token, 1));
        assert!(!a.failed(token));
        assert_eq!(a.current_index(), Some(4));
    }

    #[test]
    fn sync_entries_only_touches_matching_kind() {
        let mut a = Autoplay::new(true);
        a.start(QueueKind::Playlist("p".into()), 2, entries(3));
        a.sync_entries(&QueueKind::Playlist("other".into()), entries(10));
        assert_eq!(a.poll(true), Some(Step::EndOfQueue(QueueKind::Playlist("p".into()))));

        a.start(QueueKind::Playlist("p".into()), 2, entries(3));
        a.sync_entries(&QueueKind::Playlist("p".into()), entries(5));
        assert!(matches!(a.poll(true), Some(Step::Advance { index: 3, .. })));
    }

    fn without(n: usize, gone: &[usize]) -> Vec<QueueEntry> {
        entries(n)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !gone.contains(i))
            .map(|(_, e)| e)
            .collect()
    }

    fn next_reference(a: &mut Autoplay) -> String {
        match a.poll(true) {
            Some(Step::Advance { entry, .. }) => entry.reference,
            other => panic!("expected advance, got {other:?}"),
        }
    }

    #[test]
    fn removing_an_earlier_song_keeps_the_next_one() {
        let kind = QueueKind::Playlist("p".into());
        let mut a = Autoplay::new(true);
        a.start(kind.clone(), 2, entries(5));
        a.sync_entries(&kind, without(5, &[0]));
        assert_eq!(a.current_index(), Some(1));
        assert_eq!(next_reference(&mut a), "u3");
    }

    #[test]
    fn removing_the_playing_song_plays_its_successor() {
        let kind = QueueKind::Playlist("p".into());
        let mut a = Autoplay::new(true);
        a.start(kind.clone(), 2, entries(5));
        a.sync_entries(&kind, without(5, &[2]));
        assert_eq!(next_reference(&mut a), "u3");

        a.start(kind.clone(), 2, entries(5));
        a.sync_entries(&kind, without(5, &[0, 2]));
        assert_eq!(next_reference(&mut a), "u3");

        a.start(kind.clone(), 4, entries(5));
        a.sync_entries(&kind, without(5, &[4]));
        assert_eq!(a.poll(true), Some(Step::EndOfQueue(kind)));
    }

    #[test]
    fn moving_the_playing_song_follows_it() {
        let kind = QueueKind::Playlist("p".into());
        let mut a = Autoplay::new(true);
        a.start(kind.clone(), 1, entries(4));
        let mut moved = entries(4);
        let playing = moved.remove(1);
        moved.push(playing);
        a.sync_entries(&kind, moved);
        assert_eq!(a.current_index(), Some(3));
        assert_eq!(a.poll(true), Some(Step::EndOfQueue(kind)));
    }

    #[test]
    fn end_messages() {
        assert_eq!(QueueKind::SearchResults.end_message(), "End of results.");
        assert_eq!(QueueKind::Playlist("x".into()).end_message(), "End of playlist.");
    }
}
