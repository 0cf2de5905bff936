//! Event manager: episodes as (start, end) point pairs.

use std::collections::HashMap;

use crate::error::{Result, TimegraphError};
use crate::graph::Timegraph;
use crate::types::{Event, EventId, PointId};

/// Table of events, indexed by `EventId`.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
    names: HashMap<String, EventId>,
}

impl EventStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, start: PointId, end: PointId) -> Event {
        let event = Event {
            id: EventId::new(self.events.len() as u32),
            name: None,
            start,
            end,
        };
        self.events.push(event.clone());
        event
    }

    pub(crate) fn register_named(&mut self, name: &str, start: PointId, end: PointId) -> Result<Event> {
        if self.names.contains_key(name) {
            return Err(TimegraphError::DuplicateName(name.to_string()));
        }
        let mut event = self.register(start, end);
        event.name = Some(name.to_string());
        self.events[event.id.index()].name = event.name.clone();
        self.names.insert(name.to_string(), event.id);
        Ok(event)
    }

    /// Fetch an event.
    pub fn get(&self, id: EventId) -> Result<&Event> {
        self.events.get(id.index()).ok_or(TimegraphError::UnknownEvent(id))
    }

    /// Event bound to `name`, if any.
    pub fn named(&self, name: &str) -> Option<&Event> {
        self.names.get(name).and_then(|id| self.events.get(id.index()))
    }

    /// Whether `name` is bound to an event.
    pub fn is_named(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// All events in id order.
    pub fn all(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event exists.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Timegraph {
    /// Create an event over two fresh points with `start <= end`.
    ///
    /// The returned record carries the new start and end points.
    pub fn create_event(&mut self) -> Event {
        let (start, end) = self.fresh_span();
        self.events.register(start, end)
    }

    /// Create a named event over two fresh points.
    pub fn create_named_event(&mut self, name: &str) -> Result<Event> {
        if self.events.is_named(name) {
            return Err(TimegraphError::DuplicateName(name.to_string()));
        }
        let (start, end) = self.fresh_span();
        self.events.register_named(name, start, end)
    }

    fn fresh_span(&mut self) -> (PointId, PointId) {
        let start = self.create_point();
        let end = self.create_point();
        // Two unrelated points cannot close a cycle.
        self.commit(start, end);
        (start, end)
    }

    /// Create an event spanning existing points, asserting `start <= end`.
    ///
    /// Fails with `InvalidEvent` when `end` already precedes `start`. When
    /// `start == end` the event is an instant and no edge is added.
    pub fn create_event_from(&mut self, start: PointId, end: PointId) -> Result<Event> {
        self.points.lookup(start)?;
        self.points.lookup(end)?;
        if start != end {
            self.add_relation(start, end).map_err(|err| match err {
                TimegraphError::Cycle { .. } => TimegraphError::InvalidEvent { start, end },
                other => other,
            })?;
        }
        Ok(self.events.register(start, end))
    }

    /// Fetch an event.
    pub fn event(&self, id: EventId) -> Result<&Event> {
        self.events.get(id)
    }

    /// Event bound to `name`, if any.
    pub fn event_named(&self, name: &str) -> Option<&Event> {
        self.events.named(name)
    }

    /// All events in id order.
    pub fn events(&self) -> &[Event] {
        self.events.all()
    }
}
