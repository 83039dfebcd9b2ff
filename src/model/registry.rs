use crate::model::Event;
use std::collections::HashMap;

/// All events discovered in one run, keyed by id and kept in discovery order
///
/// The registry is the single owner of every `Event` and `EventResult` for
/// the duration of a run. Iteration follows the order in which events were
/// first registered, so two runs over the same pages write the same manifest.
#[derive(Debug, Default)]
pub struct EventRegistry {
    events: Vec<Event>,
    positions: HashMap<String, usize>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an event, or folds it into the entry that already holds its id
    ///
    /// On a repeated id the descriptive fields of `event` overwrite the
    /// existing entry in place; its position and collected results are kept.
    ///
    /// # Returns
    ///
    /// * `true` - A new entry was added
    /// * `false` - An existing entry was updated
    pub fn upsert(&mut self, event: Event) -> bool {
        if let Some(&index) = self.positions.get(&event.id) {
            let existing = &mut self.events[index];
            existing.link = event.link;
            existing.format = event.format;
            existing.is_online = event.is_online;
            existing.title = event.title;
            existing.location = event.location;
            existing.level = event.level;
            existing.date = event.date;
            return false;
        }

        self.positions.insert(event.id.clone(), self.events.len());
        self.events.push(event);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.positions.get(id).map(|&index| &self.events[index])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Event> {
        match self.positions.get(id) {
            Some(&index) => Some(&mut self.events[index]),
            None => None,
        }
    }

    /// Event ids in discovery order
    pub fn ids(&self) -> Vec<String> {
        self.events.iter().map(|event| event.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
