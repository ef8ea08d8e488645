//! Id-keyed entity collections.
//!
//! A `Collection` keeps records in insertion order (the tie-break order for
//! every listing) with a `BTreeMap` index for id lookups. Nothing is ever
//! removed, so positions stay valid for the life of the collection.
//!
//! Callers never keep a live reference across a write: `update` hands back
//! a copy of the value as it was written, and later reads go through the
//! collection again.

use std::collections::BTreeMap;
use std::fmt;

use crate::answer::Answer;
use crate::error::ForumError;
use crate::ids::{AnswerId, EntityKind, QuestionId, TagId, UserId};
use crate::question::Question;
use crate::tag::Tag;
use crate::user::User;

/// A record that can live in a [`Collection`].
pub trait Entity: Clone + fmt::Debug {
    type Id: Clone + Ord + fmt::Debug + fmt::Display;

    const KIND: EntityKind;

    fn id(&self) -> &Self::Id;
}

impl Entity for User {
    type Id = UserId;
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &UserId {
        &self.id
    }
}

impl Entity for Question {
    type Id = QuestionId;
    const KIND: EntityKind = EntityKind::Question;

    fn id(&self) -> &QuestionId {
        &self.id
    }
}

impl Entity for Answer {
    type Id = AnswerId;
    const KIND: EntityKind = EntityKind::Answer;

    fn id(&self) -> &AnswerId {
        &self.id
    }
}

impl Entity for Tag {
    type Id = TagId;
    const KIND: EntityKind = EntityKind::Tag;

    fn id(&self) -> &TagId {
        &self.id
    }
}

/// Insertion-ordered store for one entity kind.
#[derive(Debug, Clone)]
pub struct Collection<E: Entity> {
    records: Vec<E>,
    index: BTreeMap<E::Id, usize>,
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from persisted records.
    ///
    /// Duplicate IDs resolve last-write-wins, keeping the position of the
    /// first occurrence.
    pub fn from_records(records: impl IntoIterator<Item = E>) -> Self {
        let mut collection = Self::new();
        for record in records {
            match collection.index.get(record.id()) {
                Some(&pos) => collection.records[pos] = record,
                None => {
                    collection
                        .index
                        .insert(record.id().clone(), collection.records.len());
                    collection.records.push(record);
                }
            }
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Like [`Collection::get`], reporting `NotFound` for a missing id.
    pub fn require(&self, id: &E::Id) -> Result<&E, ForumError> {
        self.get(id).ok_or_else(|| ForumError::not_found(E::KIND, id))
    }

    /// Append a new record. An id that is already present is rejected.
    pub fn insert(&mut self, entity: E) -> Result<&E, ForumError> {
        if self.index.contains_key(entity.id()) {
            return Err(ForumError::invalid(
                "id",
                format!("{} id already exists: {}", E::KIND, entity.id()),
            ));
        }
        let pos = self.records.len();
        self.index.insert(entity.id().clone(), pos);
        self.records.push(entity);
        Ok(&self.records[pos])
    }

    /// Apply `f` to the stored record and return the written value.
    pub fn update<F>(&mut self, id: &E::Id, f: F) -> Result<E, ForumError>
    where
        F: FnOnce(&mut E),
    {
        let record = self
            .get_mut(id)
            .ok_or_else(|| ForumError::not_found(E::KIND, id))?;
        f(record);
        Ok(record.clone())
    }

    /// Iterate all records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.records.iter()
    }

    /// First record matching `predicate`, in insertion order.
    pub fn find<P>(&self, predicate: P) -> Option<&E>
    where
        P: Fn(&E) -> bool,
    {
        self.records.iter().find(|record| predicate(record))
    }

    /// All records matching `predicate`, in insertion order.
    pub fn filter<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a E> + 'a
    where
        P: Fn(&E) -> bool + 'a,
    {
        self.records.iter().filter(move |record| predicate(record))
    }

    pub(crate) fn get_mut(&mut self, id: &E::Id) -> Option<&mut E> {
        match self.index.get(id) {
            Some(&pos) => self.records.get_mut(pos),
            None => None,
        }
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.records.iter_mut()
    }
}
