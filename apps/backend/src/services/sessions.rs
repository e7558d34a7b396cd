//! In-memory registry of active study sessions.
//!
//! One engine per session, keyed by UUID. The registry lives behind a
//! single async mutex, which also serializes distractor generation for
//! a session so a slow upstream call cannot be raced by a second
//! request for the same operation. Sessions are evicted as soon as
//! their engine reports completion; already-complete sessions are never
//! stored.

use std::collections::HashMap;

use flashdeck_core::{LearnSession, MatchGame, TestSession, WriteSession};
use uuid::Uuid;

/// Learn-mode engine plus what the route layer needs to present it:
/// the set's term pool for distractor fallback and the options built
/// for the current card.
pub struct LearnView {
    pub session: LearnSession,
    pub terms: Vec<String>,
    pub options: Vec<String>,
}

pub enum Session {
    Write(WriteSession),
    Learn(LearnView),
    Test(TestSession),
    Match(MatchGame),
}

#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: Session) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, session);
        id
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<Session> {
        self.sessions.remove(id)
    }
}
