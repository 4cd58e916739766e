//! Notifications about instant game events for presentation layers.

use std::sync::mpsc::{self, Sender};

use derive_more::Deref;

use crate::EffectKind;

/// Discrete game event, for sound effects and message logs.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Event {
    /// A turn passed because the player moved.
    Footstep { turn: u64 },

    /// An attack landed. Target is the actor kind.
    Hit {
        target: String,
        damage: i32,
        critical: bool,
    },

    /// An attack against target missed.
    Miss { target: String },

    /// Stone skin turned aside an attack against target.
    Blocked { target: String },

    /// Target died.
    Kill { target: String },

    /// The player gained a level.
    LevelUp { level: u32 },

    /// The player took damage from hunger.
    Starving,

    /// A status effect ran out on an actor.
    EffectExpired { target: String, kind: EffectKind },

    /// The player went down the stairs.
    Descended { depth: u32 },
}

/// Listening end of an event subscription.
#[derive(Deref)]
pub struct Receiver(mpsc::Receiver<Event>);

/// Set of event subscribers.
#[derive(Default)]
pub(crate) struct Listeners(Vec<Sender<Event>>);

impl Listeners {
    pub fn subscribe(&mut self) -> Receiver {
        let (send, recv) = mpsc::channel();
        self.0.push(send);
        Receiver(recv)
    }

    /// Send event to every subscriber, forgetting the ones that have hung
    /// up.
    pub fn send(&mut self, event: Event) {
        self.0.retain(|s| s.send(event.clone()).is_ok());
    }
}
