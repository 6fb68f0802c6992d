//! Branded/newtype ID types for type safety.
//!
//! String-keyed ids wrap a `&'static str` rather than an owned string:
//! every catalog (monsters, tiles, blueprints, …) is a `static` table
//! built from string-literal keys, so the id type needs to be `Copy` and
//! constructible in a `const`/`static` initializer, not heap-backed.
//! Arena-resident entities (creatures, items on the level) use an
//! integer-keyed generational id instead, since they are created and
//! destroyed during play and must not alias a reused slot.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(&'static str);

        impl $name {
            pub const fn new(s: &'static str) -> Self {
                Self(s)
            }

            pub const fn as_str(&self) -> &'static str {
                self.0
            }
        }

        impl From<&'static str> for $name {
            fn from(s: &'static str) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0
            }
        }
    };
}

define_id!(
    /// Monster catalog key (e.g. "rat", "goblin_conjurer").
    MonsterTypeId
);

define_id!(
    /// Monster class catalog key (e.g. "dragon", "goblinoid").
    MonsterClassId
);

define_id!(
    /// Tile catalog key.
    TileTypeId
);

define_id!(
    /// Dungeon feature catalog key.
    DungeonFeatureId
);

define_id!(
    /// Blueprint (machine) catalog key.
    BlueprintId
);

define_id!(
    /// Horde recipe catalog key.
    HordeId
);

define_id!(
    /// Mutation catalog key.
    MutationId
);

/// A generational arena index, used for entities that are created and
/// destroyed during a session (creatures, floor items). A stale id whose
/// generation no longer matches the slot is treated as "not found" rather
/// than aliasing whatever now occupies that slot.
///
/// Resolving a weak reference (`Creature::leader`, an item's vorpal-enemy
/// link) is always a presence/absence lookup through an `ArenaId`, never a
/// raw handle — see the Design Notes on cycles in ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArenaId {
    index: u32,
    generation: u32,
}

impl ArenaId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(self) -> usize {
        self.index as usize
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for ArenaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}g{}", self.index, self.generation)
    }
}

/// A simple generational arena: stable ids survive removal-then-reuse of a
/// slot without dangling, since a lookup checks the slot's current
/// generation against the id's recorded generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena<T> {
    slots: Vec<Option<(u32, T)>>,
    free: Vec<u32>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> ArenaId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let generation = slot.as_ref().map(|(g, _)| g + 1).unwrap_or(1);
            *slot = Some((generation, value));
            ArenaId::new(index, generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some((1, value)));
            ArenaId::new(index, 1)
        }
    }

    pub fn remove(&mut self, id: ArenaId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        match slot {
            Some((generation, _)) if *generation == id.generation() => {
                let (_, value) = slot.take().unwrap();
                self.free.push(id.index);
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get(&self, id: ArenaId) -> Option<&T> {
        match self.slots.get(id.index())? {
            Some((generation, value)) if *generation == id.generation() => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: ArenaId) -> Option<&mut T> {
        match self.slots.get_mut(id.index())? {
            Some((generation, value)) if *generation == id.generation() => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, id: ArenaId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArenaId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|(generation, value)| (ArenaId::new(index as u32, *generation), value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ArenaId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            slot.as_mut()
                .map(|(generation, value)| (ArenaId::new(index as u32, *generation), value))
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
