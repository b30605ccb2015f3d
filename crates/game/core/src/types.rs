//! Identifiers and small value types shared across the core.

use std::fmt;

/// Unique identifier of a player within a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Identifier of a game object, unique within its owning player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Non-owning handle to a game object: the owning player plus the per-player id.
///
/// Tiles and events refer to objects through this handle; the object itself is
/// owned by its player (resolution goes through [`crate::Game::object`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRef {
    pub owner: PlayerId,
    pub id: ObjectId,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.owner, self.id)
    }
}

/// Player display color (two per player: primary and accent).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Self = Self { r: 0xcc, g: 0x24, b: 0x1d };
    pub const GREEN: Self = Self { r: 0x98, g: 0x97, b: 0x1a };
    pub const BLUE: Self = Self { r: 0x45, g: 0x85, b: 0x88 };
    pub const YELLOW: Self = Self { r: 0xd7, g: 0x99, b: 0x21 };
    pub const GRAY: Self = Self { r: 0x92, g: 0x83, b: 0x74 };
}

/// Tri-state answer to a query about possibly-hidden state.
///
/// `Absent` is a positive fact ("there is nothing there"); `Unknown` is a
/// refusal to answer because the asking player cannot observe the location.
/// The distinction is load-bearing: collapsing the two would leak information
/// through the error channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Maybe<T> {
    Present(T),
    Absent,
    Unknown,
}

impl<T> Maybe<T> {
    /// Maps a plain optional onto Present/Absent (the caller has already
    /// established that the fact is observable).
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Maybe::Present(value),
            None => Maybe::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Maybe::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Maybe::Absent)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Maybe::Unknown)
    }

    /// The present value, if any. Absent and Unknown both map to `None`.
    pub fn present(self) -> Option<T> {
        match self {
            Maybe::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Maybe<U> {
        match self {
            Maybe::Present(value) => Maybe::Present(f(value)),
            Maybe::Absent => Maybe::Absent,
            Maybe::Unknown => Maybe::Unknown,
        }
    }
}

/// One observed state transition, used only as a notification payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Change<T> {
    pub from: T,
    pub to: T,
}

impl<T> Change<T> {
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }
}
