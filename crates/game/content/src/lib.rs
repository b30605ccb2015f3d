//! Static game content: the stock unit roster.
//!
//! This crate houses unit designs as pure data constructors consumed when
//! assembling a [`strata_core::GameSetup`]. It carries no I/O and never
//! appears in game state; the core only sees the resulting [`UnitDesign`]s.

pub mod designs;

pub use designs::{airship, catalog, container_post, engineer, scout};
