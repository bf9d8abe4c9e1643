// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for exchange items stored in the arena.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid while other items
//! are removed (generational indices).

use slotmap::new_key_type;

new_key_type! {
    /// Key for an output: a source output or an adapted output.
    pub struct OutputKey;

    /// Key for an input that consumes values from an output.
    pub struct InputKey;
}

/// A key that can reference either kind of exchange item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Output(OutputKey),
    Input(InputKey),
}

impl ItemKey {
    pub fn kind(&self) -> &'static str {
        match self {
            ItemKey::Output(_) => "output",
            ItemKey::Input(_) => "input",
        }
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKey::Output(k) => write!(f, "output {:?}", k),
            ItemKey::Input(k) => write!(f, "input {:?}", k),
        }
    }
}

impl From<OutputKey> for ItemKey {
    fn from(k: OutputKey) -> Self {
        ItemKey::Output(k)
    }
}

impl From<InputKey> for ItemKey {
    fn from(k: InputKey) -> Self {
        ItemKey::Input(k)
    }
}
