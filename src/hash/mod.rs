// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hash-based maps.
//!
//! Both maps cache each key's 64-bit hash next to the entry and reduce it
//! modulo a prime table length to pick a slot. They take any
//! [`BuildHasher`][std::hash::BuildHasher], defaulting to
//! [`RandomState`][std::collections::hash_map::RandomState].

pub mod chained;
pub mod open;
