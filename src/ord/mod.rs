// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ordered maps.
//!
//! All three implement [`NavigableMap`][crate::NavigableMap] and order
//! their keys by a [`Comparator`][crate::Comparator], which defaults to
//! the keys' own [`Ord`].

pub mod avl;
pub mod skiplist;
pub mod splay;
