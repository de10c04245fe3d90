// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Every codebase needs a `util` module.

use std::hash::{BuildHasher, Hash};

use crate::config::{MAX_TABLE_LEN, MIN_TABLE_LEN};

pub(crate) fn hash_key<BK: Hash + ?Sized, S: BuildHasher>(bh: &S, key: &BK) -> u64 {
    bh.hash_one(key)
}

/// Reduce a cached hash to an index into a table of `len` slots.
#[inline]
pub(crate) fn bucket_index(hash: u64, len: usize) -> usize {
    (hash % len as u64) as usize
}

pub(crate) fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// The smallest prime `>= n`, clamped to the table length limits.
pub(crate) fn next_prime(n: usize) -> usize {
    if n >= MAX_TABLE_LEN {
        return MAX_TABLE_LEN;
    }
    let mut candidate = n.max(MIN_TABLE_LEN) | 1;
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate.min(MAX_TABLE_LEN)
}

/// The table length to grow to from `len`.
pub(crate) fn grown_table_len(len: usize) -> usize {
    next_prime(len.saturating_mul(2))
}
