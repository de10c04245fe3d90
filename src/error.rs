// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised by map operations.

use thiserror::Error;

/// Everything that can go wrong with a map call.
///
/// Every error is raised before the map is changed, so a map that
/// returned an error is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A new key was put into a full map and the overflow policy
    /// declined to make room.
    #[error("map is full: capacity of {capacity} entries reached")]
    Overflow {
        /// The capacity the map was configured with
        capacity: usize,
    },

    /// An entry was demanded from an empty map.
    #[error("map is empty")]
    Underflow,

    /// A construction parameter is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the configuration
        message: String,
    },
}

impl MapError {
    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            "map is full: capacity of 3 entries reached",
            MapError::Overflow { capacity: 3 }.to_string()
        );
        assert_eq!("map is empty", MapError::Underflow.to_string());
        assert_eq!(
            "invalid configuration: nope",
            MapError::invalid_config("nope").to_string()
        );
    }
}
