use std::fmt;
use std::time::Duration;

use crate::name::Name;

/// Lifetime used when the caller does not pick one.
pub const DEFAULT_INTEREST_LIFETIME: Duration = Duration::from_secs(4);

/// A request for the Data packet carrying `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    pub name:          Name,
    pub can_be_prefix: bool,
    pub must_be_fresh: bool,
    pub lifetime:      Duration,
    pub nonce:         u32,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            can_be_prefix: false,
            must_be_fresh: false,
            lifetime:      DEFAULT_INTEREST_LIFETIME,
            nonce:         rand::random(),
        }
    }

    #[must_use]
    pub fn can_be_prefix(mut self, can_be_prefix: bool) -> Self {
        self.can_be_prefix = can_be_prefix;
        self
    }

    #[must_use]
    pub fn must_be_fresh(mut self, must_be_fresh: bool) -> Self {
        self.must_be_fresh = must_be_fresh;
        self
    }

    #[must_use]
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Pick a new random nonce so a retransmission is not taken for a loop.
    pub fn refresh_nonce(&mut self) {
        let old = self.nonce;
        while self.nonce == old {
            self.nonce = rand::random();
        }
    }
}

/// Reason carried by a network Nack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NackReason {
    None,
    Congestion,
    Duplicate,
    NoRoute,
}

impl fmt::Display for NackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NackReason::None => "None",
            NackReason::Congestion => "Congestion",
            NackReason::Duplicate => "Duplicate",
            NackReason::NoRoute => "NoRoute",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_selectors() {
        let name: Name = "/a/seg=0".parse().unwrap();
        let interest = Interest::new(name.clone())
            .must_be_fresh(true)
            .lifetime(Duration::from_millis(250));

        assert_eq!(interest.name, name);
        assert!(interest.must_be_fresh);
        assert!(!interest.can_be_prefix);
        assert_eq!(interest.lifetime, Duration::from_millis(250));
    }

    #[test]
    fn refreshed_nonce_differs() {
        let mut interest = Interest::new(Name::new());
        let before = interest.nonce;
        interest.refresh_nonce();
        assert_ne!(interest.nonce, before);
    }
}
