//! Read access to the user's stored location.
//!
//! The dispatcher asks for the profile when its timer fires, never earlier, so
//! updates made while the user is still typing are picked up.

use std::sync::{Arc, PoisonError, RwLock};

use shopsearch_core::UserLocationProfile;
use tokio::sync::watch;

pub trait LocationSource: Send + Sync + 'static {
    fn current(&self) -> UserLocationProfile;
}

/// A fixed profile.
impl LocationSource for UserLocationProfile {
    fn current(&self) -> UserLocationProfile {
        self.clone()
    }
}

impl LocationSource for watch::Receiver<UserLocationProfile> {
    fn current(&self) -> UserLocationProfile {
        self.borrow().clone()
    }
}

impl LocationSource for Arc<RwLock<UserLocationProfile>> {
    fn current(&self) -> UserLocationProfile {
        self.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_receiver_sees_latest_profile() {
        let (tx, rx) = watch::channel(UserLocationProfile::default());
        assert_eq!(rx.current(), UserLocationProfile::default());

        tx.send(UserLocationProfile::at("Lagos", 3.4, 6.5)).unwrap();
        assert_eq!(rx.current().city.as_deref(), Some("Lagos"));
    }

    #[test]
    fn shared_lock_sees_latest_profile() {
        let shared = Arc::new(RwLock::new(UserLocationProfile::default()));
        let source = Arc::clone(&shared);

        shared.write().unwrap().postcode = Some("100001".to_owned());
        assert_eq!(source.current().postcode.as_deref(), Some("100001"));
    }
}
