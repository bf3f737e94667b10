//! Swappable collaborator handle held by provider-backed stages.

use std::sync::Arc;

use parking_lot::RwLock;

/// An optional provider that can be replaced while the stage is shared.
///
/// Stages live in the chain as `Arc<dyn PairFilter>`, so a provider set after
/// loading must go through `&self`. Each `filter` call reads the slot once
/// and uses that provider for the whole call.
pub(crate) struct ProviderSlot<P: ?Sized>(RwLock<Option<Arc<P>>>);

impl<P: ?Sized> ProviderSlot<P> {
    pub(crate) fn get(&self) -> Option<Arc<P>> {
        self.0.read().clone()
    }

    pub(crate) fn set(&self, provider: Arc<P>) {
        *self.0.write() = Some(provider);
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.read().is_some()
    }
}

impl<P: ?Sized> Default for ProviderSlot<P> {
    fn default() -> Self {
        Self(RwLock::new(None))
    }
}

impl<P: ?Sized> Clone for ProviderSlot<P> {
    fn clone(&self) -> Self {
        Self(RwLock::new(self.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_and_clone_copies() {
        let slot: ProviderSlot<str> = ProviderSlot::default();
        assert!(!slot.is_set());

        slot.set(Arc::from("first"));
        let copy = slot.clone();
        slot.set(Arc::from("second"));

        assert_eq!(slot.get().as_deref(), Some("second"));
        assert_eq!(copy.get().as_deref(), Some("first"));
    }
}
