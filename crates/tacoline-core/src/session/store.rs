//! Session store port and the in-memory implementation.
//!
//! The router never touches a global map; it is handed a `SessionStore`.
//! `with_cart` is the only mutation path and runs the closure while holding
//! the user's entry, so transitions for one user never interleave.

use std::sync::Arc;

use dashmap::DashMap;
use tacoline_types::cart::{Cart, UserId};

/// Storage for per-user carts.
pub trait SessionStore: Send + Sync {
    /// Create the user's cart if it does not exist yet.
    fn ensure(&self, user_id: &UserId);

    /// Snapshot of the user's cart, if one exists.
    fn get(&self, user_id: &UserId) -> Option<Cart>;

    /// Run `f` on the user's cart (created on demand) as one atomic step.
    ///
    /// `f` must not block; it runs while the entry is locked.
    fn with_cart<R>(&self, user_id: &UserId, f: impl FnOnce(&mut Cart) -> R) -> R;

    /// Empty the user's finalized lines, keeping the cart and any line in
    /// progress. Returns false if the user has no cart.
    fn clear(&self, user_id: &UserId) -> bool;

    /// Number of carts currently held.
    fn user_count(&self) -> usize;
}

/// Process-lifetime store backed by `DashMap`.
///
/// Cloning produces a shared view of the same carts (backed by `Arc`).
/// Reads return cloned carts -- never hold a `DashMap` guard across await.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    carts: Arc<DashMap<UserId, Cart>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn ensure(&self, user_id: &UserId) {
        self.carts
            .entry(user_id.clone())
            .or_insert_with(|| Cart::new(user_id.clone()));
    }

    fn get(&self, user_id: &UserId) -> Option<Cart> {
        self.carts.get(user_id).map(|r| r.value().clone())
    }

    fn with_cart<R>(&self, user_id: &UserId, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut entry = self
            .carts
            .entry(user_id.clone())
            .or_insert_with(|| Cart::new(user_id.clone()));
        f(entry.value_mut())
    }

    fn clear(&self, user_id: &UserId) -> bool {
        match self.carts.get_mut(user_id) {
            Some(mut cart) => {
                crate::cart::clear(cart.value_mut());
                true
            }
            None => false,
        }
    }

    fn user_count(&self) -> usize {
        self.carts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tacoline_types::order::{OrderLine, PendingLine};

    #[test]
    fn test_ensure_is_idempotent() {
        let store = InMemorySessionStore::new();
        let user = UserId::from("U1");
        store.ensure(&user);
        store.with_cart(&user, |cart| cart.lines.push(OrderLine::default()));
        store.ensure(&user);
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.get(&user).unwrap().lines.len(), 1);
    }

    #[test]
    fn test_get_missing_user_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get(&UserId::from("nobody")).is_none());
    }

    #[test]
    fn test_with_cart_creates_on_demand() {
        let store = InMemorySessionStore::new();
        let user = UserId::from("U2");
        let count = store.with_cart(&user, |cart| cart.lines.len());
        assert_eq!(count, 0);
        assert_eq!(store.get(&user).unwrap().user_id, user);
    }

    #[test]
    fn test_clear_preserves_cart_and_pending() {
        let store = InMemorySessionStore::new();
        let user = UserId::from("U3");
        store.with_cart(&user, |cart| {
            cart.lines.push(OrderLine::default());
            cart.pending = Some(PendingLine::new());
        });

        assert!(store.clear(&user));
        let cart = store.get(&user).unwrap();
        assert!(cart.lines.is_empty());
        assert!(cart.pending.is_some());

        assert!(!store.clear(&UserId::from("missing")));
    }

    #[test]
    fn test_clones_share_state() {
        let store = InMemorySessionStore::new();
        let other = store.clone();
        other.ensure(&UserId::from("U4"));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_with_cart_is_atomic_per_user() {
        let store = InMemorySessionStore::new();
        let user = UserId::from("U5");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let user = user.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.with_cart(&user, |cart| {
                            let n = cart.lines.len();
                            cart.lines.push(OrderLine {
                                quantity: Some(n as u32 + 1),
                                ..Default::default()
                            });
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let cart = store.get(&user).unwrap();
        assert_eq!(cart.lines.len(), 800);
        // Each push saw the length left by the previous one.
        for (i, line) in cart.lines.iter().enumerate() {
            assert_eq!(line.quantity, Some(i as u32 + 1));
        }
    }
}
