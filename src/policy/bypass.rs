use std::{any::TypeId, cell::RefCell, collections::HashSet, marker::PhantomData};

use tracing::trace;

use super::Entity;

thread_local! {
    static BYPASSED: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

/// Run `f` with permission checks disabled for entity type `E`.
///
/// Every check on an `E` made from inside `f` is allowed. The previous state
/// is restored when `f` returns or unwinds, so scopes nest. Bypass state is
/// local to the calling thread and `f` is synchronous, so a bypass can never
/// be observed by another request.
///
/// # Example
/// ```rust,ignore
/// use rowguard::policy::bypass_perms;
///
/// bypass_perms::<UserRole, _>(|| seed_roles(&repo));
/// ```
pub fn bypass_perms<E, R>(f: impl FnOnce() -> R) -> R
where
    E: Entity,
{
    let _guard = BypassGuard::acquire(TypeId::of::<E>(), std::any::type_name::<E>());
    f()
}

/// Whether checks on `E` are currently bypassed on this thread.
pub fn bypass_active<E: Entity>() -> bool {
    is_bypassed(TypeId::of::<E>())
}

pub(crate) fn is_bypassed(entity_type: TypeId) -> bool {
    BYPASSED
        .try_with(|bypassed| bypassed.borrow().contains(&entity_type))
        .unwrap_or(false)
}

/// Returns the previous state.
fn set_bypassed(entity_type: TypeId, value: bool) -> bool {
    BYPASSED
        .try_with(|bypassed| {
            let mut bypassed = bypassed.borrow_mut();
            if value {
                !bypassed.insert(entity_type)
            } else {
                bypassed.remove(&entity_type)
            }
        })
        .unwrap_or(false)
}

/// Restores the bypass flag it replaced when dropped.
///
/// Not `Send`: the guard must be released on the thread that took it.
struct BypassGuard {
    entity_type: TypeId,
    entity_name: &'static str,
    previous: bool,
    _not_send: PhantomData<*const ()>,
}

impl BypassGuard {
    fn acquire(entity_type: TypeId, entity_name: &'static str) -> Self {
        let previous = set_bypassed(entity_type, true);
        trace!(entity = entity_name, previous, "Permission bypass entered");

        Self {
            entity_type,
            entity_name,
            previous,
            _not_send: PhantomData,
        }
    }
}

impl Drop for BypassGuard {
    fn drop(&mut self) {
        set_bypassed(self.entity_type, self.previous);
        trace!(
            entity = self.entity_name,
            restored = self.previous,
            "Permission bypass exited"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use uuid::Uuid;

    use super::*;

    struct Widget;
    impl Entity for Widget {
        fn id(&self) -> Option<Uuid> {
            None
        }
    }

    struct Gadget;
    impl Entity for Gadget {
        fn id(&self) -> Option<Uuid> {
            None
        }
    }

    #[test]
    fn test_bypass_is_scoped() {
        assert!(!bypass_active::<Widget>());

        bypass_perms::<Widget, _>(|| {
            assert!(bypass_active::<Widget>());
            assert!(!bypass_active::<Gadget>());
        });

        assert!(!bypass_active::<Widget>());
    }

    #[test]
    fn test_nested_bypass_restores_prior_state() {
        bypass_perms::<Widget, _>(|| {
            bypass_perms::<Widget, _>(|| assert!(bypass_active::<Widget>()));
            // Leaving the inner scope must not switch the outer one off.
            assert!(bypass_active::<Widget>());
        });

        assert!(!bypass_active::<Widget>());
    }

    #[test]
    fn test_bypass_restored_on_panic() {
        let result = catch_unwind(AssertUnwindSafe(|| {
            bypass_perms::<Widget, _>(|| panic!("boom"));
        }));

        assert!(result.is_err());
        assert!(!bypass_active::<Widget>());
    }

    #[test]
    fn test_bypass_does_not_leak_to_other_threads() {
        bypass_perms::<Widget, _>(|| {
            let seen = std::thread::spawn(bypass_active::<Widget>)
                .join()
                .expect("thread should not panic");
            assert!(!seen);
        });
    }

    #[test]
    fn test_bypass_returns_closure_value() {
        assert_eq!(bypass_perms::<Gadget, _>(|| 42), 42);
    }
}
