//! Header click events and the multi-sort decision

use std::sync::Arc;

use rowsort_core::ModifierKey;

/// Modifier keys held during a header click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    /// Only `key` held
    pub fn only(key: ModifierKey) -> Self {
        let mut modifiers = Self::none();
        match key {
            ModifierKey::Shift => modifiers.shift = true,
            ModifierKey::Control => modifiers.control = true,
            ModifierKey::Alt => modifiers.alt = true,
            ModifierKey::Meta => modifiers.meta = true,
        }
        modifiers
    }

    pub fn is_held(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Control => self.control,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }
}

/// A user activating a column header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderEvent {
    pub modifiers: Modifiers,
}

impl HeaderEvent {
    /// Plain click, no modifiers
    pub fn click() -> Self {
        Self::default()
    }

    pub fn shift_click() -> Self {
        Self::with_modifiers(Modifiers::shift())
    }

    pub fn with_modifiers(modifiers: Modifiers) -> Self {
        Self { modifiers }
    }
}

/// Decides whether a header event extends the sort instead of replacing it
pub type MultiSortPredicate = Arc<dyn Fn(&HeaderEvent) -> bool + Send + Sync>;

/// Predicate that is true while `key` is held
pub fn modifier_predicate(key: ModifierKey) -> MultiSortPredicate {
    Arc::new(move |event: &HeaderEvent| event.modifiers.is_held(key))
}

/// Shift-click adds a column to the sort
pub fn default_multi_sort_predicate() -> MultiSortPredicate {
    modifier_predicate(ModifierKey::Shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_predicate_is_shift() {
        let predicate = default_multi_sort_predicate();
        assert!(predicate(&HeaderEvent::shift_click()));
        assert!(!predicate(&HeaderEvent::click()));
        assert!(!predicate(&HeaderEvent::with_modifiers(Modifiers {
            control: true,
            ..Modifiers::none()
        })));
    }

    #[test]
    fn test_modifier_predicate() {
        let predicate = modifier_predicate(ModifierKey::Meta);
        let event = HeaderEvent::with_modifiers(Modifiers {
            meta: true,
            shift: true,
            ..Modifiers::none()
        });
        assert!(predicate(&event));
        assert!(!predicate(&HeaderEvent::shift_click()));
    }

    #[test]
    fn test_only() {
        assert_eq!(Modifiers::only(ModifierKey::Shift), Modifiers::shift());
        let control = Modifiers::only(ModifierKey::Control);
        assert!(control.is_held(ModifierKey::Control));
        assert!(!control.is_held(ModifierKey::Shift));
    }

    #[test]
    fn test_is_held() {
        let modifiers = Modifiers {
            alt: true,
            ..Modifiers::none()
        };
        assert!(modifiers.is_held(ModifierKey::Alt));
        assert!(!modifiers.is_held(ModifierKey::Shift));
        assert!(!modifiers.is_held(ModifierKey::Control));
    }
}
