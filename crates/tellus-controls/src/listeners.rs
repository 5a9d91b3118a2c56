use crate::{ControlChange, ControlPath};

/// Change listeners keyed by controller path.
///
/// The action type is chosen by the application. A dispatch maps a batch of
/// changes onto the actions registered for the changed paths.
#[derive(Debug, Clone)]
pub struct Listeners<A> {
    entries: Vec<(ControlPath, A)>,
}

impl<A> Default for Listeners<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A: Clone + PartialEq> Listeners<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` for changes to the leaf at `path`.
    pub fn on_change(&mut self, path: impl Into<ControlPath>, action: A) {
        self.entries.push((path.into(), action));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Actions registered for any of `changes`, in registration order.
    ///
    /// Each distinct action appears once per dispatch, however many of its
    /// paths changed.
    pub fn dispatch(&self, changes: &[ControlChange]) -> Vec<A> {
        let mut actions = Vec::new();
        for (path, action) in &self.entries {
            let changed = changes.iter().any(|change| &change.path == path);
            if changed && !actions.contains(action) {
                actions.push(action.clone());
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ControlValue;

    fn change(path: &str) -> ControlChange {
        ControlChange {
            path: ControlPath::parse(path),
            value: ControlValue::Bool(true),
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Action {
        Clear,
        Light,
        Shell(u8),
    }

    fn listeners() -> Listeners<Action> {
        let mut listeners = Listeners::new();
        listeners.on_change("Scene/Color", Action::Clear);
        listeners.on_change("Scene/Light/Position.X", Action::Light);
        listeners.on_change("Scene/Light/Position.Y", Action::Light);
        listeners.on_change("Planet/Geometry/Ocean/Radius", Action::Shell(0));
        listeners.on_change("Planet/Geometry/Ground/Radius", Action::Shell(1));
        listeners
    }

    #[test]
    fn test_only_changed_paths_dispatch() {
        let actions = listeners().dispatch(&[change("Planet/Geometry/Ground/Radius")]);
        assert_eq!(actions, vec![Action::Shell(1)]);
    }

    #[test]
    fn test_no_changes_no_actions() {
        assert!(listeners().dispatch(&[]).is_empty());
        assert!(listeners().dispatch(&[change("Planet/Renderer/Rotation.X")]).is_empty());
    }

    #[test]
    fn test_registration_order_and_dedup() {
        let changes = [
            change("Planet/Geometry/Ocean/Radius"),
            change("Scene/Light/Position.Y"),
            change("Scene/Light/Position.X"),
            change("Scene/Color"),
        ];
        let actions = listeners().dispatch(&changes);
        assert_eq!(actions, vec![Action::Clear, Action::Light, Action::Shell(0)]);
    }

    #[test]
    fn test_parent_path_does_not_match_leaf() {
        let actions = listeners().dispatch(&[change("Scene/Light")]);
        assert!(actions.is_empty());
    }
}
