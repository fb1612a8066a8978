use crate::furniture::{FurnitureId, FurnitureObject};
use crate::registry::Registry;
use crate::scene::{PrimitiveHandle, SceneBackend};

/// Outcome of one `resolve_pick`, for the caller to mirror into UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Unchanged,
    Selected(FurnitureId),
    Switched { from: FurnitureId, to: FurnitureId },
    Cleared(FurnitureId),
}

/// Holds the single current selection. Idle when `current` is `None`.
#[derive(Debug, Default)]
pub struct SelectionController {
    current: Option<FurnitureId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<FurnitureId> {
        self.current
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// The only route from UI edits to the selected object.
    pub fn current_mut<'a>(&self, registry: &'a mut Registry) -> Option<&'a mut FurnitureObject> {
        self.current.and_then(|id| registry.get_mut(id))
    }

    pub fn label<'a>(&self, registry: &'a Registry) -> Option<&'a str> {
        self.current
            .and_then(|id| registry.get(id))
            .map(|object| object.name())
    }

    /// Applies a pick result. Misses and picks on geometry no furniture owns
    /// both clear the selection; re-picking the current object changes nothing.
    pub fn resolve_pick(
        &mut self,
        picked: Option<PrimitiveHandle>,
        registry: &mut Registry,
        scene: &mut dyn SceneBackend,
    ) -> SelectionChange {
        let owner = picked.and_then(|handle| registry.lookup(handle));
        let Some(owner) = owner else {
            return self.clear(registry, scene);
        };

        let Some(current) = self.current else {
            if let Some(object) = registry.get_mut(owner) {
                object.select(scene);
            }
            self.current = Some(owner);
            return SelectionChange::Selected(owner);
        };

        let same = match (registry.get(current), registry.get(owner)) {
            (Some(current_object), Some(owner_object)) => current_object.equals(owner_object),
            _ => current == owner,
        };
        if same {
            return SelectionChange::Unchanged;
        }

        // Old outline goes off before the new one comes on.
        if let Some(object) = registry.get_mut(current) {
            object.deselect(scene);
        }
        if let Some(object) = registry.get_mut(owner) {
            object.select(scene);
        }
        self.current = Some(owner);
        SelectionChange::Switched {
            from: current,
            to: owner,
        }
    }

    pub fn clear(
        &mut self,
        registry: &mut Registry,
        scene: &mut dyn SceneBackend,
    ) -> SelectionChange {
        match self.current.take() {
            Some(current) => {
                if let Some(object) = registry.get_mut(current) {
                    object.deselect(scene);
                }
                SelectionChange::Cleared(current)
            }
            None => SelectionChange::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::FurnitureDescriptor;
    use crate::scene::tests::RecordingScene;
    use std::sync::Arc;

    fn register(registry: &mut Registry, name: &str, handles: &[PrimitiveHandle]) -> FurnitureId {
        let descriptor = Arc::new(FurnitureDescriptor::new("a.mesh", name));
        let object = FurnitureObject::new(descriptor, handles.to_vec()).unwrap();
        registry.register(object).unwrap()
    }

    #[test]
    fn miss_from_idle_is_a_no_op() {
        let mut scene = RecordingScene::new();
        let mut registry = Registry::new();
        let mut selection = SelectionController::new();

        let change = selection.resolve_pick(None, &mut registry, &mut scene);
        assert_eq!(change, SelectionChange::Unchanged);
        assert!(selection.is_idle());
        assert!(scene.calls.is_empty());
    }

    #[test]
    fn chair_scenario_select_reclick_then_miss() {
        let mut scene = RecordingScene::new();
        let handles = scene.spawn(2);
        let mut registry = Registry::new();
        let chair = register(&mut registry, "Chair", &handles);
        let mut selection = SelectionController::new();

        let change = selection.resolve_pick(Some(handles[0]), &mut registry, &mut scene);
        assert_eq!(change, SelectionChange::Selected(chair));
        assert_eq!(selection.current(), Some(chair));
        assert_eq!(selection.label(&registry), Some("Chair"));
        let after_select = scene.calls.len();
        assert_eq!(after_select, 2);

        let change = selection.resolve_pick(Some(handles[0]), &mut registry, &mut scene);
        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(scene.calls.len(), after_select);

        // A different primitive of the same object is still a re-click.
        let change = selection.resolve_pick(Some(handles[1]), &mut registry, &mut scene);
        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(scene.calls.len(), after_select);

        let change = selection.resolve_pick(None, &mut registry, &mut scene);
        assert_eq!(change, SelectionChange::Cleared(chair));
        assert!(selection.is_idle());
        assert_eq!(selection.label(&registry), None);
        assert_eq!(
            scene.outline_calls()[after_select..].to_vec(),
            vec![(handles[0], false), (handles[1], false)]
        );
        assert!(!registry.get(chair).unwrap().is_selected());
    }

    #[test]
    fn switching_deselects_before_selecting() {
        let mut scene = RecordingScene::new();
        let handles = scene.spawn(2);
        let mut registry = Registry::new();
        let x = register(&mut registry, "Chair", &handles[..1]);
        let y = register(&mut registry, "Shelf", &handles[1..]);
        let mut selection = SelectionController::new();

        selection.resolve_pick(Some(handles[0]), &mut registry, &mut scene);
        scene.calls.clear();

        let change = selection.resolve_pick(Some(handles[1]), &mut registry, &mut scene);
        assert_eq!(change, SelectionChange::Switched { from: x, to: y });
        assert_eq!(selection.current(), Some(y));
        assert_eq!(
            scene.outline_calls(),
            vec![(handles[0], false), (handles[1], true)]
        );
        assert!(!registry.get(x).unwrap().is_selected());
        assert!(registry.get(y).unwrap().is_selected());
    }

    #[test]
    fn pick_on_unowned_geometry_clears_selection() {
        let mut scene = RecordingScene::new();
        let handles = scene.spawn(2);
        let mut registry = Registry::new();
        let chair = register(&mut registry, "Chair", &handles[..1]);
        let mut selection = SelectionController::new();

        selection.resolve_pick(Some(handles[0]), &mut registry, &mut scene);
        let change = selection.resolve_pick(Some(handles[1]), &mut registry, &mut scene);
        assert_eq!(change, SelectionChange::Cleared(chair));
        assert!(selection.is_idle());

        let change = selection.resolve_pick(Some(handles[1]), &mut registry, &mut scene);
        assert_eq!(change, SelectionChange::Unchanged);
    }

    #[test]
    fn current_mut_is_empty_while_idle() {
        let mut scene = RecordingScene::new();
        let handles = scene.spawn(1);
        let mut registry = Registry::new();
        register(&mut registry, "Chair", &handles);
        let mut selection = SelectionController::new();

        assert!(selection.current_mut(&mut registry).is_none());
        selection.resolve_pick(Some(handles[0]), &mut registry, &mut scene);
        assert_eq!(selection.current_mut(&mut registry).unwrap().name(), "Chair");
    }
}
