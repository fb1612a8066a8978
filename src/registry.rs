use crate::furniture::{FurnitureId, FurnitureObject};
use crate::scene::PrimitiveHandle;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("primitive {handle:?} already belongs to furniture {owner:?}")]
    HandleOwned {
        handle: PrimitiveHandle,
        owner: FurnitureId,
    },
    #[error("primitive {handle:?} appears twice in one object")]
    DuplicateHandle { handle: PrimitiveHandle },
}

/// Live furniture in creation order plus the primitive -> owner index.
///
/// Both collections only change inside `register`, so every handle owned by
/// a registered object is indexed and every indexed handle has an owner.
#[derive(Default)]
pub struct Registry {
    objects: Vec<FurnitureObject>,
    index: HashMap<PrimitiveHandle, FurnitureId>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn register(&mut self, mut object: FurnitureObject) -> Result<FurnitureId, RegistryError> {
        // Validate everything before touching either collection.
        for (position, handle) in object.primitives().iter().enumerate() {
            if let Some(owner) = self.index.get(handle) {
                return Err(RegistryError::HandleOwned {
                    handle: *handle,
                    owner: *owner,
                });
            }
            if object.primitives()[..position].contains(handle) {
                return Err(RegistryError::DuplicateHandle { handle: *handle });
            }
        }

        let id = FurnitureId(self.objects.len() as u32);
        object.assign_id(id);
        for handle in object.primitives() {
            self.index.insert(*handle, id);
        }
        log::debug!(
            "Registered {} as {:?} ({} primitives)",
            object.name(),
            id,
            object.primitives().len()
        );
        self.objects.push(object);
        Ok(id)
    }

    pub fn lookup(&self, handle: PrimitiveHandle) -> Option<FurnitureId> {
        self.index.get(&handle).copied()
    }

    pub fn get(&self, id: FurnitureId) -> Option<&FurnitureObject> {
        self.objects.get(id.index())
    }

    pub fn get_mut(&mut self, id: FurnitureId) -> Option<&mut FurnitureObject> {
        self.objects.get_mut(id.index())
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &FurnitureObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FurnitureObject> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn debug_assert_consistent(&self) {
        if cfg!(debug_assertions) {
            let owned: usize = self.objects.iter().map(|o| o.primitives().len()).sum();
            debug_assert_eq!(owned, self.index.len());
            for object in &self.objects {
                for handle in object.primitives() {
                    debug_assert_eq!(self.index.get(handle), Some(&object.id()));
                }
            }
        }
    }
}
