use std::fmt;
use std::sync::{Arc, Mutex};

use crate::EditorHandle;

/// Single-slot reference to the live editor.
///
/// Clones share the slot, so the bridge is handed to whatever needs to reach
/// the editor instead of living in a global. Writes are last-wins.
#[derive(Clone, Default)]
pub struct EditorBridge {
    slot: Arc<Mutex<Option<EditorHandle>>>,
}

impl fmt::Debug for EditorBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorBridge")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

impl EditorBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, handle: Option<EditorHandle>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = handle;
        }
    }

    pub fn get(&self) -> Option<EditorHandle> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn is_mounted(&self) -> bool {
        self.slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Sets `handle` and returns a guard that clears the slot on drop, unless
    /// another editor has been mounted since.
    pub fn mount(&self, handle: EditorHandle) -> MountGuard {
        self.set(Some(handle.clone()));
        MountGuard {
            bridge: self.clone(),
            handle,
        }
    }
}

#[must_use = "dropping the guard unmounts the editor"]
pub struct MountGuard {
    bridge: EditorBridge,
    handle: EditorHandle,
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.bridge.slot.lock() {
            let still_ours = slot
                .as_ref()
                .map(|current| Arc::ptr_eq(current, &self.handle))
                .unwrap_or(false);
            if still_ours {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::EditorBridge;
    use crate::dryrun::DryrunEditor;
    use crate::EditorHandle;

    fn editor() -> EditorHandle {
        Arc::new(DryrunEditor::new())
    }

    #[test]
    fn last_set_wins_and_clear_empties() {
        let bridge = EditorBridge::new();
        assert!(bridge.get().is_none());

        let first = editor();
        let second = editor();
        bridge.set(Some(first.clone()));
        bridge.set(Some(second.clone()));
        let current = bridge.get().unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        assert!(!Arc::ptr_eq(&current, &first));

        bridge.clear();
        assert!(!bridge.is_mounted());
    }

    #[test]
    fn clones_share_the_slot() {
        let bridge = EditorBridge::new();
        let reader = bridge.clone();
        bridge.set(Some(editor()));
        assert!(reader.is_mounted());
    }

    #[test]
    fn guard_clears_on_drop() {
        let bridge = EditorBridge::new();
        {
            let _guard = bridge.mount(editor());
            assert!(bridge.is_mounted());
        }
        assert!(!bridge.is_mounted());
    }

    #[test]
    fn stale_guard_leaves_newer_editor_mounted() {
        let bridge = EditorBridge::new();
        let old = bridge.mount(editor());
        let newer = editor();
        let _current = bridge.mount(newer.clone());
        drop(old);
        let mounted = bridge.get().unwrap();
        assert!(Arc::ptr_eq(&mounted, &newer));
    }
}
