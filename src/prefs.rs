// Persisted UI preferences

use crate::error::StorageError;
use crate::storage::{DARK_MODE_SLOT, Slot, SlotStorage};
use std::rc::Rc;
use tracing::debug;

/// The dark-mode flag, independent of todos and auth
pub struct Preferences {
    dark_mode_slot: Slot<bool>,
    dark_mode: bool,
}

impl Preferences {
    pub fn open(storage: Rc<dyn SlotStorage>) -> Self {
        let dark_mode_slot = Slot::new(storage, DARK_MODE_SLOT);
        let dark_mode = dark_mode_slot.load_or_default();
        Self {
            dark_mode_slot,
            dark_mode,
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        debug!(enabled, "Setting dark mode");
        self.dark_mode = enabled;
        self.dark_mode_slot.save(&enabled);
    }

    /// Remove the stored preference; dark mode goes back to off
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.dark_mode_slot.clear()?;
        self.dark_mode = false;
        Ok(())
    }

    /// Flip dark mode, returning the new value
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode);
        self.dark_mode
    }
}
