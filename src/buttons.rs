//! Keyboard-free test buttons.
//!
//! Each labelled button either spawns a palette entry or runs the chain
//! containing a block, through a [`BlockEditorController`].

use crate::controller::BlockEditorController;
use crate::error::EditorError;
use crate::execution::ExecutionReport;
use crate::geometry::Point;
use crate::model::BlockId;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAction {
    Spawn { entry: String, at: Point },
    RunChain(BlockId),
}

/// What pressing a button did.
#[derive(Debug)]
pub enum ButtonResult {
    Spawned(BlockId),
    Ran(ExecutionReport),
}

/// Labelled buttons in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct ButtonPanel {
    buttons: IndexMap<String, ButtonAction>,
}

impl ButtonPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// One spawn button per palette entry, stacked down the left edge.
    pub fn for_palette(ctrl: &BlockEditorController) -> Self {
        let mut panel = Self::new();
        let palette = ctrl.palette();
        for (row, entry) in palette.borrow().entries().enumerate() {
            let at = Point::new(20.0, 20.0 + row as f32 * 60.0);
            panel.add(entry, ButtonAction::Spawn { entry: entry.to_string(), at });
        }
        panel
    }

    /// Add or replace a button.
    pub fn add(&mut self, label: &str, action: ButtonAction) {
        self.buttons.insert(label.to_string(), action);
    }

    pub fn remove(&mut self, label: &str) -> bool {
        self.buttons.shift_remove(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.buttons.keys().map(String::as_str)
    }

    pub fn action(&self, label: &str) -> Option<&ButtonAction> {
        self.buttons.get(label)
    }

    /// Press a button. Unknown labels are reported to the graph's
    /// diagnostics.
    pub fn press(
        &self,
        label: &str,
        ctrl: &BlockEditorController,
    ) -> Result<ButtonResult, EditorError> {
        let Some(action) = self.buttons.get(label) else {
            return ctrl
                .graph()
                .borrow_mut()
                .reject(EditorError::UnknownButton(label.to_string()));
        };

        log::debug!("button {label:?} pressed");
        match action {
            ButtonAction::Spawn { entry, at } => ctrl.spawn(entry, *at).map(ButtonResult::Spawned),
            ButtonAction::RunChain(block) => Ok(ButtonResult::Ran(ctrl.run_chain(*block))),
        }
    }
}
