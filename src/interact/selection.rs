//! # Selection State Machine
//!
//! Maps pick results and explicit close actions to the single global
//! selection and the info-panel view model the chrome renders. At most one
//! part is selected at any time.

use log::info;

use crate::registry::{AnatomyRegistry, RegistryError};

/// Current selection. `Selected` carries the part id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selected(String),
}

/// Info-panel content for a selected part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelViewModel {
    pub name: String,
    pub description: String,
    pub function: String,
    pub related: Vec<String>,
}

/// Instruction to the chrome: show the panel with new content, or hide it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelUpdate {
    Show(PanelViewModel),
    Hide,
}

/// Drives the info panel from pick results and close actions.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::Idle
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Id of the currently selected part, if any.
    pub fn selected_part(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Selected(id) => Some(id),
        }
    }

    /// Feeds a pick result into the machine.
    ///
    /// A hit (re)selects that part and emits the panel view model, even when
    /// the same part was already selected. A miss changes nothing and emits
    /// nothing: clicking empty space does not deselect.
    ///
    /// Picking only reports ids it found in the registry, so an unknown id
    /// here is an internal consistency failure, surfaced as
    /// [`RegistryError::UnknownPartId`].
    pub fn on_pick(
        &mut self,
        result: Option<&str>,
        registry: &AnatomyRegistry,
    ) -> Result<Option<PanelUpdate>, RegistryError> {
        let Some(part_id) = result else {
            return Ok(None);
        };

        let part = registry.get_part(part_id)?;
        info!("selected '{}'", part.display_name);
        self.state = SelectionState::Selected(part.id.clone());

        Ok(Some(PanelUpdate::Show(PanelViewModel {
            name: part.display_name.clone(),
            description: part.metadata.description.clone(),
            function: part.metadata.function.clone(),
            related: part.metadata.related.clone(),
        })))
    }

    /// Closes the panel. Always returns to `Idle` and always emits the hide
    /// signal, including when nothing was selected.
    pub fn on_close(&mut self) -> PanelUpdate {
        self.state = SelectionState::Idle;
        PanelUpdate::Hide
    }
}
