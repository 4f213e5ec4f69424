use bevy::log::debug;
use bevy::utils::HashMap;
use openxr as xr;

use super::actions::{ActionType, ActionValue, LogicalInput};
use crate::error::{OxrError, Result};
use crate::types::{Hand, Handed};

/// Where a hand's pose space was found relative to the base space.
#[derive(Clone, Copy, Debug)]
pub struct HandLocation {
    pub pose: xr::Posef,
    pub flags: xr::SpaceLocationFlags,
}

/// The slice of the OpenXR action API the input mapper relies on.
///
/// Every call that can fail is fatal to the caller, except
/// [`XrInputRuntime::locate_hand`] whose failure only means the hand is not
/// tracked this frame.
pub trait XrInputRuntime {
    /// Reference space poses are resolved against.
    type Space;

    fn string_to_path(&self, path: &str) -> Result<xr::Path>;
    fn create_action_set(&mut self, name: &str, localized_name: &str, priority: u32) -> Result<()>;
    fn create_action(&mut self, input: LogicalInput, subaction_paths: &[xr::Path]) -> Result<()>;
    fn suggest_bindings(
        &mut self,
        interaction_profile: xr::Path,
        bindings: &[(LogicalInput, xr::Path)],
    ) -> Result<()>;
    fn create_action_space(&mut self, hand: Hand, subaction_path: xr::Path) -> Result<()>;
    fn attach_action_set(&mut self) -> Result<()>;
    fn sync_actions(&mut self) -> Result<()>;
    fn pose_active(&self, subaction_path: xr::Path) -> Result<bool>;
    /// Interaction profile the runtime picked for a hand, or a null path
    /// while none is bound.
    fn current_interaction_profile(&self, subaction_path: xr::Path) -> Result<xr::Path>;
    fn bool_state(&self, input: LogicalInput, subaction_path: xr::Path) -> Result<ActionValue<bool>>;
    fn float_state(&self, input: LogicalInput, subaction_path: xr::Path) -> Result<ActionValue<f32>>;
    fn locate_hand(&self, hand: Hand, base_space: &Self::Space, time: xr::Time) -> Result<HandLocation>;
    /// Destroys the action set along with its actions and spaces.
    fn destroy_action_set(&mut self);
}

pub enum TypedAction {
    Bool(xr::Action<bool>),
    F32(xr::Action<f32>),
    PoseF(xr::Action<xr::Posef>),
}

/// [`XrInputRuntime`] backed by a live OpenXR instance and session.
pub struct OxrInputRuntime<G: xr::Graphics> {
    instance: xr::Instance,
    session: xr::Session<G>,
    action_set: Option<xr::ActionSet>,
    actions: HashMap<LogicalInput, TypedAction>,
    spaces: Handed<Option<xr::Space>>,
}

impl<G: xr::Graphics> OxrInputRuntime<G> {
    pub fn new(instance: xr::Instance, session: xr::Session<G>) -> Self {
        Self {
            instance,
            session,
            action_set: None,
            actions: HashMap::new(),
            spaces: Handed::default(),
        }
    }

    fn action_set(&self) -> Result<&xr::ActionSet> {
        self.action_set.as_ref().ok_or(OxrError::InputNotInitialized)
    }

    fn action(&self, input: LogicalInput) -> Result<&TypedAction> {
        self.actions.get(&input).ok_or(OxrError::MissingAction(input))
    }
}

impl<G: xr::Graphics> XrInputRuntime for OxrInputRuntime<G> {
    type Space = xr::Space;

    fn string_to_path(&self, path: &str) -> Result<xr::Path> {
        Ok(self.instance.string_to_path(path)?)
    }

    fn create_action_set(&mut self, name: &str, localized_name: &str, priority: u32) -> Result<()> {
        self.action_set = Some(self.instance.create_action_set(name, localized_name, priority)?);
        Ok(())
    }

    fn create_action(&mut self, input: LogicalInput, subaction_paths: &[xr::Path]) -> Result<()> {
        let set = self.action_set()?;
        let (name, pretty_name) = (input.name(), input.pretty_name());
        let action = match input.action_type() {
            ActionType::Bool => TypedAction::Bool(set.create_action(name, pretty_name, subaction_paths)?),
            ActionType::F32 => TypedAction::F32(set.create_action(name, pretty_name, subaction_paths)?),
            ActionType::PoseF => {
                TypedAction::PoseF(set.create_action(name, pretty_name, subaction_paths)?)
            }
        };
        self.actions.insert(input, action);
        Ok(())
    }

    fn suggest_bindings(
        &mut self,
        interaction_profile: xr::Path,
        bindings: &[(LogicalInput, xr::Path)],
    ) -> Result<()> {
        let bindings = bindings
            .iter()
            .map(|&(input, path)| {
                Ok(match self.action(input)? {
                    TypedAction::Bool(a) => xr::Binding::new(a, path),
                    TypedAction::F32(a) => xr::Binding::new(a, path),
                    TypedAction::PoseF(a) => xr::Binding::new(a, path),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.instance
            .suggest_interaction_profile_bindings(interaction_profile, &bindings)?;
        Ok(())
    }

    fn create_action_space(&mut self, hand: Hand, subaction_path: xr::Path) -> Result<()> {
        let TypedAction::PoseF(pose) = self.action(LogicalInput::Pose)? else {
            return Err(OxrError::WrongActionType(LogicalInput::Pose));
        };
        let space = pose.create_space(self.session.clone(), subaction_path, xr::Posef::IDENTITY)?;
        self.spaces[hand] = Some(space);
        Ok(())
    }

    fn attach_action_set(&mut self) -> Result<()> {
        self.session.attach_action_sets(&[self.action_set()?])?;
        Ok(())
    }

    fn sync_actions(&mut self) -> Result<()> {
        let set = self.action_set()?;
        self.session.sync_actions(&[xr::ActiveActionSet::new(set)])?;
        Ok(())
    }

    fn pose_active(&self, subaction_path: xr::Path) -> Result<bool> {
        match self.action(LogicalInput::Pose)? {
            TypedAction::PoseF(a) => Ok(a.is_active(&self.session, subaction_path)?),
            _ => Err(OxrError::WrongActionType(LogicalInput::Pose)),
        }
    }

    fn current_interaction_profile(&self, subaction_path: xr::Path) -> Result<xr::Path> {
        Ok(self.session.current_interaction_profile(subaction_path)?)
    }

    fn bool_state(&self, input: LogicalInput, subaction_path: xr::Path) -> Result<ActionValue<bool>> {
        match self.action(input)? {
            TypedAction::Bool(a) => Ok(a.state(&self.session, subaction_path)?.into()),
            _ => Err(OxrError::WrongActionType(input)),
        }
    }

    fn float_state(&self, input: LogicalInput, subaction_path: xr::Path) -> Result<ActionValue<f32>> {
        match self.action(input)? {
            TypedAction::F32(a) => Ok(a.state(&self.session, subaction_path)?.into()),
            _ => Err(OxrError::WrongActionType(input)),
        }
    }

    fn locate_hand(&self, hand: Hand, base_space: &xr::Space, time: xr::Time) -> Result<HandLocation> {
        let space = self.spaces[hand]
            .as_ref()
            .ok_or(OxrError::InputNotInitialized)?;
        let location = space.locate(base_space, time)?;
        Ok(HandLocation {
            pose: location.pose,
            flags: location.location_flags,
        })
    }

    fn destroy_action_set(&mut self) {
        self.spaces = Handed::default();
        self.actions.clear();
        if self.action_set.take().is_some() {
            debug!("destroyed browser action set");
        }
    }
}
