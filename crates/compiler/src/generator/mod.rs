//! Component Graph Generator
//!
//! Builds the injector, component and helper declarations of every tier
//! plus the initializer. Nothing here writes files: every declaration is
//! staged as a [`JavaFile`] and handed back to the caller.

mod application;
mod child;
mod dispatch;

pub use application::ApplicationGenerator;
pub use child::{ChildGenerator, TierArtifacts};
pub use dispatch::InjectionDispatch;

use october_core::{OctoberError, Result, Tier};
use october_writer::{ClassName, JavaFile, TypeName};
use tracing::debug;

/// Target packages of generated sources, derived from the application package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packages {
    /// `<app>.internal.<namespace>.di`
    pub di: String,
    /// `<di>.component`
    pub component: String,
    /// `<di>.component.helper`
    pub helper: String,
}

impl Packages {
    pub fn new(application_package: &str, namespace: &str) -> Self {
        let di = if application_package.is_empty() {
            format!("internal.{}.di", namespace)
        } else {
            format!("{}.internal.{}.di", application_package, namespace)
        };
        let component = format!("{}.component", di);
        let helper = format!("{}.helper", component);
        Self { di, component, helper }
    }
}

/// Progress of one tier through a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoundState {
    Start,
    ContainersDiscovered,
    PresentersDiscovered,
    ComponentsEmitted,
    Done,
}

impl RoundState {
    fn next(self) -> Option<RoundState> {
        match self {
            RoundState::Start => Some(RoundState::ContainersDiscovered),
            RoundState::ContainersDiscovered => Some(RoundState::PresentersDiscovered),
            RoundState::PresentersDiscovered => Some(RoundState::ComponentsEmitted),
            RoundState::ComponentsEmitted => Some(RoundState::Done),
            RoundState::Done => None,
        }
    }
}

/// State machine of a single tier; every transition moves exactly one step
#[derive(Debug, Clone)]
pub struct TierProgress {
    tier: Tier,
    state: RoundState,
}

impl TierProgress {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            state: RoundState::Start,
        }
    }

    /// Move to `to`, which must directly follow the current state
    pub fn advance(&mut self, to: RoundState) -> Result<()> {
        if self.state.next() != Some(to) {
            return Err(OctoberError::InvalidState(format!(
                "{} tier cannot move from {:?} to {:?}",
                self.tier.name(),
                self.state,
                to
            )));
        }
        debug!("State transition: {:?} -> {:?}", self.state, to);
        self.state = to;
        Ok(())
    }

    /// Fail unless the tier has reached at least `state`
    pub fn require(&self, state: RoundState) -> Result<()> {
        if self.state < state {
            return Err(OctoberError::InvalidState(format!(
                "{} tier is at {:?}, expected {:?}",
                self.tier.name(),
                self.state,
                state
            )));
        }
        Ok(())
    }
}

/// Class name of a framework or user type given by qualified name
pub(crate) fn class_name(qualified_name: &str) -> Result<ClassName> {
    ClassName::best_guess(qualified_name).map_err(|e| OctoberError::Emit(e.to_string()))
}

/// `helperActivityComponent` from `HelperActivityComponent`
pub(crate) fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check a staged batch before anything reaches the filer
pub fn validate_batch(files: &[JavaFile], dispatch: &InjectionDispatch) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for file in files {
        if file.type_spec.name.trim().is_empty() || file.package.trim().is_empty() {
            return Err(OctoberError::Emit(format!(
                "generated type {:?} in package {:?} has an empty name",
                file.type_spec.name, file.package
            )));
        }
        if !seen.insert((file.package.as_str(), file.type_spec.name.as_str())) {
            return Err(OctoberError::Emit(format!(
                "{} is generated more than once",
                file.class_name().canonical_name()
            )));
        }
    }

    for (tier, component) in dispatch.components() {
        let declared = files
            .iter()
            .find(|file| file.class_name() == *component)
            .ok_or_else(|| {
                OctoberError::Emit(format!(
                    "{} component {} is missing from the batch",
                    tier.name(),
                    component.canonical_name()
                ))
            })?;

        for target in dispatch.targets(*tier) {
            let target_type = TypeName::from(target.class_name());
            let injected = declared
                .type_spec
                .methods_named(dispatch.inject_method())
                .any(|method| method.parameters.iter().any(|p| p.ty == target_type));
            if !injected {
                return Err(OctoberError::Emit(format!(
                    "{} does not declare an injector for {}",
                    component.canonical_name(),
                    target.qualified_name
                )));
            }
        }
    }
    Ok(())
}
