//! Core type definitions for Stampede

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operations a simulated agent can perform against the target service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ActionKind {
    /// Baseline action, always available
    #[default]
    ListItems,
    SearchItems,
    ViewItem,
    CreateItem,
    UpdateItem,
    ViewDashboard,
    ViewProfile,
}

impl ActionKind {
    /// Get the tag used in events and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ListItems => "list_items",
            ActionKind::SearchItems => "search_items",
            ActionKind::ViewItem => "view_item",
            ActionKind::CreateItem => "create_item",
            ActionKind::UpdateItem => "update_item",
            ActionKind::ViewDashboard => "view_dashboard",
            ActionKind::ViewProfile => "view_profile",
        }
    }

    /// Get all actions in catalogue order
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::ListItems,
            ActionKind::SearchItems,
            ActionKind::ViewItem,
            ActionKind::CreateItem,
            ActionKind::UpdateItem,
            ActionKind::ViewDashboard,
            ActionKind::ViewProfile,
        ]
    }

    /// The action every agent can always fall back to
    pub fn baseline() -> ActionKind {
        ActionKind::ListItems
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownAction(s.to_string()))
    }
}

/// Capability class of a persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Role {
    /// May view aggregate dashboards
    Elevated,
    #[default]
    Standard,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Elevated => "elevated",
            Role::Standard => "standard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elevated" => Ok(Role::Elevated),
            "standard" => Ok(Role::Standard),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

/// Speed class of a persona, scaling its inter-action delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Pace {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Fast => "fast",
            Pace::Normal => "normal",
            Pace::Slow => "slow",
        }
    }

    /// Multiplier applied to the pacing delay range
    pub fn multiplier(&self) -> f64 {
        match self {
            Pace::Fast => 0.5,
            Pace::Normal => 1.0,
            Pace::Slow => 2.0,
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Pace {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Pace::Fast),
            "normal" => Ok(Pace::Normal),
            "slow" => Ok(Pace::Slow),
            _ => Err(CoreError::UnknownPace(s.to_string())),
        }
    }
}

/// Static behavioural profile assigned to an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique identifier, also the login username
    pub name: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub pace: Pace,

    /// Action whose selection weight is doubled for this persona
    #[serde(default)]
    pub bias: ActionKind,
}

impl Persona {
    pub fn new(name: impl Into<String>, role: Role, pace: Pace, bias: ActionKind) -> Self {
        Self {
            name: name.into(),
            role,
            pace,
            bias,
        }
    }

    pub fn is_elevated(&self) -> bool {
        self.role == Role::Elevated
    }
}

/// Built-in roster used when the configuration names no personas
pub fn default_personas() -> Vec<Persona> {
    use ActionKind::*;
    use Pace::*;
    use Role::*;

    vec![
        Persona::new("alice", Elevated, Normal, ViewDashboard),
        Persona::new("bob", Standard, Fast, CreateItem),
        Persona::new("carol", Standard, Slow, SearchItems),
        Persona::new("dave", Standard, Normal, UpdateItem),
        Persona::new("erin", Elevated, Fast, ListItems),
        Persona::new("frank", Standard, Normal, ViewItem),
        Persona::new("grace", Standard, Slow, CreateItem),
        Persona::new("heidi", Elevated, Normal, UpdateItem),
        Persona::new("ivan", Standard, Fast, SearchItems),
        Persona::new("judy", Standard, Normal, ViewProfile),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_from_str() {
        assert_eq!("list_items".parse::<ActionKind>().unwrap(), ActionKind::ListItems);
        assert_eq!("VIEW_DASHBOARD".parse::<ActionKind>().unwrap(), ActionKind::ViewDashboard);
        assert!("delete_everything".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_action_kind_serde_tag_matches_as_str() {
        for kind in ActionKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_pace_multiplier() {
        assert_eq!(Pace::Fast.multiplier(), 0.5);
        assert_eq!(Pace::Normal.multiplier(), 1.0);
        assert_eq!(Pace::Slow.multiplier(), 2.0);
    }

    #[test]
    fn test_persona_yaml_defaults() {
        let persona: Persona = serde_yaml::from_str("name: zed").unwrap();
        assert_eq!(persona.role, Role::Standard);
        assert_eq!(persona.pace, Pace::Normal);
        assert_eq!(persona.bias, ActionKind::ListItems);
    }

    #[test]
    fn test_default_personas_have_unique_names() {
        let personas = default_personas();
        let mut names: Vec<_> = personas.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), personas.len());
        assert!(personas.iter().any(Persona::is_elevated));
    }
}
