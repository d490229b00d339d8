//! The built permission set.

use std::collections::{HashMap, HashSet};

use portcullis_types::{Action, ResourceType};
use serde::{Deserialize, Serialize, Serializer};

use crate::subject::Subject;

/// A single grant: `action` may be performed on `resource_type`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityRule {
    pub action: Action,

    /// Serialized as `subject` to match the shape frontends consume.
    #[serde(rename = "subject")]
    pub resource_type: ResourceType,
}

impl AbilityRule {
    pub fn new(action: impl Into<Action>, resource_type: ResourceType) -> Self {
        Self {
            action: action.into(),
            resource_type,
        }
    }
}

/// Immutable set of [`AbilityRule`]s held by one principal.
///
/// Set semantics: a rule is either present or not, however many roles or
/// resources contributed it. Rules are indexed by resource type so that
/// [`Ability::allows`] is a hash lookup that does not allocate.
///
/// There are no deny rules and no wildcards at check time. An empty ability
/// denies everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ability {
    /// resource type -> granted actions. Never holds an empty set.
    grants: HashMap<ResourceType, HashSet<Action>>,
}

impl Ability {
    /// Creates an ability that allows nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a rule. Only the builder grows an ability; once handed out it is
    /// never mutated.
    pub(crate) fn insert(&mut self, action: Action, resource_type: ResourceType) -> bool {
        self.grants.entry(resource_type).or_default().insert(action)
    }

    /// Returns whether `action` is allowed on `subject`.
    ///
    /// `subject` may be a [`ResourceType`] or any entity implementing
    /// [`Subject`]; trait objects report their concrete type.
    pub fn allows<S>(&self, action: &str, subject: &S) -> bool
    where
        S: Subject + ?Sized,
    {
        self.grants
            .get(&subject.resource_type())
            .is_some_and(|actions| actions.contains(action))
    }

    /// Negation of [`Ability::allows`].
    pub fn cannot<S>(&self, action: &str, subject: &S) -> bool
    where
        S: Subject + ?Sized,
    {
        !self.allows(action, subject)
    }

    /// Returns whether the exact rule is present.
    pub fn contains(&self, rule: &AbilityRule) -> bool {
        self.allows(rule.action.as_str(), &rule.resource_type)
    }

    /// Iterates all rules in unspecified order.
    pub fn rules(&self) -> impl Iterator<Item = (&Action, ResourceType)> {
        self.grants.iter().flat_map(|(resource_type, actions)| {
            actions.iter().map(move |action| (action, *resource_type))
        })
    }

    /// Returns all rules, ordered by action then resource type.
    pub fn sorted_rules(&self) -> Vec<AbilityRule> {
        let mut rules: Vec<AbilityRule> = self
            .rules()
            .map(|(action, resource_type)| AbilityRule::new(action.clone(), resource_type))
            .collect();
        rules.sort();
        rules
    }

    /// Returns the actions granted on one resource type, sorted.
    ///
    /// Used to decide which menu entries and buttons a principal sees.
    pub fn actions_for(&self, resource_type: ResourceType) -> Vec<&Action> {
        let mut actions: Vec<&Action> = self
            .grants
            .get(&resource_type)
            .map(|set| set.iter().collect())
            .unwrap_or_default();
        actions.sort();
        actions
    }

    /// Returns the resource types with at least one grant, sorted.
    pub fn resource_types(&self) -> Vec<ResourceType> {
        let mut types: Vec<ResourceType> = self.grants.keys().copied().collect();
        types.sort();
        types
    }

    /// Number of distinct rules.
    pub fn len(&self) -> usize {
        self.grants.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl FromIterator<AbilityRule> for Ability {
    fn from_iter<I: IntoIterator<Item = AbilityRule>>(iter: I) -> Self {
        let mut ability = Ability::empty();
        for rule in iter {
            ability.insert(rule.action, rule.resource_type);
        }
        ability
    }
}

/// Serialized as a sorted list of rules.
impl Serialize for Ability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sorted_rules().serialize(serializer)
    }
}
