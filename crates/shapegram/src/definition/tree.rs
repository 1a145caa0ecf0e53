//! Definition tree
//!
//! Per-class display and expansion settings, resolved through an
//! override-inheritance chain:
//!
//! ```text
//! root ── listed group ── listed class
//!      └─ expanded group ── expanded class
//! ```
//!
//! Every flag resolves independently: the first node in the chain that sets
//! it wins. Unset boolean flags resolve to `false`, unset URI sets resolve to
//! "no restriction".

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::{DiagramError, SchemaGraph};

/// Index of a node in the [`DefinitionRegistry`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefinitionId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionKind {
    Root,
    ListedGroup,
    ExpandedGroup,
    ListedClass(String),
    ExpandedClass(String),
}

impl DefinitionKind {
    pub fn uri(&self) -> Option<&str> {
        match self {
            DefinitionKind::ListedClass(uri) | DefinitionKind::ExpandedClass(uri) => Some(uri),
            _ => None,
        }
    }
}

/// Boolean settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    ExpandOutLinks,
    ExpandInLinks,
    ExpandSuperClasses,
    ExpandTransitiveSuperClasses,
    ExpandSubClasses,
    ExpandTransitiveSubClasses,
    HideInnerProperties,
    HideOutLinks,
    HideSuperClassLinks,
    HideIndirectSuperClassLinks,
    HideSuperClassStereotypes,
    DisplayClassUri,
    DisplayPropertyUri,
}

impl Flag {
    pub const ALL: [Flag; 13] = [
        Flag::ExpandOutLinks,
        Flag::ExpandInLinks,
        Flag::ExpandSuperClasses,
        Flag::ExpandTransitiveSuperClasses,
        Flag::ExpandSubClasses,
        Flag::ExpandTransitiveSubClasses,
        Flag::HideInnerProperties,
        Flag::HideOutLinks,
        Flag::HideSuperClassLinks,
        Flag::HideIndirectSuperClassLinks,
        Flag::HideSuperClassStereotypes,
        Flag::DisplayClassUri,
        Flag::DisplayPropertyUri,
    ];

    /// Name as written in definition documents
    pub fn name(&self) -> &'static str {
        match self {
            Flag::ExpandOutLinks => "expandOutLinks",
            Flag::ExpandInLinks => "expandInLinks",
            Flag::ExpandSuperClasses => "expandSuperClasses",
            Flag::ExpandTransitiveSuperClasses => "expandTransitiveSuperClasses",
            Flag::ExpandSubClasses => "expandSubClasses",
            Flag::ExpandTransitiveSubClasses => "expandTransitiveSubClasses",
            Flag::HideInnerProperties => "hideInnerProperties",
            Flag::HideOutLinks => "hideOutLinks",
            Flag::HideSuperClassLinks => "hideSuperClassLinks",
            Flag::HideIndirectSuperClassLinks => "hideIndirectSuperClassLinks",
            Flag::HideSuperClassStereotypes => "hideSuperClassStereotypes",
            Flag::DisplayClassUri => "displayClassUri",
            Flag::DisplayPropertyUri => "displayPropertyUri",
        }
    }
}

/// URI-set settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UriSet {
    OnlyProperties,
    ExcludeProperties,
    OnlyOutLinks,
    ExcludeOutLinks,
}

/// Pair of mutually exclusive URI sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterScope {
    Properties,
    OutLinks,
}

impl FilterScope {
    fn sets(self) -> (UriSet, UriSet) {
        match self {
            FilterScope::Properties => (UriSet::OnlyProperties, UriSet::ExcludeProperties),
            FilterScope::OutLinks => (UriSet::OnlyOutLinks, UriSet::ExcludeOutLinks),
        }
    }

    fn names(self) -> (&'static str, &'static str) {
        match self {
            FilterScope::Properties => ("onlyProperties", "excludeProperties"),
            FilterScope::OutLinks => ("onlyOutLinks", "excludeOutLinks"),
        }
    }
}

/// Resolved filter over property predicates
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
    Exclude(BTreeSet<String>),
}

impl PropertyFilter {
    /// Whether a path with these predicates passes the filter
    pub fn admits<'a>(&self, predicates: impl IntoIterator<Item = &'a str>) -> bool {
        match self {
            PropertyFilter::All => true,
            PropertyFilter::Only(uris) => predicates.into_iter().any(|p| uris.contains(p)),
            PropertyFilter::Exclude(uris) => !predicates.into_iter().any(|p| uris.contains(p)),
        }
    }
}

/// Explicit settings of one definition node; `None` inherits
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSettings {
    pub expand_out_links: Option<bool>,
    pub expand_in_links: Option<bool>,
    pub expand_super_classes: Option<bool>,
    pub expand_transitive_super_classes: Option<bool>,
    pub expand_sub_classes: Option<bool>,
    pub expand_transitive_sub_classes: Option<bool>,
    pub hide_inner_properties: Option<bool>,
    pub hide_out_links: Option<bool>,
    pub hide_super_class_links: Option<bool>,
    pub hide_indirect_super_class_links: Option<bool>,
    pub hide_super_class_stereotypes: Option<bool>,
    pub display_class_uri: Option<bool>,
    pub display_property_uri: Option<bool>,
    pub only_properties: Option<BTreeSet<String>>,
    pub exclude_properties: Option<BTreeSet<String>>,
    pub only_out_links: Option<BTreeSet<String>>,
    pub exclude_out_links: Option<BTreeSet<String>>,
}

impl DefinitionSettings {
    pub fn flag(&self, flag: Flag) -> Option<bool> {
        match flag {
            Flag::ExpandOutLinks => self.expand_out_links,
            Flag::ExpandInLinks => self.expand_in_links,
            Flag::ExpandSuperClasses => self.expand_super_classes,
            Flag::ExpandTransitiveSuperClasses => self.expand_transitive_super_classes,
            Flag::ExpandSubClasses => self.expand_sub_classes,
            Flag::ExpandTransitiveSubClasses => self.expand_transitive_sub_classes,
            Flag::HideInnerProperties => self.hide_inner_properties,
            Flag::HideOutLinks => self.hide_out_links,
            Flag::HideSuperClassLinks => self.hide_super_class_links,
            Flag::HideIndirectSuperClassLinks => self.hide_indirect_super_class_links,
            Flag::HideSuperClassStereotypes => self.hide_super_class_stereotypes,
            Flag::DisplayClassUri => self.display_class_uri,
            Flag::DisplayPropertyUri => self.display_property_uri,
        }
    }

    pub fn set_flag(&mut self, flag: Flag, value: Option<bool>) {
        let slot = match flag {
            Flag::ExpandOutLinks => &mut self.expand_out_links,
            Flag::ExpandInLinks => &mut self.expand_in_links,
            Flag::ExpandSuperClasses => &mut self.expand_super_classes,
            Flag::ExpandTransitiveSuperClasses => &mut self.expand_transitive_super_classes,
            Flag::ExpandSubClasses => &mut self.expand_sub_classes,
            Flag::ExpandTransitiveSubClasses => &mut self.expand_transitive_sub_classes,
            Flag::HideInnerProperties => &mut self.hide_inner_properties,
            Flag::HideOutLinks => &mut self.hide_out_links,
            Flag::HideSuperClassLinks => &mut self.hide_super_class_links,
            Flag::HideIndirectSuperClassLinks => &mut self.hide_indirect_super_class_links,
            Flag::HideSuperClassStereotypes => &mut self.hide_super_class_stereotypes,
            Flag::DisplayClassUri => &mut self.display_class_uri,
            Flag::DisplayPropertyUri => &mut self.display_property_uri,
        };
        *slot = value;
    }

    pub fn uri_set(&self, set: UriSet) -> Option<&BTreeSet<String>> {
        match set {
            UriSet::OnlyProperties => self.only_properties.as_ref(),
            UriSet::ExcludeProperties => self.exclude_properties.as_ref(),
            UriSet::OnlyOutLinks => self.only_out_links.as_ref(),
            UriSet::ExcludeOutLinks => self.exclude_out_links.as_ref(),
        }
    }

    pub fn set_uri_set(&mut self, set: UriSet, uris: Option<BTreeSet<String>>) {
        let slot = match set {
            UriSet::OnlyProperties => &mut self.only_properties,
            UriSet::ExcludeProperties => &mut self.exclude_properties,
            UriSet::OnlyOutLinks => &mut self.only_out_links,
            UriSet::ExcludeOutLinks => &mut self.exclude_out_links,
        };
        *slot = uris;
    }

    /// Expand prefixed names in every URI set
    pub fn expand_uris(&mut self, graph: &dyn SchemaGraph) {
        for set in [
            &mut self.only_properties,
            &mut self.exclude_properties,
            &mut self.only_out_links,
            &mut self.exclude_out_links,
        ] {
            if let Some(uris) = set.take() {
                *set = Some(uris.iter().map(|u| graph.expand_prefix(u)).collect());
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DefinitionNode {
    pub kind: DefinitionKind,
    pub parent: Option<DefinitionId>,
    pub settings: DefinitionSettings,
}

/// Arena of definition nodes keyed by class URI
#[derive(Debug, Clone)]
pub struct DefinitionRegistry {
    name: Option<String>,
    nodes: Vec<DefinitionNode>,
    listed: BTreeMap<String, DefinitionId>,
    expanded: BTreeMap<String, DefinitionId>,
}

const ROOT: DefinitionId = DefinitionId(0);
const LISTED_GROUP: DefinitionId = DefinitionId(1);
const EXPANDED_GROUP: DefinitionId = DefinitionId(2);

impl DefinitionRegistry {
    pub fn new() -> Self {
        let nodes = vec![
            DefinitionNode {
                kind: DefinitionKind::Root,
                parent: None,
                settings: DefinitionSettings::default(),
            },
            DefinitionNode {
                kind: DefinitionKind::ListedGroup,
                parent: Some(ROOT),
                settings: DefinitionSettings::default(),
            },
            DefinitionNode {
                kind: DefinitionKind::ExpandedGroup,
                parent: Some(ROOT),
                settings: DefinitionSettings::default(),
            },
        ];
        Self {
            name: None,
            nodes,
            listed: BTreeMap::new(),
            expanded: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn root(&self) -> DefinitionId {
        ROOT
    }

    pub fn listed_group(&self) -> DefinitionId {
        LISTED_GROUP
    }

    pub fn expanded_group(&self) -> DefinitionId {
        EXPANDED_GROUP
    }

    pub fn node(&self, id: DefinitionId) -> &DefinitionNode {
        &self.nodes[id.0]
    }

    pub fn settings_mut(&mut self, id: DefinitionId) -> &mut DefinitionSettings {
        &mut self.nodes[id.0].settings
    }

    pub fn set_flag(&mut self, id: DefinitionId, flag: Flag, value: bool) {
        self.settings_mut(id).set_flag(flag, Some(value));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn chain(&self, id: DefinitionId) -> impl Iterator<Item = &DefinitionNode> {
        std::iter::successors(Some(self.node(id)), move |node| {
            node.parent.map(|parent| self.node(parent))
        })
    }

    /// Resolve a boolean flag through the chain; unset means `false`
    pub fn flag(&self, id: DefinitionId, flag: Flag) -> bool {
        self.chain(id)
            .find_map(|node| node.settings.flag(flag))
            .unwrap_or(false)
    }

    /// Resolve a URI set through the chain; unset means no restriction
    pub fn uri_set(&self, id: DefinitionId, set: UriSet) -> Option<&BTreeSet<String>> {
        self.chain(id).find_map(|node| node.settings.uri_set(set))
    }

    /// Resolve the filter of a scope
    ///
    /// Fails when both the `only` and the `exclude` set resolve to a value.
    pub fn property_filter(
        &self,
        id: DefinitionId,
        scope: FilterScope,
    ) -> Result<PropertyFilter, DiagramError> {
        let (only, exclude) = scope.sets();
        match (self.uri_set(id, only), self.uri_set(id, exclude)) {
            (Some(_), Some(_)) => {
                let (only_name, exclude_name) = scope.names();
                let owner = self.node(id).kind.uri().unwrap_or("diagram");
                Err(DiagramError::config_error(format!(
                    "Specify either {} or {}, not both (for {})",
                    only_name, exclude_name, owner
                )))
            }
            (Some(uris), None) => Ok(PropertyFilter::Only(uris.clone())),
            (None, Some(uris)) => Ok(PropertyFilter::Exclude(uris.clone())),
            (None, None) => Ok(PropertyFilter::All),
        }
    }

    /// Check every node for conflicting filters
    pub fn validate_settings(&self) -> Result<(), DiagramError> {
        for index in 0..self.nodes.len() {
            let id = DefinitionId(index);
            self.property_filter(id, FilterScope::Properties)?;
            self.property_filter(id, FilterScope::OutLinks)?;
        }
        Ok(())
    }

    /// Full validation against the schema graph
    ///
    /// Conflicting settings are fatal. Listed classes missing from the graph
    /// are dropped and returned as recovered errors.
    pub fn validate(&mut self, graph: &dyn SchemaGraph) -> Result<Vec<DiagramError>, DiagramError> {
        self.validate_settings()?;
        Ok(self.retain_resolvable(graph))
    }

    /// Drop listed classes the graph does not know
    pub fn retain_resolvable(&mut self, graph: &dyn SchemaGraph) -> Vec<DiagramError> {
        let missing: Vec<String> = self
            .listed
            .keys()
            .filter(|uri| !graph.has_class(uri))
            .cloned()
            .collect();

        missing
            .into_iter()
            .map(|uri| {
                self.listed.remove(&uri);
                let error = DiagramError::unresolvable_reference(
                    uri.clone(),
                    "the schema does not contain this class, which was listed in the diagram definition".to_string(),
                );
                warn!(uri = %uri, "Dropping unresolvable listed class");
                error
            })
            .collect()
    }

    /// Find or create the listed definition of a class
    pub fn listed_class(&mut self, uri: &str) -> DefinitionId {
        if let Some(id) = self.listed.get(uri) {
            return *id;
        }
        let id = self.push(DefinitionKind::ListedClass(uri.to_string()), LISTED_GROUP);
        self.listed.insert(uri.to_string(), id);
        id
    }

    /// Find or create the expanded definition of a class
    pub fn expanded_class(&mut self, uri: &str) -> DefinitionId {
        if let Some(id) = self.expanded.get(uri) {
            return *id;
        }
        debug!(uri = %uri, "Creating expanded class definition");
        let id = self.push(DefinitionKind::ExpandedClass(uri.to_string()), EXPANDED_GROUP);
        self.expanded.insert(uri.to_string(), id);
        id
    }

    /// Listed definition if there is one, otherwise the expanded one
    pub fn definition_for(&mut self, uri: &str) -> DefinitionId {
        match self.listed.get(uri) {
            Some(id) => *id,
            None => self.expanded_class(uri),
        }
    }

    pub fn is_listed(&self, uri: &str) -> bool {
        self.listed.contains_key(uri)
    }

    /// Listed class URIs, sorted
    pub fn listed_classes(&self) -> Vec<String> {
        self.listed.keys().cloned().collect()
    }

    fn push(&mut self, kind: DefinitionKind, parent: DefinitionId) -> DefinitionId {
        let id = DefinitionId(self.nodes.len());
        self.nodes.push(DefinitionNode {
            kind,
            parent: Some(parent),
            settings: DefinitionSettings::default(),
        });
        id
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
