//! Injection Dispatch
//!
//! Table from a container's runtime class to the component method that
//! injects it, built once per run from the discovery maps.

use indexmap::IndexMap;
use october_core::Tier;
use october_writer::code::{name, string, ty};
use october_writer::{ClassName, CodeBlock};

use crate::annotated::AnnotatedClass;
use crate::discovery::DiscoveryMap;

#[derive(Debug, Clone)]
struct DispatchTable {
    component: ClassName,
    /// Keyed by runtime class name
    targets: IndexMap<String, AnnotatedClass>,
}

/// Per-tier dispatch of `inject` calls by exact runtime class
#[derive(Debug, Clone)]
pub struct InjectionDispatch {
    inject_method: String,
    tiers: IndexMap<Tier, DispatchTable>,
}

impl InjectionDispatch {
    pub fn new(inject_method: impl Into<String>) -> Self {
        Self {
            inject_method: inject_method.into(),
            tiers: IndexMap::new(),
        }
    }

    /// Route the containers of a tier to its component
    pub fn with_tier(mut self, tier: Tier, component: ClassName, containers: &DiscoveryMap) -> Self {
        let targets = containers
            .iter()
            .map(|class| (class.binary_name(), class.clone()))
            .collect();
        self.tiers.insert(tier, DispatchTable { component, targets });
        self
    }

    pub fn inject_method(&self) -> &str {
        &self.inject_method
    }

    /// The component each tier dispatches to
    pub fn components(&self) -> impl Iterator<Item = (&Tier, &ClassName)> {
        self.tiers.iter().map(|(tier, table)| (tier, &table.component))
    }

    /// Containers of a tier, in discovery order
    pub fn targets(&self, tier: Tier) -> impl Iterator<Item = &AnnotatedClass> {
        self.tiers.get(&tier).into_iter().flat_map(|table| table.targets.values())
    }

    /// The container an instance of `runtime_class` is injected as, if any
    pub fn resolve(&self, tier: Tier, runtime_class: &str) -> Option<&AnnotatedClass> {
        self.tiers.get(&tier)?.targets.get(runtime_class)
    }

    /// Body of `inject(o)`: a switch over the runtime class name of `o`,
    /// calling the injector on the component returned by `getter`.
    /// Unknown classes fall through without injection.
    pub fn switch_block(&self, tier: Tier, getter: &str) -> CodeBlock {
        let Some(table) = self.tiers.get(&tier).filter(|table| !table.targets.is_empty()) else {
            return CodeBlock::default();
        };

        let mut block = CodeBlock::builder().begin_control_flow("switch (o.getClass().getName())", vec![]);
        for (runtime_name, class) in &table.targets {
            block = block
                .add("case $S:\n$>", vec![string(runtime_name.clone())])
                .add_statement(
                    "$N().$N(($T) o)",
                    vec![name(getter), name(self.inject_method.clone()), ty(class.class_name())],
                )
                .add_statement("break", vec![])
                .unindent();
        }
        block.end_control_flow().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use october_model::TypeElement;

    fn containers(names: &[&str]) -> DiscoveryMap {
        let mut map = DiscoveryMap::new();
        for name in names {
            map.insert_if_absent(AnnotatedClass::new(&TypeElement::class(*name)));
        }
        map
    }

    #[test]
    fn test_resolve_is_exact() {
        let component = ClassName::get("com.example.internal.october.di.component", "OctoberActivityComponent");
        let dispatch = InjectionDispatch::new("inject").with_tier(
            Tier::Activity,
            component,
            &containers(&["com.example.A", "com.example.B", "com.example.Screens.Main"]),
        );

        let a = dispatch.resolve(Tier::Activity, "com.example.A").unwrap();
        assert_eq!(a.qualified_name, "com.example.A");
        assert_eq!(
            dispatch.resolve(Tier::Activity, "com.example.Screens$Main").unwrap().qualified_name,
            "com.example.Screens.Main"
        );
        assert!(dispatch.resolve(Tier::Activity, "com.example.SubclassOfA").is_none());
        assert!(dispatch.resolve(Tier::Fragment, "com.example.A").is_none());
        assert_eq!(dispatch.targets(Tier::Activity).count(), 3);
    }

    #[test]
    fn test_empty_tier_has_empty_switch() {
        let component = ClassName::get("com.example", "OctoberFragmentComponent");
        let dispatch = InjectionDispatch::new("inject").with_tier(Tier::Fragment, component, &DiscoveryMap::new());
        assert!(dispatch.switch_block(Tier::Fragment, "getFragmentComponent").is_empty());
        assert!(dispatch.switch_block(Tier::Activity, "getActivityComponent").is_empty());
    }
}
