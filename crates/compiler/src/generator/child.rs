//! Child Tier Generator
//!
//! Declarations of the activity and fragment tiers: the presenter injector,
//! the scope component and the helper component building it.

use october_core::{OctoberConfig, OctoberError, Result, Tier};
use october_writer::code::{lit, ty};
use october_writer::{
    AnnotationSpec, ClassName, CodeBlock, FieldSpec, JavaFile, MethodSpec, Modifier, ParameterSpec, TypeName,
    TypeSpec,
};
use tracing::debug;

use super::{class_name, uncapitalize, Packages};
use crate::annotated::ModuleRef;
use crate::discovery::{DiscoveryMap, PresenterBinding};

/// The three declarations of one child tier, in emission order
#[derive(Debug, Clone)]
pub struct TierArtifacts {
    pub injector: JavaFile,
    pub component: JavaFile,
    pub helper: JavaFile,
}

impl TierArtifacts {
    pub fn into_files(self) -> Vec<JavaFile> {
        vec![self.injector, self.component, self.helper]
    }
}

/// Names a child tier reads from the configuration
struct TierNames<'a> {
    injector: &'a str,
    injectable: &'a str,
    component: &'a str,
    helper: &'a str,
    scope: &'a str,
    base_component: &'a str,
    base_helper: &'a str,
    base_module: &'a str,
}

impl<'a> TierNames<'a> {
    fn of(config: &'a OctoberConfig, tier: Tier) -> Result<Self> {
        let (f, n) = (&config.framework, &config.naming);
        match tier {
            Tier::Activity => Ok(Self {
                injector: &n.presenter_activity_injector,
                injectable: &f.presenter_activity_injectable,
                component: &n.activity_component,
                helper: &n.helper_activity_component,
                scope: &f.per_activity,
                base_component: &f.base_activity_component,
                base_helper: &f.base_helper_activity_component,
                base_module: &f.base_activity_module,
            }),
            Tier::Fragment => Ok(Self {
                injector: &n.presenter_fragment_injector,
                injectable: &f.presenter_fragment_injectable,
                component: &n.fragment_component,
                helper: &n.helper_fragment_component,
                scope: &f.per_fragment,
                base_component: &f.base_fragment_component,
                base_helper: &f.base_helper_fragment_component,
                base_module: &f.base_fragment_module,
            }),
            Tier::Application => Err(OctoberError::Internal(
                "the application tier has no child generator".to_string(),
            )),
        }
    }
}

/// Generates the declarations of the activity or the fragment tier
pub struct ChildGenerator<'a> {
    config: &'a OctoberConfig,
    packages: &'a Packages,
    tier: Tier,
    names: TierNames<'a>,
    module: &'a ModuleRef,
}

impl<'a> ChildGenerator<'a> {
    /// `module` is the user module installed in the tier component
    pub fn new(config: &'a OctoberConfig, packages: &'a Packages, tier: Tier, module: &'a ModuleRef) -> Result<Self> {
        Ok(Self {
            config,
            packages,
            tier,
            names: TierNames::of(config, tier)?,
            module,
        })
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Class name of the generated presenter injector
    pub fn injector_name(&self) -> ClassName {
        ClassName::get(self.packages.di.clone(), self.names.injector)
    }

    /// Class name of the generated scope component
    pub fn component_name(&self) -> ClassName {
        ClassName::get(self.packages.component.clone(), self.names.component)
    }

    /// Generate injector, component and helper
    pub fn generate(&self, containers: &DiscoveryMap, presenters: &PresenterBinding) -> Result<TierArtifacts> {
        debug!(
            "Generating {} tier: {} containers, {} presenters",
            self.tier.name(),
            containers.len(),
            presenters.len()
        );
        Ok(TierArtifacts {
            injector: self.injector(presenters)?,
            component: self.component(containers)?,
            helper: self.helper()?,
        })
    }

    /// Injector holding one lazy provider per bound presenter, looked up by contract
    pub fn injector(&self, presenters: &PresenterBinding) -> Result<JavaFile> {
        let naming = &self.config.naming;
        let framework = &self.config.framework;
        let lazy = class_name(&framework.dagger_lazy)?;
        let inject = class_name(&framework.inject)?;

        let mut spec = TypeSpec::class(self.names.injector)
            .add_modifiers(&[Modifier::Public])
            .superclass(class_name(self.names.injectable)?);

        let mut body = CodeBlock::builder();
        for (index, (contract, presenter)) in presenters.iter().enumerate() {
            let member = format!("presenterLazy{}", index + 1);
            spec = spec.add_field(
                FieldSpec::new(
                    TypeName::parameterized(lazy.clone(), vec![class_name(presenter)?.into()]),
                    member.clone(),
                )
                .add_annotation(AnnotationSpec::new(inject.clone())),
            );
            body = body
                .begin_control_flow("if (arg0.equals($T.class))", vec![ty(class_name(contract)?)])
                .add_statement("return $L", vec![lit(member)])
                .end_control_flow();
        }
        body = body.add_statement("return null", vec![]);

        let provide = MethodSpec::new(naming.provide_method.clone())
            .add_annotation(override_annotation())
            .add_modifiers(&[Modifier::Public])
            .add_type_variable("P")
            .returns(TypeName::parameterized(lazy, vec![TypeName::wildcard()]))
            .add_parameter(ParameterSpec::new(
                TypeName::parameterized(ClassName::get("java.lang", "Class"), vec![TypeName::variable("P")]),
                "arg0",
            ))
            .add_code(body.build());

        Ok(JavaFile::new(self.packages.di.clone(), spec.add_method(provide)))
    }

    /// Scope component declaring one injection method per container
    pub fn component(&self, containers: &DiscoveryMap) -> Result<JavaFile> {
        let naming = &self.config.naming;
        let framework = &self.config.framework;

        let subcomponent = AnnotationSpec::new(class_name(&framework.dagger_subcomponent)?).add_member(
            "modules",
            "{$T.class, $T.class}",
            vec![ty(self.module.class_name()?), ty(class_name(self.names.base_module)?)],
        );

        let mut base_arguments: Vec<TypeName> = Vec::new();
        if self.tier == Tier::Activity {
            base_arguments.push(class_name(&framework.base_helper_fragment_component)?.into());
        }
        base_arguments.push(self.injector_name().into());

        let mut spec = TypeSpec::interface(self.names.component)
            .add_modifiers(&[Modifier::Public])
            .add_annotation(AnnotationSpec::new(class_name(self.names.scope)?))
            .add_annotation(subcomponent)
            .add_superinterface(TypeName::parameterized(class_name(self.names.base_component)?, base_arguments));

        if self.tier == Tier::Activity {
            let fragment_helper = ClassName::get(self.packages.helper.clone(), naming.helper_fragment_component.clone());
            spec = spec.add_method(
                MethodSpec::new(uncapitalize(&naming.helper_fragment_component))
                    .add_modifiers(&[Modifier::Public, Modifier::Abstract])
                    .returns(fragment_helper),
            );
        }

        spec = spec.add_method(
            MethodSpec::new(naming.inject_method.clone())
                .add_modifiers(&[Modifier::Public, Modifier::Abstract])
                .add_parameter(ParameterSpec::new(self.injector_name(), "injector")),
        );

        for container in containers.iter() {
            spec = spec.add_method(
                MethodSpec::new(naming.inject_method.clone())
                    .add_modifiers(&[Modifier::Public, Modifier::Abstract])
                    .add_parameter(ParameterSpec::new(container.class_name(), "view")),
            );
        }

        Ok(JavaFile::new(self.packages.component.clone(), spec))
    }

    /// Helper component turning a module instance into the scope component
    pub fn helper(&self) -> Result<JavaFile> {
        let framework = &self.config.framework;

        let apply = MethodSpec::new(self.config.naming.apply_method.clone())
            .add_modifiers(&[Modifier::Public, Modifier::Abstract])
            .add_parameter(ParameterSpec::new(class_name(self.names.base_module)?, "module"))
            .returns(self.component_name());

        let spec = TypeSpec::interface(self.names.helper)
            .add_modifiers(&[Modifier::Public])
            .add_annotation(AnnotationSpec::new(class_name(self.names.scope)?))
            .add_annotation(AnnotationSpec::new(class_name(&framework.dagger_subcomponent)?))
            .add_superinterface(TypeName::parameterized(
                class_name(self.names.base_helper)?,
                vec![class_name(self.names.base_component)?.into()],
            ))
            .add_method(apply);

        Ok(JavaFile::new(self.packages.helper.clone(), spec))
    }
}

pub(crate) fn override_annotation() -> AnnotationSpec {
    AnnotationSpec::new(ClassName::get("java.lang", "Override"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotated::AnnotatedClass;
    use october_core::DuplicatePresenterPolicy;
    use october_model::TypeElement;
    use october_writer::JavaWriter;

    fn module(name: &str) -> ModuleRef {
        ModuleRef {
            qualified_name: name.to_string(),
            simple_name: october_model::simple_name_of(name).to_string(),
        }
    }

    fn render(file: &JavaFile) -> String {
        JavaWriter::new().write_to_string(file).unwrap()
    }

    #[test]
    fn test_fragment_tier() {
        let config = OctoberConfig::default();
        let packages = Packages::new("com.example", "october");
        let module = module("com.example.di.FragmentModule");
        let generator = ChildGenerator::new(&config, &packages, Tier::Fragment, &module).unwrap();

        let mut containers = DiscoveryMap::new();
        containers.insert_if_absent(AnnotatedClass::new(&TypeElement::class("com.example.ui.A")));
        let mut presenters = PresenterBinding::new();
        presenters
            .bind("com.example.ui.IMain", "com.example.ui.MainPresenter", DuplicatePresenterPolicy::LastWins)
            .unwrap();

        let artifacts = generator.generate(&containers, &presenters).unwrap();

        let injector = render(&artifacts.injector);
        assert!(injector.contains("public class PresenterFragmentInjector extends OctoberPresenterFragmentInjectable {"));
        assert!(injector.contains("    @Inject\n    Lazy<MainPresenter> presenterLazy1;\n"));
        assert!(injector.contains("if (arg0.equals(IMain.class)) {\n            return presenterLazy1;\n        }"));

        let component = render(&artifacts.component);
        assert_eq!(
            component,
            "\
package com.example.internal.october.di.component;

import com.example.di.FragmentModule;
import com.example.internal.october.di.PresenterFragmentInjector;
import com.example.ui.A;
import com.kuassivi.october.annotation.PerFragment;
import com.kuassivi.october.di.component.BaseFragmentComponent;
import com.kuassivi.october.di.module.BaseFragmentModule;
import dagger.Subcomponent;

@PerFragment
@Subcomponent(modules = {FragmentModule.class, BaseFragmentModule.class})
public interface OctoberFragmentComponent extends BaseFragmentComponent<PresenterFragmentInjector> {
    void inject(PresenterFragmentInjector injector);

    void inject(A view);
}
"
        );

        let helper = render(&artifacts.helper);
        assert_eq!(artifacts.helper.package, "com.example.internal.october.di.component.helper");
        assert!(helper.contains(
            "public interface HelperFragmentComponent extends BaseHelperFragmentComponent<BaseFragmentComponent> {\n    \
             OctoberFragmentComponent apply(BaseFragmentModule module);\n}\n"
        ));
    }

    #[test]
    fn test_activity_component_links_fragment_helper() {
        let config = OctoberConfig::default();
        let packages = Packages::new("com.example", "october");
        let module = module("com.example.di.ActivityModule");
        let generator = ChildGenerator::new(&config, &packages, Tier::Activity, &module).unwrap();

        let component = generator.component(&DiscoveryMap::new()).unwrap();
        let source = render(&component);
        assert!(source.contains(
            "public interface OctoberActivityComponent extends \
             BaseActivityComponent<BaseHelperFragmentComponent, PresenterActivityInjector> {"
        ));
        assert!(source.contains("    HelperFragmentComponent helperFragmentComponent();\n"));
        assert_eq!(component.type_spec.methods_named("inject").count(), 1);

        let injector = render(&generator.injector(&PresenterBinding::new()).unwrap());
        assert!(injector.contains("    public <P> Lazy<?> provide(Class<P> arg0) {\n        return null;\n    }\n"));
    }

    #[test]
    fn test_application_tier_is_rejected() {
        let config = OctoberConfig::default();
        let packages = Packages::new("com.example", "october");
        let module = module("com.example.di.AppModule");
        assert!(ChildGenerator::new(&config, &packages, Tier::Application, &module).is_err());
    }
}
