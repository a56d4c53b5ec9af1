//! Application Tier Generator
//!
//! The root component and the initializer that builds it at runtime and
//! exposes the whole component graph through one facade.

use october_core::{OctoberConfig, Result, Tier};
use october_writer::code::{name, ty, CodeArg};
use october_writer::{
    AnnotationSpec, ClassName, CodeBlock, FieldSpec, JavaFile, MethodSpec, Modifier, ParameterSpec, TypeName,
    TypeSpec,
};
use tracing::debug;

use super::child::override_annotation;
use super::{class_name, uncapitalize, InjectionDispatch, Packages};
use crate::annotated::ApplicationDescriptor;

/// Facade accessors of the runtime component interface
const APPLICATION_COMPONENT_GETTER: &str = "getOctoberApplicationComponent";
const HELPER_ACTIVITY_GETTER: &str = "getHelperActivityComponent";
const ACTIVITY_INJECTOR_GETTER: &str = "getPresenterActivityInjector";
const FRAGMENT_INJECTOR_GETTER: &str = "getPresenterFragmentInjector";
const ACTIVITY_COMPONENT_GETTER: &str = "getActivityComponent";
const FRAGMENT_COMPONENT_GETTER: &str = "getFragmentComponent";

pub struct ApplicationGenerator<'a> {
    config: &'a OctoberConfig,
    packages: &'a Packages,
    descriptor: &'a ApplicationDescriptor,
}

impl<'a> ApplicationGenerator<'a> {
    pub fn new(config: &'a OctoberConfig, packages: &'a Packages, descriptor: &'a ApplicationDescriptor) -> Self {
        Self {
            config,
            packages,
            descriptor,
        }
    }

    pub fn component_name(&self) -> ClassName {
        ClassName::get(self.packages.component.clone(), self.config.naming.application_component.clone())
    }

    pub fn initializer_name(&self) -> ClassName {
        ClassName::get(self.packages.component.clone(), self.config.naming.initializer.clone())
    }

    fn generated(&self, package: &str, simple_name: &str) -> ClassName {
        ClassName::get(package.to_string(), simple_name.to_string())
    }

    /// Root component and initializer, in emission order
    pub fn generate(&self, dispatch: &InjectionDispatch) -> Result<Vec<JavaFile>> {
        debug!("Generating application tier for {}", self.descriptor.class.qualified_name);
        Ok(vec![self.component()?, self.initializer(dispatch)?])
    }

    /// Singleton component installing the user and base application modules
    pub fn component(&self) -> Result<JavaFile> {
        let framework = &self.config.framework;
        let naming = &self.config.naming;

        let component = AnnotationSpec::new(class_name(&framework.dagger_component)?).add_member(
            "modules",
            "{$T.class, $T.class}",
            vec![
                ty(self.descriptor.application_module.class_name()?),
                ty(class_name(&framework.base_application_module)?),
            ],
        );

        let helper = MethodSpec::new(uncapitalize(&naming.helper_activity_component))
            .add_modifiers(&[Modifier::Public, Modifier::Abstract])
            .returns(self.generated(&self.packages.helper, &naming.helper_activity_component));

        let inject = MethodSpec::new(naming.inject_method.clone())
            .add_modifiers(&[Modifier::Public, Modifier::Abstract])
            .add_parameter(ParameterSpec::new(self.descriptor.class.class_name(), "injector"));

        let spec = TypeSpec::interface(naming.application_component.clone())
            .add_modifiers(&[Modifier::Public])
            .add_annotation(AnnotationSpec::new(class_name(&framework.singleton)?))
            .add_annotation(component)
            .add_superinterface(class_name(&framework.base_application_component)?)
            .add_method(helper)
            .add_method(inject);

        Ok(JavaFile::new(self.packages.component.clone(), spec))
    }

    /// Initializer building the root component and returning the component facade
    pub fn initializer(&self, dispatch: &InjectionDispatch) -> Result<JavaFile> {
        let framework = &self.config.framework;
        let naming = &self.config.naming;

        let application_module = &self.descriptor.application_module;
        let base_application_module = class_name(&framework.base_application_module)?;
        let dagger_component = self.generated(
            &self.packages.component,
            &format!("{}{}", naming.dagger_prefix, naming.application_component),
        );

        let body = CodeBlock::builder()
            .add_statement(
                "final $T application = ($T) app",
                vec![ty(self.descriptor.class.class_name()), ty(self.descriptor.class.class_name())],
            )
            .add_statement(
                "final $T component = $T.builder()\n$>$>.$N(new $T(application))\n.$N(new $T()).build()$<$<",
                vec![
                    ty(self.component_name()),
                    ty(dagger_component),
                    name(uncapitalize(base_application_module.simple_name())),
                    ty(base_application_module.clone()),
                    name(uncapitalize(&application_module.simple_name)),
                    ty(application_module.class_name()?),
                ],
            )
            .add_statement("component.$N(application)", vec![name(naming.inject_method.clone())])
            .add("\n", vec![])
            .add_statement("return $L", vec![CodeArg::Anonymous(Box::new(self.facade(dispatch)?))])
            .build();

        let initialize = MethodSpec::new(naming.initialize_method.clone())
            .add_annotation(override_annotation())
            .add_modifiers(&[Modifier::Public])
            .returns(class_name(&framework.october_component)?)
            .add_parameter(ParameterSpec::new(class_name(&framework.application_base)?, "app"))
            .add_code(body);

        let spec = TypeSpec::class(naming.initializer.clone())
            .add_modifiers(&[Modifier::Public])
            .add_superinterface(class_name(&framework.component_initializer)?)
            .add_method(initialize);

        Ok(JavaFile::new(self.packages.component.clone(), spec))
    }

    /// Anonymous implementation of the component facade
    fn facade(&self, dispatch: &InjectionDispatch) -> Result<TypeSpec> {
        let framework = &self.config.framework;
        let naming = &self.config.naming;

        let activity_component = self.generated(&self.packages.component, &naming.activity_component);
        let fragment_component = self.generated(&self.packages.component, &naming.fragment_component);
        let helper_activity = self.generated(&self.packages.helper, &naming.helper_activity_component);
        let activity_injector = self.generated(&self.packages.di, &naming.presenter_activity_injector);
        let fragment_injector = self.generated(&self.packages.di, &naming.presenter_fragment_injector);

        let getter = |method: String, returns: TypeName, format: &str, args: Vec<CodeArg>| {
            MethodSpec::new(method)
                .add_annotation(override_annotation())
                .add_modifiers(&[Modifier::Public])
                .returns(returns)
                .add_code(CodeBlock::builder().add_statement(format, args).build())
        };
        let setter = |parameter: ClassName, format: &str, args: Vec<CodeArg>| {
            MethodSpec::new(naming.apply_method.clone())
                .add_annotation(override_annotation())
                .add_modifiers(&[Modifier::Public])
                .add_parameter(ParameterSpec::new(parameter, "m"))
                .add_code(CodeBlock::builder().add_statement(format, args).build())
        };
        let injector = |parameter: ClassName, block: CodeBlock| {
            MethodSpec::new(naming.inject_method.clone())
                .add_annotation(override_annotation())
                .add_modifiers(&[Modifier::Public])
                .add_parameter(ParameterSpec::new(parameter, "o"))
                .add_code(block)
        };

        Ok(TypeSpec::anonymous(CodeBlock::default())
            .add_superinterface(class_name(&framework.october_component)?)
            .add_field(FieldSpec::new(activity_component.clone(), "aComponent").add_modifiers(&[Modifier::Private]))
            .add_field(FieldSpec::new(fragment_component.clone(), "fComponent").add_modifiers(&[Modifier::Private]))
            .add_method(getter(
                APPLICATION_COMPONENT_GETTER.to_string(),
                self.component_name().into(),
                "return component",
                vec![],
            ))
            .add_method(getter(
                HELPER_ACTIVITY_GETTER.to_string(),
                helper_activity.into(),
                "return component.$N()",
                vec![name(uncapitalize(&naming.helper_activity_component))],
            ))
            .add_method(getter(
                ACTIVITY_INJECTOR_GETTER.to_string(),
                activity_injector.clone().into(),
                "return new $T()",
                vec![ty(activity_injector)],
            ))
            .add_method(getter(
                FRAGMENT_INJECTOR_GETTER.to_string(),
                fragment_injector.clone().into(),
                "return new $T()",
                vec![ty(fragment_injector)],
            ))
            .add_method(setter(
                class_name(&framework.base_activity_module)?,
                "aComponent = $N().$N(m)",
                vec![name(HELPER_ACTIVITY_GETTER), name(naming.apply_method.clone())],
            ))
            .add_method(setter(
                class_name(&framework.base_fragment_module)?,
                "fComponent = $N().$N().$N(m)",
                vec![
                    name(ACTIVITY_COMPONENT_GETTER),
                    name(uncapitalize(&naming.helper_fragment_component)),
                    name(naming.apply_method.clone()),
                ],
            ))
            .add_method(getter(
                ACTIVITY_COMPONENT_GETTER.to_string(),
                activity_component.into(),
                "return aComponent",
                vec![],
            ))
            .add_method(getter(
                FRAGMENT_COMPONENT_GETTER.to_string(),
                fragment_component.into(),
                "return fComponent",
                vec![],
            ))
            .add_method(injector(
                class_name(&framework.activity_interface)?,
                dispatch.switch_block(Tier::Activity, ACTIVITY_COMPONENT_GETTER),
            ))
            .add_method(injector(
                class_name(&framework.fragment_interface)?,
                dispatch.switch_block(Tier::Fragment, FRAGMENT_COMPONENT_GETTER),
            )))
    }
}
