//! Run Coordinator
//!
//! Drives one generation per processor lifetime: finds the application root,
//! runs discovery and generation for the fragment, activity and application
//! tiers, validates the staged batch and hands it to the filer. Every
//! failure is turned into diagnostics here.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use october_core::{
    Diagnostic, Event, EventBus, OctoberConfig, OctoberError, ProcessingError, Result, Tier,
};
use october_model::{simple_name_of, ElementKind, RoundEnvironment};
use october_writer::{ClassName, Filer, JavaFile};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::annotated::ApplicationDescriptor;
use crate::discovery::{ContainerDiscovery, DiscoveryMap, PresenterBinding, PresenterDiscovery};
use crate::generator::{
    validate_batch, ApplicationGenerator, ChildGenerator, InjectionDispatch, Packages, RoundState, TierProgress,
};
use crate::inspector::Inspector;
use crate::messager::Messager;
use crate::rules::TierRules;
use crate::validator::AnnotationValidator;

/// Generated initializers, keyed by the application class they bootstrap
#[derive(Debug, Default)]
pub struct InitializerRegistry {
    entries: RwLock<IndexMap<String, String>>,
}

impl InitializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the initializer generated for an application class
    pub fn register(&self, application: impl Into<String>, initializer: impl Into<String>) {
        self.entries.write().insert(application.into(), initializer.into());
    }

    /// Qualified name of the initializer for an application class
    pub fn initializer_for(&self, application: &str) -> Option<String> {
        self.entries.read().get(application).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Outcome of one call to [`OctoberProcessor::process`]
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub round: usize,
    /// The round was ignored, either empty or after a successful generation
    pub skipped: bool,
    pub application: Option<String>,
    pub initializer: Option<String>,
    /// Paths handed back by the filer, relative to its root
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn succeeded(&self) -> bool {
        !self.skipped && !self.has_errors() && self.initializer.is_some()
    }
}

/// What a child tier hands to the application tier
struct TierOutcome {
    containers: DiscoveryMap,
    component: ClassName,
    files: Vec<JavaFile>,
    progress: TierProgress,
}

struct Generated {
    application: String,
    initializer: String,
    files: Vec<PathBuf>,
}

/// The annotation processor
pub struct OctoberProcessor {
    config: OctoberConfig,
    /// Application classes already generated for; never cleared
    processed: IndexSet<String>,
    round: usize,
    events: Option<Arc<EventBus>>,
    registry: Arc<InitializerRegistry>,
}

impl OctoberProcessor {
    pub fn new(config: OctoberConfig) -> Self {
        Self {
            config,
            processed: IndexSet::new(),
            round: 0,
            events: None,
            registry: Arc::new(InitializerRegistry::new()),
        }
    }

    /// Publish progress and diagnostics on an event bus
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Record generated initializers in a shared registry
    pub fn with_registry(mut self, registry: Arc<InitializerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &OctoberConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<InitializerRegistry> {
        &self.registry
    }

    /// Qualified names of the annotations this processor claims
    pub fn supported_annotation_types(&self) -> IndexSet<String> {
        self.config
            .framework
            .supported_annotations()
            .iter()
            .map(|annotation| annotation.to_string())
            .collect()
    }

    /// Process a round, claiming whichever supported annotations it carries
    pub fn process_round(&mut self, round: &RoundEnvironment<'_>, filer: &mut dyn Filer) -> GenerationReport {
        let annotations = round.annotations_present(&self.config.framework.supported_annotations());
        self.process(&annotations, round, filer)
    }

    /// Process one round.
    ///
    /// Generation happens at most once per processor; later rounds, and
    /// rounds without any supported annotation, are skipped. Errors never
    /// escape: they are reported as diagnostics in the returned report.
    pub fn process(
        &mut self,
        annotations: &IndexSet<String>,
        round: &RoundEnvironment<'_>,
        filer: &mut dyn Filer,
    ) -> GenerationReport {
        self.round += 1;
        let round_number = self.round;
        self.emit(Event::RoundStarted { round: round_number });

        let mut report = GenerationReport {
            round: round_number,
            ..Default::default()
        };

        if annotations.is_empty() || !self.processed.is_empty() {
            debug!("Round {} skipped", round_number);
            self.emit(Event::RoundSkipped { round: round_number });
            report.skipped = true;
            return report;
        }

        let mut messager = match &self.events {
            Some(events) => Messager::with_events(Arc::clone(events)),
            None => Messager::new(),
        };

        match self.generate(round, filer, &mut messager) {
            Ok(generated) => {
                info!(
                    "Generated {} sources for {}",
                    generated.files.len(),
                    generated.application
                );
                self.registry.register(generated.application.clone(), generated.initializer.clone());
                self.processed.insert(generated.application.clone());
                report.application = Some(generated.application);
                report.initializer = Some(generated.initializer);
                report.files = generated.files;
            }
            Err(OctoberError::Processing(e)) => messager.error(e.message, e.element.as_deref()),
            Err(OctoberError::Validation(e)) => messager.errors(Some(e.element.as_str()), e.messages),
            Err(e) => messager.error(e.user_message(), None),
        }

        report.diagnostics = messager.take();
        self.emit(Event::RoundCompleted {
            round: round_number,
            files: report.files.len(),
            errors: report.error_count(),
        });
        report
    }

    fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    fn generate(
        &self,
        round: &RoundEnvironment<'_>,
        filer: &mut dyn Filer,
        messager: &mut Messager,
    ) -> Result<Generated> {
        let inspector = Inspector::new(round.store());
        let descriptor = self.retrieve_application(round, inspector)?;
        let packages = Packages::new(descriptor.package(), &self.config.naming.namespace);

        let mut staged = Vec::new();
        let mut fragment = self.child_tier(Tier::Fragment, round, inspector, &descriptor, &packages, messager)?;
        staged.append(&mut fragment.files);
        let mut activity = self.child_tier(Tier::Activity, round, inspector, &descriptor, &packages, messager)?;
        staged.append(&mut activity.files);

        messager.note(format!("Processing class {}", descriptor.class.simple_name), None);
        self.emit(Event::ClassProcessed {
            tier: Tier::Application,
            class: descriptor.class.qualified_name.clone(),
        });

        let mut application = TierProgress::new(Tier::Application);
        application.advance(RoundState::ContainersDiscovered)?;
        fragment.progress.require(RoundState::ComponentsEmitted)?;
        activity.progress.require(RoundState::ComponentsEmitted)?;
        application.advance(RoundState::PresentersDiscovered)?;

        let dispatch = InjectionDispatch::new(self.config.naming.inject_method.clone())
            .with_tier(Tier::Activity, activity.component.clone(), &activity.containers)
            .with_tier(Tier::Fragment, fragment.component.clone(), &fragment.containers);
        let generator = ApplicationGenerator::new(&self.config, &packages, &descriptor);
        staged.extend(generator.generate(&dispatch)?);
        application.advance(RoundState::ComponentsEmitted)?;

        validate_batch(&staged, &dispatch)?;

        let mut files = Vec::with_capacity(staged.len());
        for file in &staged {
            let path = filer.write(file).map_err(|e| OctoberError::Emit(e.to_string()))?;
            info!("Generated {}", file.class_name());
            self.emit(Event::FileEmitted {
                package: file.package.clone(),
                name: file.type_spec.name.clone(),
                path: Some(path.clone()),
            });
            files.push(path);
        }

        for progress in [&mut fragment.progress, &mut activity.progress, &mut application] {
            progress.advance(RoundState::Done)?;
        }

        Ok(Generated {
            application: descriptor.class.qualified_name.clone(),
            initializer: generator.initializer_name().canonical_name(),
            files,
        })
    }

    /// The single application root of the round
    fn retrieve_application(
        &self,
        round: &RoundEnvironment<'_>,
        inspector: Inspector<'_>,
    ) -> Result<ApplicationDescriptor> {
        let framework = &self.config.framework;
        let annotation = &framework.application_component;
        let annotation_name = simple_name_of(annotation);

        let elements = round.elements_annotated_with(annotation);
        let element = match elements.as_slice() {
            [] => {
                return Err(ProcessingError::detached(format!(
                    "You must annotate your Application class with @{}",
                    annotation_name
                ))
                .into())
            }
            [element] => *element,
            [_, second, ..] => {
                let found: Vec<String> = elements.iter().map(|e| e.display_name()).collect();
                return Err(ProcessingError::new(
                    second.display_name(),
                    format!(
                        "Only one Application class can be annotated with @{}. Found following classes: [{}]",
                        annotation_name,
                        found.join(", ")
                    ),
                )
                .into());
            }
        };

        let Some(class) = element.as_type().filter(|t| t.kind == ElementKind::Class) else {
            return Err(ProcessingError::new(
                element.display_name(),
                format!("Only classes can be annotated with @{}", annotation_name),
            )
            .into());
        };

        if !inspector.store().validate_element(class) {
            return Err(ProcessingError::new(
                class.qualified_name.clone(),
                "The element class is not valid or inherits from a non valid class, interface or element kind. \
                 Might it be inheriting from a generated class?",
            )
            .into());
        }

        AnnotationValidator::with(inspector, element, annotation_name)
            .inherits_from_class(&framework.application_base)
            .validate()?;

        let mirror = class
            .annotation(annotation)
            .ok_or_else(|| OctoberError::Internal(format!("{} lost its @{}", class.qualified_name, annotation_name)))?;
        Ok(ApplicationDescriptor::new(inspector.store(), class, mirror)?)
    }

    /// Discovery and generation of the activity or fragment tier
    fn child_tier(
        &self,
        tier: Tier,
        round: &RoundEnvironment<'_>,
        inspector: Inspector<'_>,
        descriptor: &ApplicationDescriptor,
        packages: &Packages,
        messager: &mut Messager,
    ) -> Result<TierOutcome> {
        let framework = &self.config.framework;
        let (rules, module) = match tier {
            Tier::Activity => (TierRules::activity(&self.config), &descriptor.activity_module),
            Tier::Fragment => (TierRules::fragment(&self.config), &descriptor.fragment_module),
            Tier::Application => {
                return Err(OctoberError::Internal("the application tier has no containers".to_string()))
            }
        };
        let mut progress = TierProgress::new(tier);

        let container_candidates = round.elements_annotated_with(&rules.container_annotation);
        let scope_candidates = round.elements_annotated_with(&rules.scope_annotation);

        let mut containers = ContainerDiscovery::new(inspector, framework, rules);
        containers.process(&container_candidates, messager)?;
        let containers = containers.into_containers();
        progress.advance(RoundState::ContainersDiscovered)?;

        let mut presenters = PresenterDiscovery::new(inspector, framework, tier)
            .with_policy(self.config.generation.duplicate_presenters);
        presenters.process(&scope_candidates, messager)?;
        let presenters = presenters.into_presenters();
        progress.advance(RoundState::PresentersDiscovered)?;

        self.announce(tier, &containers, &presenters);

        let generator = ChildGenerator::new(&self.config, packages, tier, module)?;
        let artifacts = generator.generate(&containers, &presenters)?;
        progress.advance(RoundState::ComponentsEmitted)?;

        Ok(TierOutcome {
            containers,
            component: generator.component_name(),
            files: artifacts.into_files(),
            progress,
        })
    }

    fn announce(&self, tier: Tier, containers: &DiscoveryMap, presenters: &PresenterBinding) {
        let classes = containers
            .qualified_names()
            .chain(presenters.iter().map(|(_, presenter)| presenter));
        for class in classes {
            self.emit(Event::ClassProcessed {
                tier,
                class: class.to_string(),
            });
        }
    }
}
