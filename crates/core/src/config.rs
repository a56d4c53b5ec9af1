//! Generator Configuration
//!
//! Manages every name the generator recognizes or emits:
//! - Framework base classes, contract interfaces and marker annotations
//! - Names of the generated components, helpers and injectors
//! - Generation policies (duplicate presenters, indentation, output directory)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{OctoberError, Result};

/// Name of the per-project configuration file
pub const CONFIG_FILE_NAME: &str = "october.toml";

/// Qualified names of the framework types the generator works against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkNames {
    /// Android application base class
    pub application_base: String,
    /// Activity container base
    pub activity_base: String,
    /// AppCompat activity container base
    pub compat_activity_base: String,
    /// Fragment container base
    pub fragment_base: String,
    /// Presenter base class
    pub presenter_base: String,
    /// Contract interface every presenter must declare
    pub presentable: String,
    /// Contract interface implemented by views
    pub viewable: String,

    /// Marker annotation for the application root
    pub application_component: String,
    /// Marker annotation for activity-like containers
    pub activity_component: String,
    /// Marker annotation for fragment-like containers
    pub fragment_component: String,
    /// Marker annotation for per-activity scoped classes
    pub per_activity: String,
    /// Marker annotation for per-fragment scoped classes
    pub per_fragment: String,

    pub base_application_component: String,
    pub base_activity_component: String,
    pub base_fragment_component: String,
    pub base_helper_activity_component: String,
    pub base_helper_fragment_component: String,
    pub base_application_module: String,
    pub base_activity_module: String,
    pub base_fragment_module: String,
    pub presenter_activity_injectable: String,
    pub presenter_fragment_injectable: String,
    pub october_component: String,
    pub component_initializer: String,
    pub activity_interface: String,
    pub fragment_interface: String,

    pub dagger_component: String,
    pub dagger_subcomponent: String,
    pub dagger_lazy: String,
    pub inject: String,
    pub singleton: String,
}

impl Default for FrameworkNames {
    fn default() -> Self {
        Self {
            application_base: "android.app.Application".to_string(),
            activity_base: "com.kuassivi.october.mvp.OctoberActivity".to_string(),
            compat_activity_base: "com.kuassivi.october.mvp.OctoberCompatActivity".to_string(),
            fragment_base: "com.kuassivi.october.mvp.OctoberFragment".to_string(),
            presenter_base: "com.kuassivi.october.mvp.OctoberPresenter".to_string(),
            presentable: "com.kuassivi.october.mvp.contract.Presentable".to_string(),
            viewable: "com.kuassivi.october.mvp.contract.Viewable".to_string(),

            application_component: "com.kuassivi.october.annotation.ApplicationComponent".to_string(),
            activity_component: "com.kuassivi.october.annotation.ActivityComponent".to_string(),
            fragment_component: "com.kuassivi.october.annotation.FragmentComponent".to_string(),
            per_activity: "com.kuassivi.october.annotation.PerActivity".to_string(),
            per_fragment: "com.kuassivi.october.annotation.PerFragment".to_string(),

            base_application_component: "com.kuassivi.october.di.component.BaseApplicationComponent".to_string(),
            base_activity_component: "com.kuassivi.october.di.component.BaseActivityComponent".to_string(),
            base_fragment_component: "com.kuassivi.october.di.component.BaseFragmentComponent".to_string(),
            base_helper_activity_component: "com.kuassivi.october.di.component.internal.BaseHelperActivityComponent".to_string(),
            base_helper_fragment_component: "com.kuassivi.october.di.component.internal.BaseHelperFragmentComponent".to_string(),
            base_application_module: "com.kuassivi.october.di.module.BaseApplicationModule".to_string(),
            base_activity_module: "com.kuassivi.october.di.module.BaseActivityModule".to_string(),
            base_fragment_module: "com.kuassivi.october.di.module.BaseFragmentModule".to_string(),
            presenter_activity_injectable: "com.kuassivi.october.di.OctoberPresenterActivityInjectable".to_string(),
            presenter_fragment_injectable: "com.kuassivi.october.di.OctoberPresenterFragmentInjectable".to_string(),
            october_component: "com.kuassivi.october.OctoberComponent".to_string(),
            component_initializer: "com.kuassivi.october.OctoberComponentInitializer".to_string(),
            activity_interface: "com.kuassivi.october.mvp.OctoberActivityInterface".to_string(),
            fragment_interface: "com.kuassivi.october.mvp.OctoberFragmentInterface".to_string(),

            dagger_component: "dagger.Component".to_string(),
            dagger_subcomponent: "dagger.Subcomponent".to_string(),
            dagger_lazy: "dagger.Lazy".to_string(),
            inject: "javax.inject.Inject".to_string(),
            singleton: "javax.inject.Singleton".to_string(),
        }
    }
}

impl FrameworkNames {
    /// The five marker annotations the processor claims
    pub fn supported_annotations(&self) -> [&str; 5] {
        [
            self.application_component.as_str(),
            self.activity_component.as_str(),
            self.fragment_component.as_str(),
            self.per_activity.as_str(),
            self.per_fragment.as_str(),
        ]
    }
}

/// Names of generated types and methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Namespace segment in `<app package>.internal.<namespace>.di`
    pub namespace: String,
    /// Prefix dagger puts on generated component implementations
    pub dagger_prefix: String,
    pub application_component: String,
    pub activity_component: String,
    pub fragment_component: String,
    pub helper_activity_component: String,
    pub helper_fragment_component: String,
    pub presenter_activity_injector: String,
    pub presenter_fragment_injector: String,
    pub initializer: String,
    /// Injection entry point method on every component
    pub inject_method: String,
    /// Helper method applying a module instance
    pub apply_method: String,
    /// Presenter lookup method on the injectors
    pub provide_method: String,
    /// Initializer entry point
    pub initialize_method: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            namespace: "october".to_string(),
            dagger_prefix: "Dagger".to_string(),
            application_component: "OctoberApplicationComponent".to_string(),
            activity_component: "OctoberActivityComponent".to_string(),
            fragment_component: "OctoberFragmentComponent".to_string(),
            helper_activity_component: "HelperActivityComponent".to_string(),
            helper_fragment_component: "HelperFragmentComponent".to_string(),
            presenter_activity_injector: "PresenterActivityInjector".to_string(),
            presenter_fragment_injector: "PresenterFragmentInjector".to_string(),
            initializer: "OctoberInitializer".to_string(),
            inject_method: "inject".to_string(),
            apply_method: "apply".to_string(),
            provide_method: "provide".to_string(),
            initialize_method: "initialize".to_string(),
        }
    }
}

/// What happens when two presenters declare the same contract interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePresenterPolicy {
    /// The most recently discovered presenter replaces the earlier binding
    #[default]
    LastWins,
    /// The first discovered presenter keeps the binding
    FirstWins,
    /// A second binding is a processing error
    Reject,
}

/// Generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub duplicate_presenters: DuplicatePresenterPolicy,
    /// Spaces per indentation level in generated sources
    pub indent: usize,
    /// Output directory, relative to the project root
    pub output_dir: PathBuf,
    /// Declaration index, relative to the project root
    pub index_file: PathBuf,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            duplicate_presenters: DuplicatePresenterPolicy::default(),
            indent: 4,
            output_dir: PathBuf::from("build/generated/source/october"),
            index_file: PathBuf::from("october-index.toml"),
        }
    }
}

/// Main generator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctoberConfig {
    pub framework: FrameworkNames,
    pub naming: NamingConfig,
    pub generation: GenerationConfig,
}

impl OctoberConfig {
    /// Get the user-level configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "kuassivi", "October")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the user-level configuration file path
    pub fn user_config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Parse a configuration document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: OctoberConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration for a project.
    ///
    /// Looks for `october.toml` in the project root, then in the user config
    /// directory, and falls back to defaults.
    pub async fn load(project_root: impl AsRef<Path>) -> Result<Self> {
        let project_file = project_root.as_ref().join(CONFIG_FILE_NAME);
        let candidates = std::iter::once(project_file).chain(Self::user_config_file());

        for path in candidates {
            if tokio::fs::try_exists(&path).await? {
                debug!("Loading config from {:?}", path);
                let contents = tokio::fs::read_to_string(&path).await?;
                return Self::from_toml_str(&contents);
            }
        }

        info!("Config file not found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Reject configurations that would produce unusable output
    pub fn validate(&self) -> Result<()> {
        let naming = &self.naming;
        let required = [
            ("naming.namespace", &naming.namespace),
            ("naming.application_component", &naming.application_component),
            ("naming.activity_component", &naming.activity_component),
            ("naming.fragment_component", &naming.fragment_component),
            ("naming.helper_activity_component", &naming.helper_activity_component),
            ("naming.helper_fragment_component", &naming.helper_fragment_component),
            ("naming.presenter_activity_injector", &naming.presenter_activity_injector),
            ("naming.presenter_fragment_injector", &naming.presenter_fragment_injector),
            ("naming.initializer", &naming.initializer),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(OctoberError::Config(format!("{} must not be empty", key)));
            }
        }

        // These name methods of the runtime interfaces the generated code implements
        let defaults = NamingConfig::default();
        let fixed = [
            ("naming.inject_method", &naming.inject_method, &defaults.inject_method),
            ("naming.apply_method", &naming.apply_method, &defaults.apply_method),
            ("naming.provide_method", &naming.provide_method, &defaults.provide_method),
            ("naming.initialize_method", &naming.initialize_method, &defaults.initialize_method),
        ];
        for (key, value, expected) in fixed {
            if value != expected {
                return Err(OctoberError::Config(format!(
                    "{} must be \"{}\" to match the runtime library, found \"{}\"",
                    key, expected, value
                )));
            }
        }
        if self.generation.indent == 0 {
            return Err(OctoberError::Config("generation.indent must be at least 1".into()));
        }
        Ok(())
    }
}
