// src/job/input.rs

use serde::Deserialize;

use crate::types::GRID_TARGET_VARIABLE;

/// Category of a release configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Read by the job submission system itself (e.g. `gridTarget`).
    System,
    /// Exported into the job's environment on the infrastructure.
    Infrastructure,
    /// Describes the software the job needs.
    Software,
}

/// One `name = value` entry of a release configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvVariable {
    pub category: Category,
    pub name: String,
    pub value: String,
}

impl EnvVariable {
    pub fn new(category: Category, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Release the executable belongs to, with its configuration entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub name: String,

    /// Maps to `[[job.release.configuration]]` in job files.
    #[serde(default, rename = "configuration")]
    pub configurations: Vec<EnvVariable>,
}

/// Immutable description of one job.
///
/// ```toml
/// [[job]]
/// executable = "echo"
/// parameters = ["hello"]
///
/// [job.release]
/// name = "echo-release"
///
/// [[job.release.configuration]]
/// category = "system"
/// name = "gridTarget"
/// value = "LOCAL"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GaswInput {
    pub executable: String,

    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(default)]
    pub release: Release,
}

impl GaswInput {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            parameters: Vec::new(),
            release: Release::default(),
        }
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    pub fn with_configuration(mut self, variable: EnvVariable) -> Self {
        self.release.configurations.push(variable);
        self
    }

    /// Target named by the SYSTEM `gridTarget` entry, if any.
    ///
    /// When several entries match, the last one wins.
    pub fn target_override(&self) -> Option<&str> {
        self.release
            .configurations
            .iter()
            .filter(|v| v.category == Category::System && v.name == GRID_TARGET_VARIABLE)
            .map(|v| v.value.as_str())
            .last()
    }

    /// Shell command line for backends that run the job through `sh -c`.
    pub fn command_line(&self) -> String {
        let mut line = self.executable.clone();
        for p in &self.parameters {
            line.push(' ');
            line.push_str(p);
        }
        line
    }
}

/// Top-level shape of a job file: a list of `[[job]]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub job: Vec<GaswInput>,
}
