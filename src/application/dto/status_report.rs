/// A configuration property that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyError {
    pub property: String,
    pub message: String,
}

/// Enabled state and validation result of one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStatus {
    pub name: String,
    pub enabled: bool,
    pub errors: Vec<PropertyError>,
}

impl ModuleStatus {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, property: impl Into<String>, message: impl Into<String>) {
        self.errors.push(PropertyError {
            property: property.into(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// StatusReport - Structured answer to an administrative status check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub modules: Vec<ModuleStatus>,
}

impl StatusReport {
    pub fn is_valid(&self) -> bool {
        self.modules.iter().all(ModuleStatus::is_valid)
    }

    pub fn module(&self, name: &str) -> Option<&ModuleStatus> {
        self.modules.iter().find(|m| m.name == name)
    }
}
