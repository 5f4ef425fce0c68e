pub mod aggregate;
pub mod component;
pub mod coordinate;
pub mod notification;
pub mod package_type;
pub mod property;
pub mod repo_path;
pub mod status;
pub mod vulnerability;

pub use aggregate::PolicyVulnerabilityAggregate;
pub use component::{BomComponent, ComponentVersion, Origin, ProjectVersion};
pub use coordinate::{Coordinate, Forge};
pub use notification::{
    NameVersion, Notification, PolicyStatusNotification, VulnerabilityNotification,
};
pub use package_type::{ManifestSource, SupportedPackageType};
pub use property::{InspectionProperty, PROPERTY_PREFIX};
pub use repo_path::RepoPath;
pub use status::{InspectionStatus, PolicyStatus, UpdateStatus};
pub use vulnerability::{Severity, Vulnerability, VulnerabilityAggregate};
