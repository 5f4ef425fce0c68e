use std::fmt;
use std::str::FromStr;

/// Vulnerability severity as reported by the scanning service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::None => "NONE",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "HIGH" => Ok(Severity::High),
            "MEDIUM" | "MODERATE" => Ok(Severity::Medium),
            "LOW" => Ok(Severity::Low),
            "NONE" | "" => Ok(Severity::None),
            _ => Err(format!("Invalid severity: {}", s)),
        }
    }
}

/// A single vulnerability affecting a component version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vulnerability {
    pub id: String,
    pub severity: Severity,
}

impl Vulnerability {
    pub fn new(id: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            severity,
        }
    }
}

/// Vulnerability counts by severity for one component version.
///
/// Always computed from the full vulnerability list of the component version,
/// so replacing an old aggregate with a new one never double-counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VulnerabilityAggregate {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl VulnerabilityAggregate {
    pub fn new(critical: u32, high: u32, medium: u32, low: u32) -> Self {
        Self {
            critical,
            high,
            medium,
            low,
        }
    }

    pub fn from_vulnerabilities(vulnerabilities: &[Vulnerability]) -> Self {
        let mut aggregate = Self::default();
        for vulnerability in vulnerabilities {
            match vulnerability.severity {
                Severity::Critical => aggregate.critical += 1,
                Severity::High => aggregate.high += 1,
                Severity::Medium => aggregate.medium += 1,
                Severity::Low => aggregate.low += 1,
                Severity::None => {}
            }
        }
        aggregate
    }

    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }
}
