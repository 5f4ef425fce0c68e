use std::fmt;
use std::str::FromStr;

/// Per-path inspection state. PENDING is implied when the property is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InspectionStatus {
    Pending,
    Success,
    Failure,
}

impl InspectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InspectionStatus::Pending => "PENDING",
            InspectionStatus::Success => "SUCCESS",
            InspectionStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InspectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(InspectionStatus::Pending),
            "SUCCESS" => Ok(InspectionStatus::Success),
            "FAILURE" => Ok(InspectionStatus::Failure),
            _ => Err(format!("Invalid inspection status: {}", s)),
        }
    }
}

/// Whether notification polling has advanced a repository past its checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    OutOfDate,
}

impl UpdateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateStatus::UpToDate => "UP_TO_DATE",
            UpdateStatus::OutOfDate => "OUT_OF_DATE",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UP_TO_DATE" => Ok(UpdateStatus::UpToDate),
            "OUT_OF_DATE" => Ok(UpdateStatus::OutOfDate),
            _ => Err(format!("Invalid update status: {}", s)),
        }
    }
}

/// Policy approval status of a component version within a project version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus {
    InViolation,
    InViolationOverridden,
    NotInViolation,
}

impl PolicyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyStatus::InViolation => "IN_VIOLATION",
            PolicyStatus::InViolationOverridden => "IN_VIOLATION_OVERRIDDEN",
            PolicyStatus::NotInViolation => "NOT_IN_VIOLATION",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IN_VIOLATION" => Ok(PolicyStatus::InViolation),
            "IN_VIOLATION_OVERRIDDEN" => Ok(PolicyStatus::InViolationOverridden),
            "NOT_IN_VIOLATION" => Ok(PolicyStatus::NotInViolation),
            _ => Err(format!("Invalid policy status: {}", s)),
        }
    }
}
