use super::coordinate::Forge;

/// Where a manifest carrying the true name/version of an artifact can be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSource {
    /// `composer.json` stored next to the artifact
    ComposerJson,
}

impl ManifestSource {
    pub fn file_name(self) -> &'static str {
        match self {
            ManifestSource::ComposerJson => "composer.json",
        }
    }
}

/// Package types the resolver knows how to identify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedPackageType {
    Bower,
    CocoaPods,
    Composer,
    Conda,
    Cran,
    Gems,
    Go,
    Gradle,
    Maven,
    Npm,
    Nuget,
    Pypi,
}

impl SupportedPackageType {
    /// Maps the repository manager's package type string (case-insensitive)
    pub fn from_package_type(package_type: &str) -> Option<Self> {
        match package_type.to_lowercase().as_str() {
            "bower" => Some(Self::Bower),
            "cocoapods" => Some(Self::CocoaPods),
            "composer" => Some(Self::Composer),
            "conda" => Some(Self::Conda),
            "cran" => Some(Self::Cran),
            "gems" => Some(Self::Gems),
            "go" => Some(Self::Go),
            "gradle" => Some(Self::Gradle),
            "maven" => Some(Self::Maven),
            "npm" => Some(Self::Npm),
            "nuget" => Some(Self::Nuget),
            "pypi" => Some(Self::Pypi),
            _ => None,
        }
    }

    pub fn forge(self) -> Forge {
        match self {
            Self::Bower => Forge::Bower,
            Self::CocoaPods => Forge::CocoaPods,
            Self::Composer => Forge::Packagist,
            Self::Conda => Forge::Anaconda,
            Self::Cran => Forge::Cran,
            Self::Gems => Forge::RubyGems,
            Self::Go => Forge::Golang,
            Self::Gradle | Self::Maven => Forge::Maven,
            Self::Npm => Forge::Npmjs,
            Self::Nuget => Forge::Nuget,
            Self::Pypi => Forge::Pypi,
        }
    }

    /// Property keys the repository manager writes for name and version, if any
    pub fn name_version_properties(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Bower => Some(("bower.name", "bower.version")),
            Self::CocoaPods => Some(("pods.name", "pods.version")),
            Self::Conda => Some(("conda.name", "conda.version")),
            Self::Cran => Some(("cran.name", "cran.version")),
            Self::Gems => Some(("gem.name", "gem.version")),
            Self::Go => Some(("go.name", "go.version")),
            Self::Npm => Some(("npm.name", "npm.version")),
            Self::Nuget => Some(("nuget.id", "nuget.version")),
            Self::Pypi => Some(("pypi.name", "pypi.version")),
            // Composer properties are written from the archive name and are unreliable
            Self::Composer | Self::Gradle | Self::Maven => None,
        }
    }

    /// Manifest to inspect when repository properties cannot be trusted
    pub fn manifest(self) -> Option<ManifestSource> {
        match self {
            Self::Composer => Some(ManifestSource::ComposerJson),
            _ => None,
        }
    }
}
