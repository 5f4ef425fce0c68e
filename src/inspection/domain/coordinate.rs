use std::fmt;
use std::str::FromStr;

/// Ecosystem namespace a component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Forge {
    Anaconda,
    Bower,
    CocoaPods,
    Cran,
    Golang,
    Maven,
    Npmjs,
    Nuget,
    Packagist,
    Pypi,
    RubyGems,
}

impl Forge {
    pub fn name(self) -> &'static str {
        match self {
            Forge::Anaconda => "anaconda",
            Forge::Bower => "bower",
            Forge::CocoaPods => "cocoapods",
            Forge::Cran => "cran",
            Forge::Golang => "golang",
            Forge::Maven => "maven",
            Forge::Npmjs => "npmjs",
            Forge::Nuget => "nuget",
            Forge::Packagist => "packagist",
            Forge::Pypi => "pypi",
            Forge::RubyGems => "rubygems",
        }
    }

    /// Separator between the pieces of an origin id in this forge
    pub fn separator(self) -> &'static str {
        match self {
            Forge::Maven | Forge::Packagist => ":",
            Forge::Npmjs => "@",
            _ => "/",
        }
    }
}

impl fmt::Display for Forge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Forge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anaconda" => Ok(Forge::Anaconda),
            "bower" => Ok(Forge::Bower),
            "cocoapods" => Ok(Forge::CocoaPods),
            "cran" => Ok(Forge::Cran),
            "golang" => Ok(Forge::Golang),
            "maven" => Ok(Forge::Maven),
            "npmjs" => Ok(Forge::Npmjs),
            "nuget" => Ok(Forge::Nuget),
            "packagist" => Ok(Forge::Packagist),
            "pypi" => Ok(Forge::Pypi),
            "rubygems" => Ok(Forge::RubyGems),
            _ => Err(format!("Unknown forge: {}", s)),
        }
    }
}

/// Canonical component coordinate: forge + (group) + name + version
///
/// A coordinate is never partially valid. Every constructor returns `None`
/// when a required piece is blank, so holders of a `Coordinate` can rely on
/// all fields being populated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    forge: Forge,
    group: Option<String>,
    name: String,
    version: String,
}

impl Coordinate {
    /// Two-part name/version coordinate
    pub fn name_version(forge: Forge, name: &str, version: &str) -> Option<Self> {
        let name = non_blank(name)?;
        let version = non_blank(version)?;
        Some(Self {
            forge,
            group: None,
            name,
            version,
        })
    }

    /// Three-part Maven coordinate (group/name/version)
    pub fn maven(group: &str, name: &str, version: &str) -> Option<Self> {
        let group = non_blank(group)?;
        let name = non_blank(name)?;
        let version = non_blank(version)?;
        Some(Self {
            forge: Forge::Maven,
            group: Some(group),
            name,
            version,
        })
    }

    /// Rebuilds a coordinate from a persisted forge + origin id pair.
    ///
    /// Maven ids carry three pieces; every other forge splits on the last
    /// separator so names containing it (`@scope/pkg`, Go module paths) survive.
    pub fn from_origin_id(forge: Forge, origin_id: &str) -> Option<Self> {
        let separator = forge.separator();
        if forge == Forge::Maven {
            let pieces: Vec<&str> = origin_id.split(separator).collect();
            return match pieces.as_slice() {
                [group, name, version] => Self::maven(group, name, version),
                _ => None,
            };
        }
        let (name, version) = origin_id.rsplit_once(separator)?;
        Self::name_version(forge, name, version)
    }

    pub fn forge(&self) -> Forge {
        self.forge
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The scanning service's identifier for this component version
    pub fn origin_id(&self) -> String {
        let separator = self.forge.separator();
        match &self.group {
            Some(group) => format!(
                "{}{}{}{}{}",
                group, separator, self.name, separator, self.version
            ),
            None => format!("{}{}{}", self.name, separator, self.version),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.forge, self.origin_id())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
