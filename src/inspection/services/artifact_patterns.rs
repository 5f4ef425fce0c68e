use crate::shared::Result;

/// Maximum number of patterns per package type
const MAX_PATTERNS: usize = 64;

/// Maximum length of a single pattern
const MAX_PATTERN_LENGTH: usize = 255;

/// ArtifactPatterns - Matches artifact file names against configured wildcard patterns
///
/// Supports `*` matching zero or more characters. Matching is case-sensitive
/// and applies to the file name only, never to the folder path.
#[derive(Debug, Clone)]
pub struct ArtifactPatterns {
    patterns: Vec<FilePattern>,
}

impl ArtifactPatterns {
    /// Compiles raw pattern strings (e.g. `*.jar`, `lib-*.tgz`)
    ///
    /// # Errors
    /// - Too many patterns (> MAX_PATTERNS)
    /// - Empty, over-long, or path-bearing patterns
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.len() > MAX_PATTERNS {
            anyhow::bail!(
                "Too many artifact patterns: {} (maximum: {})",
                patterns.len(),
                MAX_PATTERNS
            );
        }

        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            validate_pattern(pattern)?;
            compiled.push(FilePattern {
                original: pattern.clone(),
                matcher: compile_pattern(pattern),
            });
        }

        Ok(Self { patterns: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks whether a file name matches any pattern
    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matcher.matches(file_name))
    }

    /// The patterns as configured, for search queries against the host store
    pub fn originals(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.original.clone()).collect()
    }
}

#[derive(Debug, Clone)]
struct FilePattern {
    original: String,
    matcher: PatternMatcher,
}

/// Pattern matcher types for efficient matching
#[derive(Debug, Clone)]
enum PatternMatcher {
    /// Exact match: "file.jar"
    Exact(String),
    /// Leading wildcard: "*.jar"
    EndsWith(String),
    /// Trailing wildcard: "lib-*"
    StartsWith(String),
    /// Anything else: parts must appear in order, anchored where the pattern has no wildcard
    Segments {
        parts: Vec<String>,
        anchored_start: bool,
        anchored_end: bool,
    },
}

impl PatternMatcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            PatternMatcher::Exact(s) => name == s,
            PatternMatcher::EndsWith(suffix) => name.ends_with(suffix),
            PatternMatcher::StartsWith(prefix) => name.starts_with(prefix),
            PatternMatcher::Segments {
                parts,
                anchored_start,
                anchored_end,
            } => match_segments(name, parts, *anchored_start, *anchored_end),
        }
    }
}

fn match_segments(name: &str, parts: &[String], anchored_start: bool, anchored_end: bool) -> bool {
    let mut remaining = name;

    for (index, part) in parts.iter().enumerate() {
        let is_first = index == 0;
        let is_last = index == parts.len() - 1;

        if is_first && anchored_start {
            match remaining.strip_prefix(part.as_str()) {
                Some(rest) => remaining = rest,
                None => return false,
            }
        } else if is_last && anchored_end {
            return remaining.ends_with(part.as_str());
        } else {
            match remaining.find(part.as_str()) {
                Some(pos) => remaining = &remaining[pos + part.len()..],
                None => return false,
            }
        }
    }

    !anchored_end || remaining.is_empty() || parts.is_empty()
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        anyhow::bail!("Artifact pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Artifact pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    if pattern.contains('/') || pattern.contains('\\') {
        anyhow::bail!(
            "Artifact pattern '{}' contains a path separator. Patterns match file names only.",
            pattern
        );
    }

    Ok(())
}

fn compile_pattern(pattern: &str) -> PatternMatcher {
    let wildcard_count = pattern.matches('*').count();

    if wildcard_count == 0 {
        return PatternMatcher::Exact(pattern.to_string());
    }

    if wildcard_count == 1 {
        if let Some(stripped) = pattern.strip_prefix('*') {
            return PatternMatcher::EndsWith(stripped.to_string());
        }
        if let Some(stripped) = pattern.strip_suffix('*') {
            return PatternMatcher::StartsWith(stripped.to_string());
        }
    }

    PatternMatcher::Segments {
        parts: pattern
            .split('*')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect(),
        anchored_start: !pattern.starts_with('*'),
        anchored_end: !pattern.ends_with('*'),
    }
}
