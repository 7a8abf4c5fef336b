//! Target resolution.
//!
//! Turns a user-supplied path into an ordered, duplicate-free list of
//! compilation units. Absence is never an error: anything that cannot be
//! resolved contributes nothing.

use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::descriptor::{DescriptorKind, ProjectDescriptor, SolutionDescriptor, read_descriptor};
use crate::{HostConfig, HostError};

/// One source file handed to every analysis entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompilationUnit {
    path: PathBuf,
}

impl CompilationUnit {
    /// Creates a unit for `path` as given.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The unit's path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Resolves target paths into compilation units.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    source_extensions: Vec<String>,
    exclude: Option<GlobSet>,
}

impl TargetResolver {
    /// Creates a resolver using the configured extensions and exclude globs.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Config`] if an exclude pattern is not a valid glob.
    pub fn new(config: &HostConfig) -> Result<Self, HostError> {
        Ok(Self {
            source_extensions: config
                .source_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            exclude: Self::build_globset(&config.exclude)?,
        })
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, HostError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| HostError::config(format!("Invalid glob pattern: {}", e)))?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| HostError::config(format!("Failed to build globset: {}", e)))?;

        Ok(Some(globset))
    }

    /// Resolves `path` into compilation units.
    ///
    /// - `.lbsln`: every listed project, in order
    /// - `.lbproj`: the listed sources, in order, globs expanded in place
    /// - directory: every file with a source extension, in file-name order
    /// - any other file: that file, as given
    /// - anything else: nothing
    pub fn resolve(&self, path: impl AsRef<Path>) -> Vec<CompilationUnit> {
        let path = path.as_ref();

        let units = if path.is_dir() {
            self.walk(path)
        } else if path.is_file() {
            match DescriptorKind::of(path) {
                Some(DescriptorKind::Solution) => self.resolve_solution(path),
                Some(DescriptorKind::Project) => self.resolve_project(path),
                None => vec![CompilationUnit::new(path)],
            }
        } else {
            debug!("Target {} does not exist", path.display());
            Vec::new()
        };

        let units = dedup(units);
        debug!(
            "Resolved {} compilation unit(s) from {}",
            units.len(),
            path.display()
        );
        units
    }

    fn resolve_solution(&self, path: &Path) -> Vec<CompilationUnit> {
        let solution: SolutionDescriptor = match read_descriptor(path) {
            Ok(solution) => solution,
            Err(e) => {
                warn!("Skipping solution {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let base = descriptor_dir(path);
        let mut units = Vec::new();
        for project in &solution.projects {
            let project_path = normalize(&base.join(project));
            if !project_path.is_file() {
                warn!(
                    "Project {} listed in {} does not exist",
                    project_path.display(),
                    path.display()
                );
                continue;
            }
            units.extend(self.resolve_project(&project_path));
        }
        units
    }

    fn resolve_project(&self, path: &Path) -> Vec<CompilationUnit> {
        let project: ProjectDescriptor = match read_descriptor(path) {
            Ok(project) => project,
            Err(e) => {
                warn!("Skipping project {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let base = descriptor_dir(path);
        let Some(sources) = project.sources else {
            return self.walk(&base);
        };

        let mut units = Vec::new();
        for entry in &sources {
            if is_glob(entry) {
                units.extend(self.expand_glob(&base, entry));
                continue;
            }

            let source = normalize(&base.join(entry));
            if source.is_file() {
                units.push(CompilationUnit::new(source));
            } else {
                warn!(
                    "Source {} listed in {} does not exist",
                    source.display(),
                    path.display()
                );
            }
        }
        units
    }

    /// Expands one glob entry relative to `base`, in file-name order.
    fn expand_glob(&self, base: &Path, pattern: &str) -> Vec<CompilationUnit> {
        let matcher = match Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher(),
            Err(e) => {
                warn!("Invalid source pattern '{}': {}", pattern, e);
                return Vec::new();
            }
        };

        self.files_under(base)
            .filter(|path| {
                path.strip_prefix(base)
                    .is_ok_and(|relative| matcher.is_match(relative))
            })
            .map(|path| CompilationUnit::new(normalize(&path)))
            .collect()
    }

    /// Walks a directory for files with a source extension.
    fn walk(&self, dir: &Path) -> Vec<CompilationUnit> {
        self.files_under(dir)
            .filter(|path| self.has_source_extension(path))
            .map(|path| CompilationUnit::new(normalize(&path)))
            .collect()
    }

    /// Every non-excluded file under `root`, sorted by file name per directory.
    fn files_under<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded(root, entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
    }

    fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        let Some(exclude) = &self.exclude else {
            return false;
        };
        let relative = path.strip_prefix(root).unwrap_or(path);
        exclude.is_match(relative) || exclude.is_match(path)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.source_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self {
            source_extensions: HostConfig::new().source_extensions,
            exclude: None,
        }
    }
}

/// Directory a descriptor's relative entries are resolved against.
fn descriptor_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '[', '{'])
}

/// Removes `.` components and folds `..` without touching the file system.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Drops path-duplicates, keeping the first occurrence.
fn dedup(units: Vec<CompilationUnit>) -> Vec<CompilationUnit> {
    let mut seen = HashSet::new();
    units
        .into_iter()
        .filter(|unit| seen.insert(unit.path.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("a/./b.rs", "a/b.rs")]
    #[case("a/x/../b.rs", "a/b.rs")]
    #[case("./a.rs", "a.rs")]
    #[case("../a.rs", "../a.rs")]
    #[case("a/../../b.rs", "../b.rs")]
    #[case("/../a.rs", "/a.rs")]
    #[case(".", ".")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(Path::new(input)), PathBuf::from(expected));
    }

    #[rstest]
    #[case("src/**/*.rs", true)]
    #[case("src/?.rs", true)]
    #[case("src/[ab].rs", true)]
    #[case("src/{a,b}.rs", true)]
    #[case("src/lib.rs", false)]
    fn test_is_glob(#[case] entry: &str, #[case] expected: bool) {
        assert_eq!(is_glob(entry), expected);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let units = dedup(vec![
            CompilationUnit::new("b.rs"),
            CompilationUnit::new("a.rs"),
            CompilationUnit::new("b.rs"),
        ]);

        assert_eq!(
            units,
            vec![CompilationUnit::new("b.rs"), CompilationUnit::new("a.rs")]
        );
    }

    #[test]
    fn test_descriptor_dir_of_bare_file_name() {
        assert_eq!(descriptor_dir(Path::new("App.lbsln")), PathBuf::from("."));
        assert_eq!(descriptor_dir(Path::new("x/App.lbsln")), PathBuf::from("x"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = HostConfig {
            exclude: vec!["[invalid".to_string()],
            ..HostConfig::new()
        };
        assert!(matches!(
            TargetResolver::new(&config),
            Err(HostError::Config(_))
        ));
    }

    #[test]
    fn test_source_extensions_accept_leading_dot() {
        let config = HostConfig {
            source_extensions: vec![".cs".to_string()],
            ..HostConfig::new()
        };
        let resolver = TargetResolver::new(&config).unwrap();

        assert!(resolver.has_source_extension(Path::new("a/Program.cs")));
        assert!(resolver.has_source_extension(Path::new("a/Program.CS")));
        assert!(!resolver.has_source_extension(Path::new("a/main.rs")));
    }
}
