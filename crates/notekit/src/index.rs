use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::error::NotekitError;

pub const DEFAULT_ROOT: &str = "./notes";
pub const DEFAULT_OUTPUT: &str = "./tools/index.txt";
pub const DEFAULT_MAX_DEPTH: usize = 1;
pub const DEFAULT_EXTENSION: &str = ".md";

#[derive(Clone, Debug)]
pub struct IndexConfig {
    pub root: PathBuf,
    pub output: PathBuf,
    /// Deepest directory (root = 0) whose files are listed. Directories at
    /// this depth are not descended into.
    pub max_depth: usize,
    /// Literal file name suffix an entry must end with.
    pub extension: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            max_depth: DEFAULT_MAX_DEPTH,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// One line of the index: a root-relative, forward-slash path such as `/sub/b.md`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IndexEntry(String);

impl IndexEntry {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexReport {
    pub root: String,
    pub output: String,
    pub entries: Vec<IndexEntry>,
    /// The index file as read back from disk after writing.
    pub contents: String,
}

/// Collects entries, rewrites the index file, and reads it back.
pub fn build_index(config: &IndexConfig) -> Result<IndexReport, NotekitError> {
    let entries = collect_entries(config)?;
    write_index(&config.output, &entries)?;
    let contents = fs::read_to_string(&config.output).map_err(|err| {
        NotekitError::from(err).context(format!("reading {}", config.output.display()))
    })?;

    tracing::info!(
        entries = entries.len(),
        output = %config.output.display(),
        "index written"
    );

    Ok(IndexReport {
        root: config.root.display().to_string(),
        output: config.output.display().to_string(),
        entries,
        contents,
    })
}

/// Walks `config.root` top-down and returns the matching files in traversal
/// order. Within a directory, files come before subdirectories and siblings
/// are ordered by name.
pub fn collect_entries(config: &IndexConfig) -> Result<Vec<IndexEntry>, NotekitError> {
    match fs::metadata(&config.root) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(root = %config.root.display(), "notes root does not exist");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(NotekitError::from(err)
                .context(format!("reading {}", config.root.display())));
        }
    }

    // A file inside a directory at depth d sits at walk depth d + 1.
    let walker = WalkDir::new(&config.root)
        .min_depth(1)
        .max_depth(config.max_depth.saturating_add(1))
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        });

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry?;
        if is_directory(&entry) {
            if entry.depth() > config.max_depth {
                tracing::debug!(path = %entry.path().display(), "pruned directory");
            }
            continue;
        }
        if matches_extension(&entry, &config.extension) {
            entries.push(IndexEntry(render_entry(&config.root, entry.path())));
        }
    }

    Ok(entries)
}

// Links are not followed, but a link to a directory still counts as one.
fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn matches_extension(entry: &DirEntry, extension: &str) -> bool {
    entry.file_name().to_string_lossy().ends_with(extension)
}

/// Renders `path` relative to `root` with `/` separators and a leading `/`.
pub fn render_entry(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut rendered = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                rendered.push('/');
                rendered.push_str(&part.to_string_lossy());
            }
            Component::ParentDir => rendered.push_str("/.."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    rendered
}

/// Truncates `output` and writes one newline-terminated entry per line.
pub fn write_index(output: &Path, entries: &[IndexEntry]) -> Result<(), NotekitError> {
    let ctx = || format!("writing {}", output.display());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| NotekitError::from(err).context(ctx()))?;
    }

    let file = File::create(output).map_err(|err| NotekitError::from(err).context(ctx()))?;
    let mut writer = BufWriter::new(file);
    for entry in entries {
        writeln!(writer, "{}", entry).map_err(|err| NotekitError::from(err).context(ctx()))?;
    }
    writer
        .flush()
        .map_err(|err| NotekitError::from(err).context(ctx()))?;
    Ok(())
}
