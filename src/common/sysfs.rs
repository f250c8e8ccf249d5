use crate::metrics::{Record, Snapshot};

use walkdir::{DirEntry, WalkDir};

use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

/// Handle on a mounted sysfs tree.
#[derive(Debug, Clone)]
pub struct SysFs {
    root: PathBuf,
}

impl SysFs {
    /// Opens the sysfs tree mounted at `path`. Fails if `path` is not an
    /// existing directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, Error> {
        let root = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&root)?;

        if !metadata.is_dir() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads `devices/system/node/node<N>/<file>` for every NUMA node and
    /// parses each one into a record.
    pub fn node_records<R: Record>(&self, file: &str) -> Result<Snapshot<R>, Error> {
        let mut snapshot = Snapshot::new();

        for (id, dir) in self.nodes()? {
            let path = dir.join(file);
            let content = std::fs::read_to_string(&path)
                .map_err(|e| Error::new(e.kind(), format!("{}: {e}", path.display())))?;

            let record = parse_record(&content)
                .map_err(|e| Error::new(e.kind(), format!("{}: {e}", path.display())))?;

            snapshot.insert(id, record);
        }

        Ok(snapshot)
    }

    /// Returns the id and directory of every `node<N>` entry.
    fn nodes(&self) -> Result<Vec<(usize, PathBuf)>, Error> {
        let base = self.root.join("devices/system/node");
        let mut nodes = Vec::new();

        let walker = WalkDir::new(&base)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .into_iter();

        for entry in walker.filter_entry(|e| !is_hidden(e)) {
            let entry = entry.map_err(Error::from)?;

            if !entry.file_type().is_dir() {
                continue;
            }

            if let Some(id) = entry.file_name().to_str().and_then(node_id) {
                nodes.push((id, entry.into_path()));
            }
        }

        Ok(nodes)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Parses the id out of a `node<N>` directory name.
fn node_id(name: &str) -> Option<usize> {
    let digits = name.strip_prefix("node")?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

/// Parses `key value` lines into a record. Keys the record does not know are
/// skipped and fields missing from the input stay zero.
pub fn parse_record<R: Record>(content: &str) -> Result<R, Error> {
    let mut record = R::default();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            [] => continue,
            [key, value] => {
                let value: u64 = value
                    .parse()
                    .map_err(|_| Error::other(format!("could not parse value for {key}: {value}")))?;

                record.set(key, value);
            }
            _ => {
                return Err(Error::other(format!("malformed line: {line}")));
            }
        }
    }

    Ok(record)
}
