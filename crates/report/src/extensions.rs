use tracing::debug;

/// The two ways a rendering API can expose its extensions.
///
/// The bulk string is the legacy/ES contract (`glGetString(GL_EXTENSIONS)`);
/// the indexed table is the core-profile contract (`GL_NUM_EXTENSIONS` plus
/// `glGetStringi`).
pub trait ExtensionSource {
    /// Space-separated extension string, if the runtime provides one.
    fn bulk_extensions(&self) -> Option<String>;

    /// Number of entries in the indexed table, if the table is supported.
    fn extension_count(&self) -> Option<usize>;

    /// Entry `index` of the indexed table. `None` for a null entry.
    fn extension_at(&self, index: usize) -> Option<String>;
}

/// Mechanism that produced an [`ExtensionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumerationPath {
    Bulk,
    Indexed,
    #[default]
    Unavailable,
}

/// Extension names in source order. Duplicates from the source are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    names: Vec<String>,
    path: EnumerationPath,
}

impl ExtensionSet {
    pub fn new(names: Vec<String>, path: EnumerationPath) -> Self {
        Self { names, path }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn path(&self) -> EnumerationPath {
        self.path
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Split a bulk extension string on single spaces, dropping empty tokens.
pub fn tokenize(bulk: &str) -> Vec<String> {
    bulk.split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Produce the ordered extension list of `source`.
///
/// A non-empty bulk string always wins and the indexed table is then never
/// consulted. Otherwise the indexed table is walked in index order, skipping
/// null entries. An empty result means neither mechanism yielded anything.
pub fn enumerate_extensions<S: ExtensionSource + ?Sized>(source: &S) -> ExtensionSet {
    if let Some(bulk) = source.bulk_extensions() {
        let names = tokenize(&bulk);
        if !names.is_empty() {
            debug!(count = names.len(), "extensions from bulk string");
            return ExtensionSet::new(names, EnumerationPath::Bulk);
        }
    }

    let Some(count) = source.extension_count() else {
        debug!("no indexed extension table");
        return ExtensionSet::default();
    };

    let names: Vec<String> = (0..count)
        .filter_map(|index| source.extension_at(index))
        .collect();
    debug!(count, found = names.len(), "extensions from indexed table");

    if names.is_empty() {
        ExtensionSet::default()
    } else {
        ExtensionSet::new(names, EnumerationPath::Indexed)
    }
}
