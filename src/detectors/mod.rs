// MarkWarden data-quality detectors
// Pure analyses over the bookmark list/tree: duplicates, dead links (driven
// through the validity cache), and empty folders.

pub mod dead_links;
pub mod duplicates;
pub mod empty_folders;
pub mod url_normalizer;
