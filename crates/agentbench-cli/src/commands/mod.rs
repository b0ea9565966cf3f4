pub(crate) mod completions;
pub(crate) mod export;
pub(crate) mod list;
