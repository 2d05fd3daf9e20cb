pub(crate) mod library;
pub(crate) mod template;
pub(crate) mod thumbnail;
