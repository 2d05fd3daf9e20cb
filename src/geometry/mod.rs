pub(crate) mod alpha;
pub(crate) mod offset;
pub(crate) mod panel;
pub(crate) mod polygon;
