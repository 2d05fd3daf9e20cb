pub(crate) mod backend;
pub(crate) mod compile;
pub(crate) mod cpu;
pub(crate) mod marker;
pub(crate) mod plan;
