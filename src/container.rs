//! Archive container: entry codec, per-version path layout, serializer and parser.

pub(crate) mod codec;
pub(crate) mod layout;
pub(crate) mod reader;
pub(crate) mod writer;
