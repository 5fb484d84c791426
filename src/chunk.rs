//! Chunk decoders: the `MThd` header and `MTrk` track chunks

pub mod chunk_types;
pub mod header;
pub mod track;
