//! Static lookup tables

pub mod transliteration;
