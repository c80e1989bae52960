pub mod backend;
pub mod glyphs;
pub mod words;

#[cfg(test)]
pub(crate) mod testing;
