pub(crate) mod blend;
pub mod font;
pub mod frame;
pub mod glyphs;
pub mod text;
