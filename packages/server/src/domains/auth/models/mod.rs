pub mod magic_link;

pub use magic_link::MagicLink;
