//! Tax profiles, standard GST slabs and rate resolution

pub mod gst;
pub mod profile;
pub mod resolver;

pub use gst::*;
pub use profile::*;
pub use resolver::*;
