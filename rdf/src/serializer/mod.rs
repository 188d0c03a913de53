//! Serializers for resource graphs.
//!
//! Only Turtle ([`turtle`]) is needed: rewritten description files are
//! written back in the notation they were read in.

pub mod turtle;
