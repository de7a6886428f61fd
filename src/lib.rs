//! The library code for the `stanza` content engine. The architecture can be
//! generally broken down into three distinct concerns:
//!
//! 1. Loading the post collection from source files on disk ([`crate::post`])
//! 2. Filtering the loaded collection by tag ([`crate::filter`])
//! 3. Producing the site's derived outputs ([`crate::build`]): the
//!    typographic stylesheet ([`crate::theme`]) and the syndication feed
//!    ([`crate::feed`])
//!
//! Of the three, the second is the interesting one. The blog listing exposes
//! a set of tag "chips"; activating a chip narrows the listing to the posts
//! carrying *all* of the active tags, and deactivating it widens the listing
//! again. [`crate::filter::TagFilter`] owns that selection state and the
//! derived view, and guarantees the view is never stale: every toggle
//! recomputes the view before returning.
//!
//! The feed always operates on the full, unfiltered collection; filtering is
//! strictly a presentation-side affair.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod filter;
pub mod post;
pub mod tag;
pub mod theme;
