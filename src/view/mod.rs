//! View state for the listing and detail pages
//!
//! Both views are plain state machines; rendering them to HTML is the job of
//! [`crate::templates`].

mod detail;
mod listing;

pub use detail::{BlockView, DetailView, PostView};
pub use listing::{ListingAction, ListingController, ListingState, LoadOutcome};
