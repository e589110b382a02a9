//! # gymhub-domain
//!
//! Pure domain model for the gymhub website backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **catalog** records (services, trainers, products, news)
//! - Define **training requests** (contact form intake)
//! - Define **users** and their bearer **access tokens**
//! - Describe write payloads as a framework-agnostic [`form::Form`] and
//!   validate them with static per-entity schemas built on [`validation`]
//! - Pagination envelopes shared by every listing
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod form;
pub mod id;
pub mod page;
pub mod time;
pub mod validation;

pub mod news;
pub mod product;
pub mod service;
pub mod stats;
pub mod trainer;
pub mod training_request;
pub mod user;
