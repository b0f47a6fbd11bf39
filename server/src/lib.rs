//! # Atlas
//!
//! A small multi-user "countries visited" tracker. Travelers pick a profile,
//! submit free-text country names which are resolved to ISO codes by fuzzy
//! lookup, and view an aggregate page of their visits.
//!
//! The crate splits into three layers: [`db`] holds the storage trait and its
//! backend clients, [`web`] holds the router and request handlers, and
//! [`views`] renders the HTML pages the handlers return.

pub mod db;
pub mod models;
pub mod views;
pub mod web;
