//! gatehouse web server.
//!
//! This crate provides the Axum application that gates a protected page
//! behind an OIDC login, with server-side rendered Leptos pages.

#![allow(non_snake_case)]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod pages;

pub use app::{AppState, router};
