pub mod auth;
pub mod catalog;
pub mod mitigation;
pub mod models;
pub mod navigation;
pub mod phase_view;
pub mod risk;
