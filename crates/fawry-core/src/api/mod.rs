//! Gateway clients: the server-side REST client and the browser checkout helpers.

pub mod checkout;
pub mod client;

pub use checkout::{button_html, client_charge_request, ButtonOptions, ButtonRenderer};
pub use client::FawryClient;
