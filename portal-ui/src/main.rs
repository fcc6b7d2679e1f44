//! Portal Dashboard
//!
//! Browser front-end for the project collaboration portal, built with Leptos
//! (WASM).
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. All behaviour lives in the `portal` crate's dashboard
//! controller; this crate renders its state and forwards user actions.

use leptos::*;

mod api;
mod app;
mod components;
mod dom;
mod pages;
mod session;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
