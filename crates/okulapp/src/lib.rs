//! # okulapp
//!
//! Content model and admin operations for a school website. Every public page
//! is a fixed list of named sections. Admins edit those sections, manage the
//! entity lists some pages show (teachers, events, gallery, ...), and visitors
//! see the rendered result with built-in copy filling any gaps.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients (the `okul` CLI, tests)                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Parses pages, kinds and field assignments                │
//! │  - Gates writes on the admin session                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*)                                 │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core                                                       │
//! │  - registry: pages and their sections                       │
//! │  - content: typed section content and its stored encoding   │
//! │  - sections / editor: page document writes, editing session │
//! │  - entities: collection schemas and CRUD                    │
//! │  - render: public page view with defaults                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/*, media/*)                                 │
//! │  - DocumentStore: collections of JSON documents             │
//! │  - MediaStore: uploaded images                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate writes to stdout or exits the process. Diagnostics go
//! through `tracing`; installing a subscriber is the client's job.

pub mod api;
pub mod commands;
pub mod config;
pub mod content;
pub mod editor;
pub mod entities;
pub mod error;
pub mod init;
pub mod media;
pub mod model;
pub mod registry;
pub mod render;
pub mod sections;
pub mod session;
pub mod store;
