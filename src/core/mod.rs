//! # Core Stores
//!
//! Business state for Atlas. This module contains domain logic only -
//! no terminal or rendering concerns. The thin CLI shell lives in `cli`.
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!                 │           CORE               │
//!                 │  (this module)               │
//!                 │                              │
//!                 │  • filter    (pure matching) │
//!                 │  • directory (fetch + view)  │
//!                 │  • session   (auth + favs)   │
//!                 │  • storage   (profile JSON)  │
//!                 │  • config    (settings)      │
//!                 └──────────────┬───────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    CLI     │                  │    api     │
//!         │   shell    │                  │  (reqwest) │
//!         └────────────┘                  └────────────┘
//! ```

pub mod config;
pub mod directory;
pub mod filter;
pub mod session;
pub mod storage;
