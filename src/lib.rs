//! Kampania: natural-language command interpreter for advertising campaigns.
//!
//! Turns operator messages such as "создай кампании для Меты с офферами
//! Финансы и Игры для России и США" into campaign drafts (one per
//! combination of mentioned values), reports which required fields are still
//! missing, and recognises bulk updates like "измени РК на РК-005".
//!
//! An LLM provider is tried first when configured; the deterministic keyword
//! pipeline is always available as a fallback.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bulk_update;
pub mod campaign;
pub mod combinations;
pub mod extractor;
pub mod missing;
pub mod vocabulary;

pub mod config;
pub mod credentials;
pub mod logging;

pub mod interpreter;
pub mod providers;
pub mod session;
