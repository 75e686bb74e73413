//! # harmonia
//!
//! A Rust web service for music discovery. It fronts two external
//! collaborators — a taste/recommendation search API and a generative-text
//! API — and combines them into discovery, recommendation, trending, mood,
//! playlist, profile, and story endpoints.
//!
//! ## Architecture
//!
//! Every discovery-style endpoint runs the same fan-out/merge pipeline:
//!
//! ```text
//!                      ┌──────────────┐
//!                      │ Feature input │
//!                      └──────┬────────┘
//!                             │ query plan (fixed phrasing tables)
//!          ┌──────────────────┼──────────────────┐
//!          ▼                  ▼                  ▼
//!   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!   │  search q1   │    │  search q2  │    │  search qN  │
//!   │ rate-limited │    │   cached    │    │    ...      │
//!   └──────┬──────┘    └──────┬──────┘    └──────┬──────┘
//!          │                  │                  │
//!          └──────────────────┼──────────────────┘
//!                             │ ordered concat
//!                             ▼
//!                ┌─────────────────────────┐
//!                │  Dedup by normalized    │
//!                │  name (trim+lowercase), │
//!                │  first-seen wins        │
//!                └────────────┬────────────┘
//!                             │ truncate to limit
//!                             ▼
//!                ┌─────────────────────────┐
//!                │  Heuristic scoring      │
//!                │  (seedable RNG jitter)  │
//!                │  stable sort, desc      │
//!                └─────────────────────────┘
//! ```
//!
//! The narrative endpoints (`/api/story`, `/api/mood-analysis`) bypass the
//! fan-out for their primary call: they build a prompt, call the
//! generative-text API, and post-process the returned text. Mood analysis
//! falls back to a local keyword classifier when the generated output is
//! not parseable JSON.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server and both
//!   outbound integrations
//! - [`models`] - Shared data types: `Entity`, `Category`, request/response
//!   types
//! - [`taste`] - Taste-search integration: rate limiter, request cache,
//!   search client, fan-out/merge engine, derived discovery operations
//! - [`scoring`] - Stateless heuristic score helpers with an injected,
//!   seedable randomness source
//! - [`genai`] - Generative-text integration: raw client, story prompts and
//!   metrics, mood analysis with local fallback
//! - [`api`] - Axum HTTP handlers for every feature endpoint
//! - [`error`] - The `{"success": false, "error": ...}` response envelope
//! - [`state`] - Shared application state holding config, HTTP client,
//!   taste client, and the scoring RNG

pub mod api;
pub mod config;
pub mod error;
pub mod genai;
pub mod models;
pub mod scoring;
pub mod state;
pub mod taste;
