//! Upstream clients for seo-mcp.
//!
//! This crate provides the CapSolver captcha client and the Ahrefs free-tools
//! client (signature acquisition and the four result fetchers) used by the server.

pub mod ahrefs;
pub mod captcha;

pub use ahrefs::{
    AcquisitionError, AhrefsClient, AhrefsConfig, Backlink, IdeaLabel, KeywordDifficulty, KeywordIdea, LabeledIdea,
    SerpResult, TrafficMode, TrafficOverview, UpstreamError,
};

pub use captcha::{CapSolverApi, CaptchaClient, CaptchaConfig, CaptchaError, SolverApi};
