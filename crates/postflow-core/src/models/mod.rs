//! Data models for the content automation API.
//!
//! This module contains the payloads exchanged with the backend:
//!
//! - `User`, `AuthResponse`: accounts and session bootstrap
//! - `SocialAccount`, `Platform`: connected networks
//! - `Schedule`, `Topic`: posting configuration
//! - `GeneratedContent`, `ScheduledPost`: AI-generated activity
//! - `Plan`, `Subscription`: billing
//! - `DashboardOverview`: activity summary
//!
//! Envelope types (`{ plans }`, `{ overview }`, ...) stay crate-private; the
//! API wrappers unwrap them.

pub mod content;
pub mod dashboard;
pub mod plan;
pub mod post;
pub mod schedule;
pub mod social;
pub mod topic;
pub mod user;

use serde::{Deserialize, Serialize};

pub use content::{GenerateRequest, GeneratedContent};
pub use dashboard::DashboardOverview;
pub use plan::{PaymentGateway, Plan, SubscribeResponse, Subscription};
pub use post::{PostStatus, ScheduledPost, ScheduledPostInput};
pub use schedule::{Schedule, ScheduleInput};
pub use social::{ConnectResponse, Platform, SocialAccount};
pub use topic::{Topic, TopicInput};
pub use user::{AuthResponse, EntityId, ProfileUpdate, RegisterRequest, User};

/// Plain `{ message }` acknowledgement (deletes, OTP resend, password reset).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
