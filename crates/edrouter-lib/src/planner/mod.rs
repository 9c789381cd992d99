//! Client for the remote route planner.
//!
//! A [`RemoteRouteJob`] submits a [`RouteQuery`], follows the planner's
//! `queued` replies with delayed polls of `results/<job>`, and decodes the
//! terminal payload into a [`Route`](crate::route::Route). Requests go through
//! the [`PlannerTransport`] trait so the state machine can run against a
//! scripted transport in tests.

mod client;
mod job;
mod reply;
mod request;

pub use client::{nearest, HttpPlanner, NearestSystem, PlannerTransport, DEFAULT_API_BASE};
pub use job::{CancelHandle, DelaySchedule, JobEvent, JobSlot, JobState, RemoteRouteJob};
pub use reply::PlannerReply;
pub use request::{ExactQuery, NeutronQuery, RichesQuery, RouteQuery, DEFAULT_EFFICIENCY};
