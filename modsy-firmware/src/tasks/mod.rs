//! Embassy async tasks

pub mod poller;

pub use poller::poller_task;
