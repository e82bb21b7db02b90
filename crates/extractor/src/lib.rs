pub mod aggregate;
pub mod block;
pub mod concurrency;
pub mod consts;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod messages;
pub mod runner;
pub mod signers;
pub mod source;
pub mod strict;
