//! Extra lazy operators for iterators and fused streams.
//!
//! Synchronous operators live on [`IteratorExt`](iter::ext::IteratorExt);
//! the few that also make sense over a [`Stream`](stream::Stream) are on
//! [`StreamExt`](stream::ext::StreamExt), driven to completion by a
//! [`Consumer`](consumer::Consumer).

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "nightly", feature(extend_one))]

extern crate alloc;

pub mod acquire;
pub mod aggregate;
pub mod consumer;
pub mod error;
pub mod execution;
pub mod iter;
pub mod skip;
pub mod step;
pub mod stream;

pub use error::{Error, Result};
pub use iter::partial::Extremity;

pub mod prelude {
    pub use crate::{
        acquire::{AsyncRelease, Release},
        consumer::{Consumer, ConsumerExt},
        iter::ext::IteratorExt,
        stream::{ext::StreamExt, IntoFusion, IteratorStream, Stream},
    };
}
