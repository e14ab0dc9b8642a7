//! Core of volley: build a canonical description of one HTTP request,
//! transmit it directly or through a relay, and normalize the outcome.
//!
//! All I/O is injected through the [`Transport`] trait; nothing in this
//! crate touches the network.

pub mod builder;
pub mod descriptor;
pub mod dispatch;
pub mod result;
pub mod transport;

pub use builder::{build_descriptor, build_header_map, build_query_string};
pub use descriptor::{KeyValueEntry, Method, RelayCredentials, RelayFields, RequestDescriptor};
pub use dispatch::{dispatch, DispatchMode, RelayPayload};
pub use result::{DispatchResult, Payload};
pub use transport::{RawResponse, Transport};
