// Message types for `proto/check_status.proto` (package `pb`).
//
// Field tags are part of the wire contract; never renumber them.

/// Request/response marker carrying no fields. Encodes to zero bytes.
#[derive(Clone, Copy, PartialEq, ::prost::Message, ::serde::Serialize)]
pub struct Empty {}

/// Status payload returned by `getStatus` and `getStatusA`.
#[derive(Clone, PartialEq, ::prost::Message, ::serde::Serialize)]
pub struct TestMsg {
    #[prost(string, tag = "1")]
    pub msg: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub status: i32,
}
