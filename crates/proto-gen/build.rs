// Build script to generate the gRPC client/server stubs for `pb.checkStatus`.
//
// The service is described with tonic-build's manual builder so no `protoc`
// is needed at build time. Message types live in `src/messages.rs`; the unit
// tests in `src/lib.rs` check both against `proto/check_status.proto`.

fn main() {
    let method = |name: &str, route: &str, output: &str| {
        tonic_build::manual::Method::builder()
            .name(name)
            .route_name(route)
            .input_type("crate::pb::Empty")
            .output_type(output)
            .codec_path("tonic::codec::ProstCodec")
            .build()
    };

    let service = tonic_build::manual::Service::builder()
        .name("checkStatus")
        .package("pb")
        .method(method("get_status", "getStatus", "crate::pb::TestMsg"))
        .method(method("get_status_a", "getStatusA", "crate::pb::TestMsg"))
        .method(method("health", "health", "crate::pb::Empty"))
        .build();

    tonic_build::manual::Builder::new()
        .build_client(true)
        .build_server(true)
        .compile(&[service]);

    // The stubs depend on nothing but this script
    println!("cargo:rerun-if-changed=build.rs");
}
